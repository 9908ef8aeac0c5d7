//! Streamed output through [`Builder`]s.

pub mod builder;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use xmlkit_engine::{XmlSink, XmlWriter};

use crate::error_handling::{RuntimeFault, disallow_issues, guard};
pub use builder::Builder;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterOptions {
    /// Indent nested elements by this many spaces.
    pub indentation: Option<usize>,
}

/// Takes writer options and returns the next version of them.
pub trait Configurator {
    fn configure(&self, options: WriterOptions) -> WriterOptions;

    fn boxed(self) -> Box<dyn Configurator>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

impl<F> Configurator for F
where
    F: Fn(WriterOptions) -> WriterOptions,
{
    fn configure(&self, options: WriterOptions) -> WriterOptions {
        self(options)
    }
}

pub fn indentation(size: usize) -> impl Configurator {
    move |mut options: WriterOptions| {
        options.indentation = Some(size);
        options
    }
}

fn options(configurators: impl IntoIterator<Item = Box<dyn Configurator>>) -> WriterOptions {
    configurators
        .into_iter()
        .fold(WriterOptions::default(), |options, configurator| configurator.configure(options))
}

pub struct Writer<W: Write> {
    sink: XmlWriter<W>,
}

impl Writer<Vec<u8>> {
    pub fn in_memory(configurators: impl IntoIterator<Item = Box<dyn Configurator>>) -> Self {
        Self::from_writer(Vec::new(), configurators)
    }

    /// Everything written so far.
    pub fn output(&self) -> String {
        String::from_utf8_lossy(self.sink.get_ref()).into_owned()
    }
}

impl Writer<BufWriter<File>> {
    /// Create (or truncate) `path` and write to it.
    pub fn for_file(
        path: impl AsRef<Path>,
        configurators: impl IntoIterator<Item = Box<dyn Configurator>>,
    ) -> Result<Self, RuntimeFault> {
        let path = path.as_ref();
        let file = disallow_issues(|| {
            guard(
                File::create(path),
                &format!("Could not open \"{}\" for writing", path.display()),
            )
        })?;
        tracing::debug!(path = %path.display(), "Writing XML to file");
        Ok(Self::from_writer(BufWriter::new(file), configurators))
    }
}

impl<W: Write> Writer<W> {
    pub fn from_writer(
        inner: W,
        configurators: impl IntoIterator<Item = Box<dyn Configurator>>,
    ) -> Self {
        let sink = match options(configurators).indentation {
            Some(size) => XmlWriter::with_indent(inner, size),
            None => XmlWriter::new(inner),
        };
        Self { sink }
    }

    /// Run `builder` against the output and flush it.
    ///
    /// Fails if any step failed or recorded an error.
    pub fn write(&mut self, builder: Builder<'_>) -> Result<(), RuntimeFault> {
        let sink = &mut self.sink;
        disallow_issues(|| {
            builder.build(sink)?;
            guard(sink.flush(), "Could not flush the XML output")?;
            Ok(())
        })
    }

    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }
}

impl<W: Write> std::fmt::Debug for Writer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Writer").field("sink", &self.sink).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::builder::{
        attributes, cdata, children, comment, document, element, namespace_attribute,
        prefixed_attribute, prefixed_element, value,
    };
    use crate::xmlns::Xmlns;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_with_namespaces() {
        let mut writer = Writer::in_memory([]);
        writer
            .write(document(
                "1.0",
                Some("UTF-8"),
                [prefixed_element(
                    "f",
                    "root",
                    [
                        namespace_attribute(&Xmlns::load("urn:fizz"), Some("f")),
                        prefixed_attribute("f", "kind", "list"),
                        element(
                            "item",
                            [attributes([("id", "1"), ("state", "on")]), value("a & b")],
                        ),
                        element("empty", []),
                    ],
                )],
            ))
            .unwrap();

        assert_eq!(
            writer.output(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <f:root xmlns:f=\"urn:fizz\" f:kind=\"list\">\
             <item id=\"1\" state=\"on\">a &amp; b</item><empty/></f:root>"
        );
    }

    #[test]
    fn test_indentation() {
        let mut writer = Writer::in_memory([indentation(2).boxed()]);
        writer
            .write(element("root", [element("a", [value("1")]), element("b", [])]))
            .unwrap();
        assert_eq!(writer.output(), "<root>\n  <a>1</a>\n  <b/>\n</root>");
    }

    #[test]
    fn test_children_and_other_nodes() {
        let mut writer = Writer::in_memory([]);
        writer
            .write(element("r", [children([comment(" note "), cdata("<raw>")])]))
            .unwrap();
        assert_eq!(writer.output(), "<r><!-- note --><![CDATA[<raw>]]></r>");
    }

    #[test]
    fn test_several_writes_append() {
        let mut writer = Writer::in_memory([]);
        writer.write(element("a", [])).unwrap();
        writer.write(element("b", [])).unwrap();
        assert_eq!(writer.output(), "<a/><b/>");
    }

    #[test]
    fn test_invalid_builder_faults() {
        let mut writer = Writer::in_memory([]);
        let fault = writer
            .write(element("root", [value("text"), attributes([("late", "1")])]))
            .unwrap_err();
        assert_eq!(fault.message(), "Could not write attribute late");
        assert_eq!(
            fault.issues().as_slice()[0].message(),
            "Writer error: attribute 'late' written outside of a start tag"
        );
    }

    #[test]
    fn test_for_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xml");
        let mut writer = Writer::for_file(&path, []).unwrap();
        writer.write(element("saved", [value("yes")])).unwrap();
        drop(writer);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<saved>yes</saved>");
    }

    #[test]
    fn test_for_file_in_missing_directory() {
        let fault = Writer::for_file("/definitely/not/here/out.xml", []).unwrap_err();
        assert!(fault.message().starts_with("Could not open"));
        assert_eq!(fault.issues().len(), 1);
    }
}

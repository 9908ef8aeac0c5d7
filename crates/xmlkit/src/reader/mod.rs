//! Streaming extraction of elements.
//!
//! A [`Reader`] describes where XML comes from. [`Reader::provide`] opens it
//! and returns a stop-on-first-issue cursor yielding the outer XML of every
//! element a [`Matcher`] accepts, in document order. Nested matches are
//! yielded too, after their ancestor.

pub mod matcher;

use std::io::{BufRead, Cursor};
use std::path::{Path, PathBuf};

use xmlkit_engine::{NodeType, ReaderConfig, XmlReader};

use crate::dom::loader::ensure_file_exists;
use crate::error_handling::{RuntimeFault, StreamCursor, stop_on_first_issue};

pub use matcher::Matcher;

#[derive(Debug, Clone)]
enum Source {
    Memory(String),
    File(PathBuf),
}

/// Where to read XML from, and how.
#[derive(Debug, Clone)]
pub struct Reader {
    source: Source,
    config: ReaderConfig,
}

impl Reader {
    pub fn from_xml_string(xml: impl Into<String>) -> Self {
        Self {
            source: Source::Memory(xml.into()),
            config: ReaderConfig::default(),
        }
    }

    /// Fails if the file does not exist. The file is opened by
    /// [`provide`](Reader::provide).
    pub fn from_xml_file(path: impl AsRef<Path>) -> Result<Self, RuntimeFault> {
        let path = path.as_ref();
        ensure_file_exists(path)?;
        Ok(Self {
            source: Source::File(path.to_path_buf()),
            config: ReaderConfig::default(),
        })
    }

    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Stream the outer XML of every element `matcher` accepts.
    ///
    /// Opening the source happens on the first step, so a file that has gone
    /// missing surfaces as the cursor's fault.
    pub fn provide<M: Matcher>(
        &self,
        matcher: M,
    ) -> StreamCursor<
        ReadState,
        impl FnMut(&mut ReadState) -> bool + use<M>,
        impl FnMut(&mut ReadState) -> Option<String> + use<M>,
    > {
        tracing::debug!(source = ?self.source, "Streaming XML");
        let state = ReadState {
            source: self.source.clone(),
            config: self.config.clone(),
            reader: None,
            opened: false,
        };

        stop_on_first_issue(state, ReadState::advance, move |state: &mut ReadState| {
            state.extract(&matcher)
        })
    }
}

/// The open reader behind a [`Reader::provide`] cursor.
pub struct ReadState {
    source: Source,
    config: ReaderConfig,
    reader: Option<XmlReader<Box<dyn BufRead>>>,
    opened: bool,
}

impl ReadState {
    fn open(&mut self) -> Option<XmlReader<Box<dyn BufRead>>> {
        let input: Box<dyn BufRead> = match &self.source {
            Source::Memory(xml) => Box::new(Cursor::new(xml.clone().into_bytes())),
            Source::File(path) => Box::new(xmlkit_engine::reader::open_file(path)?),
        };
        Some(XmlReader::from_reader(input).with_config(&self.config))
    }

    fn advance(&mut self) -> bool {
        if !self.opened {
            self.opened = true;
            self.reader = self.open();
        }
        self.reader.as_mut().is_some_and(XmlReader::read)
    }

    fn extract(&mut self, matcher: &impl Matcher) -> Option<String> {
        let reader = self.reader.as_mut()?;
        if reader.node_type() != Some(NodeType::Element)
            || !matcher.matches(reader.node_sequence())
        {
            return None;
        }
        reader.read_outer_xml()
    }

    /// The underlying engine reader, once opened.
    pub fn reader(&self) -> Option<&XmlReader<Box<dyn BufRead>>> {
        self.reader.as_ref()
    }
}

impl std::fmt::Debug for ReadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadState")
            .field("source", &self.source)
            .field("opened", &self.opened)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::matcher::{element_name, namespaced_element};
    use crate::error_handling::CursorState;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_provide_yields_outer_xml() {
        let reader =
            Reader::from_xml_string("<root><user>Jos</user><other/><user>Bos</user></root>");
        let users: Vec<_> = reader
            .provide(element_name("user"))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(users, vec!["<user>Jos</user>", "<user>Bos</user>"]);
    }

    #[test]
    fn test_provide_can_run_twice() {
        let reader = Reader::from_xml_string("<root><a/></root>");
        assert_eq!(reader.provide(element_name("a")).count(), 1);
        assert_eq!(reader.provide(element_name("a")).count(), 1);
    }

    #[test]
    fn test_nested_matches_are_yielded() {
        let reader = Reader::from_xml_string("<item><item>inner</item></item>");
        let items: Vec<_> = reader.provide(element_name("item")).map(Result::unwrap).collect();
        assert_eq!(items, vec!["<item><item>inner</item></item>", "<item>inner</item>"]);
    }

    #[test]
    fn test_namespaced_match() {
        let reader = Reader::from_xml_string(
            r#"<f:root xmlns:f="urn:fizz"><f:num>1</f:num><num>2</num></f:root>"#,
        );
        let items: Vec<_> = reader
            .provide(namespaced_element("urn:fizz", "num"))
            .map(Result::unwrap)
            .collect();
        assert_eq!(items, vec![r#"<f:num xmlns:f="urn:fizz">1</f:num>"#]);
    }

    #[test]
    fn test_malformed_input_faults_after_items() {
        let reader = Reader::from_xml_string("<root><user>Jos</user><user>Bos</oops></root>");
        let mut cursor = reader.provide(element_name("user"));
        assert_eq!(cursor.next(), Some(Ok("<user>Jos</user>".to_string())));
        let fault = cursor.next().unwrap().unwrap_err();
        assert!(fault.issues().has_fatal());
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.state(), CursorState::Failed);
    }

    #[test]
    fn test_missing_file() {
        let fault = Reader::from_xml_file("/definitely/not/here.xml").unwrap_err();
        assert_eq!(fault.message(), "The file \"/definitely/not/here.xml\" does not exist");
    }

    #[test]
    fn test_file_removed_before_streaming() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.xml");
        std::fs::write(&path, "<root/>").unwrap();
        let reader = Reader::from_xml_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let results: Vec<_> = reader.provide(element_name("root")).collect();
        assert_eq!(results.len(), 1);
        let fault = results[0].as_ref().unwrap_err();
        assert!(
            fault.issues().as_slice()[0]
                .message()
                .starts_with("failed to load external entity")
        );
    }
}

//! Composable pieces of streamed output.
//!
//! A [`Builder`] is a deferred sequence of [`XmlSink`] calls. Builders nest:
//! [`element`] takes the builders for its attributes and content, in the
//! order they should be written.
//!
//! ```rust
//! use xmlkit::writer::builder::{attribute, element, value};
//! use xmlkit::writer::Writer;
//!
//! let mut writer = Writer::in_memory([]);
//! writer
//!     .write(element("user", [attribute("id", "1"), value("Ann")]))
//!     .unwrap();
//! assert_eq!(writer.output(), "<user id=\"1\">Ann</user>");
//! ```

use xmlkit_engine::XmlSink;

use crate::error_handling::{RuntimeFault, guard};
use crate::xmlns::Xmlns;

type BuildFn<'a> = Box<dyn FnOnce(&mut dyn XmlSink) -> Result<(), RuntimeFault> + 'a>;

pub struct Builder<'a> {
    build: BuildFn<'a>,
}

impl<'a> Builder<'a> {
    pub fn new(build: impl FnOnce(&mut dyn XmlSink) -> Result<(), RuntimeFault> + 'a) -> Self {
        Self {
            build: Box::new(build),
        }
    }

    pub fn build(self, sink: &mut dyn XmlSink) -> Result<(), RuntimeFault> {
        (self.build)(sink)
    }
}

impl std::fmt::Debug for Builder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Builder")
    }
}

/// Declaration, content, then every element still open is closed.
pub fn document<'a>(
    version: impl Into<String>,
    encoding: Option<&str>,
    content: impl IntoIterator<Item = Builder<'a>> + 'a,
) -> Builder<'a> {
    let version = version.into();
    let encoding = encoding.map(str::to_string);
    Builder::new(move |sink| {
        guard(
            sink.start_document(&version, encoding.as_deref()),
            "Could not start the document",
        )?;
        children(content).build(sink)?;
        guard(sink.end_document(), "Could not end the document")?;
        Ok(())
    })
}

pub fn element<'a>(
    name: impl Into<String>,
    content: impl IntoIterator<Item = Builder<'a>> + 'a,
) -> Builder<'a> {
    let name = name.into();
    Builder::new(move |sink| {
        guard(
            sink.start_element(&name),
            &format!("Could not start element {}", name),
        )?;
        children(content).build(sink)?;
        guard(sink.end_element(), &format!("Could not end element {}", name))?;
        Ok(())
    })
}

pub fn prefixed_element<'a>(
    prefix: &str,
    local_name: &str,
    content: impl IntoIterator<Item = Builder<'a>> + 'a,
) -> Builder<'a> {
    element(format!("{}:{}", prefix, local_name), content)
}

/// Only valid directly inside an [`element`], before its content.
pub fn attribute<'a>(name: impl Into<String>, value: impl Into<String>) -> Builder<'a> {
    let name = name.into();
    let value = value.into();
    Builder::new(move |sink| {
        guard(
            sink.write_attribute(&name, &value),
            &format!("Could not write attribute {}", name),
        )?;
        Ok(())
    })
}

pub fn attributes<'a, K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Builder<'a>
where
    K: Into<String>,
    V: Into<String>,
{
    let builders: Vec<Builder<'a>> = pairs
        .into_iter()
        .map(|(name, value)| attribute(name, value))
        .collect();
    children(builders)
}

pub fn prefixed_attribute<'a>(
    prefix: &str,
    local_name: &str,
    value: impl Into<String>,
) -> Builder<'a> {
    attribute(format!("{}:{}", prefix, local_name), value)
}

/// `xmlns="…"`, or `xmlns:prefix="…"` with a prefix.
pub fn namespace_attribute<'a>(namespace: &Xmlns, prefix: Option<&str>) -> Builder<'a> {
    let name = match prefix {
        Some(prefix) => format!("xmlns:{}", prefix),
        None => "xmlns".to_string(),
    };
    attribute(name, namespace.value())
}

/// Builders written one after the other.
pub fn children<'a>(builders: impl IntoIterator<Item = Builder<'a>> + 'a) -> Builder<'a> {
    Builder::new(move |sink| builders.into_iter().try_for_each(|builder| builder.build(sink)))
}

/// Escaped character data.
pub fn value<'a>(text: impl Into<String>) -> Builder<'a> {
    let text = text.into();
    Builder::new(move |sink| {
        guard(sink.text(&text), "Could not write value")?;
        Ok(())
    })
}

pub fn cdata<'a>(text: impl Into<String>) -> Builder<'a> {
    let text = text.into();
    Builder::new(move |sink| {
        guard(sink.cdata(&text), "Could not write CDATA")?;
        Ok(())
    })
}

pub fn comment<'a>(text: impl Into<String>) -> Builder<'a> {
    let text = text.into();
    Builder::new(move |sink| {
        guard(sink.comment(&text), "Could not write comment")?;
        Ok(())
    })
}

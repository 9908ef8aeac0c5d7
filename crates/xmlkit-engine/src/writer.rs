//! Streaming writer.

use std::io::Write;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::diagnostics;
use crate::error::EngineError;

/// Streaming XML output.
///
/// Every call returns `false` on failure and reports what went wrong to the
/// diagnostic sink, the same contract as the reader. The trait is object safe
/// so builders can work against `&mut dyn XmlSink`.
pub trait XmlSink {
    /// Write the `<?xml ...?>` declaration.
    fn start_document(&mut self, version: &str, encoding: Option<&str>) -> bool;

    /// Close every element still open.
    fn end_document(&mut self) -> bool;

    fn start_element(&mut self, name: &str) -> bool;

    /// Add an attribute to the element most recently started. Only valid
    /// before any content has been written into that element.
    fn write_attribute(&mut self, name: &str, value: &str) -> bool;

    /// Write character data, escaping as needed.
    fn text(&mut self, content: &str) -> bool;

    fn cdata(&mut self, content: &str) -> bool;

    fn comment(&mut self, content: &str) -> bool;

    /// Close the innermost open element, as `<name/>` if it has no content.
    fn end_element(&mut self) -> bool;

    /// Push buffered output to the underlying writer.
    fn flush(&mut self) -> bool;
}

/// [`XmlSink`] over any [`Write`].
pub struct XmlWriter<W: Write> {
    writer: quick_xml::Writer<W>,
    /// Start tag still accepting attributes.
    pending: Option<BytesStart<'static>>,
    open: Vec<String>,
    indented: bool,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: quick_xml::Writer::new(inner),
            pending: None,
            open: Vec::new(),
            indented: false,
        }
    }

    pub fn with_indent(inner: W, size: usize) -> Self {
        Self {
            writer: quick_xml::Writer::new_with_indent(inner, b' ', size),
            pending: None,
            open: Vec::new(),
            indented: true,
        }
    }

    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// Number of elements started and not yet ended.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    fn fail(&self, error: EngineError) -> bool {
        tracing::debug!(error = %error, "XML writer call failed");
        diagnostics::report(error.to_issue());
        false
    }

    fn emit(&mut self, event: Event<'_>) -> bool {
        match self.writer.write_event(event) {
            Ok(()) => true,
            Err(err) => self.fail(EngineError::Io {
                message: err.to_string(),
            }),
        }
    }

    fn flush_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(start) => self.emit(Event::Start(start)),
            None => true,
        }
    }
}

fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.')
        && !name.chars().any(|c| {
            c.is_whitespace()
                || matches!(c, '<' | '>' | '&' | '"' | '\'' | '/' | '=' | '?' | '!')
        })
}

impl<W: Write> XmlSink for XmlWriter<W> {
    fn start_document(&mut self, version: &str, encoding: Option<&str>) -> bool {
        if !self.emit(Event::Decl(BytesDecl::new(version, encoding, None))) {
            return false;
        }
        if self.indented {
            return true;
        }
        match self.writer.get_mut().write_all(b"\n") {
            Ok(()) => true,
            Err(err) => self.fail(err.into()),
        }
    }

    fn end_document(&mut self) -> bool {
        while !self.open.is_empty() {
            if !self.end_element() {
                return false;
            }
        }
        true
    }

    fn start_element(&mut self, name: &str) -> bool {
        if !valid_name(name) {
            return self.fail(EngineError::WriterState {
                message: format!("invalid element name '{}'", name),
            });
        }
        if !self.flush_pending() {
            return false;
        }
        self.pending = Some(BytesStart::new(name.to_string()));
        self.open.push(name.to_string());
        true
    }

    fn write_attribute(&mut self, name: &str, value: &str) -> bool {
        if !valid_name(name) {
            return self.fail(EngineError::WriterState {
                message: format!("invalid attribute name '{}'", name),
            });
        }
        match self.pending.as_mut() {
            Some(start) => {
                start.push_attribute((name, value));
                true
            }
            None => self.fail(EngineError::WriterState {
                message: format!("attribute '{}' written outside of a start tag", name),
            }),
        }
    }

    fn text(&mut self, content: &str) -> bool {
        self.flush_pending() && self.emit(Event::Text(BytesText::new(content)))
    }

    fn cdata(&mut self, content: &str) -> bool {
        self.flush_pending() && self.emit(Event::CData(BytesCData::new(content)))
    }

    fn comment(&mut self, content: &str) -> bool {
        if content.contains("--") {
            return self.fail(EngineError::WriterState {
                message: "comment must not contain '--'".to_string(),
            });
        }
        self.flush_pending() && self.emit(Event::Comment(BytesText::from_escaped(content)))
    }

    fn end_element(&mut self) -> bool {
        let Some(name) = self.open.pop() else {
            return self.fail(EngineError::WriterState {
                message: "end element without an open element".to_string(),
            });
        };
        match self.pending.take() {
            Some(start) => self.emit(Event::Empty(start)),
            None => self.emit(Event::End(BytesEnd::new(name))),
        }
    }

    fn flush(&mut self) -> bool {
        if !self.flush_pending() {
            return false;
        }
        match self.writer.get_mut().flush() {
            Ok(()) => true,
            Err(err) => self.fail(err.into()),
        }
    }
}

impl<W: Write> std::fmt::Debug for XmlWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlWriter")
            .field("open", &self.open)
            .field("pending", &self.pending.is_some())
            .field("indented", &self.indented)
            .finish()
    }
}

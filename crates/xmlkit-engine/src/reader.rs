//! Pull reader over quick-xml's namespace-aware reader.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use crate::config::ReaderConfig;
use crate::diagnostics;
use crate::error::EngineError;
use crate::node::{AttributeNode, ElementNode, NodeSequence, NodeType};
use crate::source::TrackedSource;
use crate::tree::Declaration;

/// A node pulled from the source, before the reader is positioned on it.
#[derive(Debug, Clone)]
struct ReadNode {
    node_type: NodeType,
    /// Set for [`NodeType::Element`]; the position is filled in on entry.
    element: Option<ElementNode>,
    /// Qualified element name, or the target of a processing instruction.
    name: String,
    value: String,
    is_empty: bool,
    /// The raw event, kept for [`XmlReader::read_outer_xml`].
    event: Event<'static>,
}

/// Namespace resolution with the borrow on the reader released.
enum Resolved {
    Bound(String),
    Unbound,
    Unknown(String),
}

impl From<ResolveResult<'_>> for Resolved {
    fn from(result: ResolveResult<'_>) -> Self {
        match result {
            ResolveResult::Bound(namespace) => Resolved::Bound(lossy(namespace.as_ref())),
            ResolveResult::Unbound => Resolved::Unbound,
            ResolveResult::Unknown(prefix) => Resolved::Unknown(lossy(&prefix)),
        }
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn leaf(node_type: NodeType, name: String, value: String, event: Event<'static>) -> ReadNode {
    ReadNode {
        node_type,
        element: None,
        name,
        value,
        is_empty: false,
        event,
    }
}

/// A forward-only XML reader.
///
/// [`read`](XmlReader::read) advances to the next node and returns `false`
/// both at the end of the input and when the input turned out to be
/// malformed. Whatever went wrong is reported to the [`diagnostics`] sink;
/// nothing is returned to the caller.
///
/// Well-formedness is checked as the input is read: a document with no
/// element, an element after the document element, text outside the
/// document element and unterminated elements are all fatal.
pub struct XmlReader<R> {
    inner: NsReader<TrackedSource<R>>,
    buf: Vec<u8>,

    current: Option<ReadNode>,
    /// Nodes pulled ahead of the current position by `read_outer_xml`.
    replay: VecDeque<ReadNode>,

    /// Elements open at the current position, the current element included.
    open: NodeSequence,
    /// Child element counts, one entry per open element plus the document.
    counters: Vec<usize>,
    declaration: Option<Declaration>,

    /// Qualified names of the elements open in the source, which runs
    /// ahead of `open` while nodes are buffered in `replay`.
    source_open: Vec<String>,
    root_seen: bool,
    root_closed: bool,
    source_done: bool,
    failed: bool,
    finished: bool,
}

impl<'a> XmlReader<&'a [u8]> {
    /// Read from an in-memory string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(xml: &'a str) -> Self {
        Self::from_reader(xml.as_bytes())
    }
}

impl XmlReader<BufReader<File>> {
    /// Open a file for reading.
    ///
    /// Returns `None` if the file cannot be opened; the failure is reported
    /// to the diagnostic sink.
    pub fn from_file(path: impl AsRef<Path>) -> Option<Self> {
        open_file(path).map(Self::from_reader)
    }
}

/// Open a file as reader input, reporting failure to the diagnostic sink.
pub fn open_file(path: impl AsRef<Path>) -> Option<BufReader<File>> {
    let path = path.as_ref();
    match File::open(path) {
        Ok(file) => Some(BufReader::new(file)),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "Cannot open XML file");
            diagnostics::report(
                EngineError::ExternalEntity {
                    path: path.display().to_string(),
                }
                .to_issue(),
            );
            None
        }
    }
}

impl<R: BufRead> XmlReader<R> {
    pub fn from_reader(reader: R) -> Self {
        let mut inner = NsReader::from_reader(TrackedSource::new(reader));
        ReaderConfig::default().apply(inner.config_mut());

        Self {
            inner,
            buf: Vec::new(),
            current: None,
            replay: VecDeque::new(),
            open: NodeSequence::default(),
            counters: vec![0],
            declaration: None,
            source_open: Vec::new(),
            root_seen: false,
            root_closed: false,
            source_done: false,
            failed: false,
            finished: false,
        }
    }

    /// Replace the reader options. Only meaningful before the first read.
    pub fn with_config(mut self, config: &ReaderConfig) -> Self {
        config.apply(self.inner.config_mut());
        self
    }

    /// Advance to the next node.
    ///
    /// Returns `false` at the end of the input or after a fatal problem.
    /// Once `false` has been returned, every later call returns `false`.
    pub fn read(&mut self) -> bool {
        if self.finished {
            return false;
        }

        self.leave_current();

        let next = match self.replay.pop_front() {
            Some(node) => Some(node),
            None => self.pull(),
        };

        match next {
            Some(node) => {
                self.enter(node);
                true
            }
            None => {
                self.current = None;
                self.finished = true;
                false
            }
        }
    }

    /// Markup of the current node, including its subtree.
    ///
    /// The reader stays on the current node; the subtree is buffered and
    /// handed out again by subsequent reads. Returns `None` if the input
    /// ends or breaks before the element is closed.
    pub fn read_outer_xml(&mut self) -> Option<String> {
        let current = self.current.as_ref()?;
        let mut end = 0;

        if current.node_type == NodeType::Element && !current.is_empty {
            let mut depth = 1usize;
            let mut index = 0;
            loop {
                if index == self.replay.len() {
                    let node = self.pull()?;
                    self.replay.push_back(node);
                }
                let node = &self.replay[index];
                index += 1;
                match node.node_type {
                    NodeType::Element if !node.is_empty => depth += 1,
                    NodeType::EndElement => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
            }
            end = index;
        }

        let current = self.current.as_ref()?;
        let mut writer = quick_xml::Writer::new(Vec::new());
        let first = match &current.event {
            Event::Start(start) => Event::Start(self.with_inherited_namespaces(start)),
            Event::Empty(start) => Event::Empty(self.with_inherited_namespaces(start)),
            other => other.clone(),
        };

        let events = std::iter::once(&first).chain(self.replay.iter().take(end).map(|n| &n.event));
        for event in events {
            if let Err(err) = writer.write_event(event.borrow()) {
                diagnostics::report(EngineError::Io { message: err.to_string() }.to_issue());
                return None;
            }
        }

        match String::from_utf8(writer.into_inner()) {
            Ok(xml) => Some(xml),
            Err(err) => {
                diagnostics::report(
                    EngineError::Io {
                        message: err.to_string(),
                    }
                    .to_issue(),
                );
                None
            }
        }
    }

    /// The start tag of the current element with the namespace declarations
    /// of its ancestors added, so the markup stands on its own.
    fn with_inherited_namespaces(&self, start: &BytesStart<'static>) -> BytesStart<'static> {
        let mut inherited: Vec<(&str, &str)> = Vec::new();
        let ancestors = &self.open.elements()[..self.open.len().saturating_sub(1)];
        for attribute in ancestors.iter().flat_map(|element| &element.attributes) {
            if attribute.name != "xmlns" && !attribute.name.starts_with("xmlns:") {
                continue;
            }
            match inherited.iter_mut().find(|(name, _)| *name == attribute.name) {
                Some(existing) => existing.1 = attribute.value.as_str(),
                None => inherited.push((attribute.name.as_str(), attribute.value.as_str())),
            }
        }

        let own = self.open.current();
        let mut start = start.clone();
        for (name, value) in inherited {
            if own.is_some_and(|element| element.has_attribute(name)) {
                continue;
            }
            start.push_attribute((name, value));
        }
        start
    }

    pub fn node_type(&self) -> Option<NodeType> {
        self.current.as_ref().map(|node| node.node_type)
    }

    /// Qualified name of the current element, end element or processing
    /// instruction target. Empty for other nodes.
    pub fn name(&self) -> &str {
        self.current.as_ref().map_or("", |node| node.name.as_str())
    }

    pub fn local_name(&self) -> &str {
        match self.current.as_ref().and_then(|node| node.element.as_ref()) {
            Some(element) => &element.local_name,
            None => self.name(),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.element().and_then(|element| element.prefix.as_deref())
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        self.current
            .as_ref()
            .and_then(|node| node.element.as_ref())
            .and_then(|element| element.namespace.as_deref())
    }

    /// Text of the current text, CDATA, comment, processing instruction or
    /// DOCTYPE node.
    pub fn value(&self) -> &str {
        self.current.as_ref().map_or("", |node| node.value.as_str())
    }

    /// Whether the current element was written as `<name/>`.
    pub fn is_empty_element(&self) -> bool {
        self.current.as_ref().is_some_and(|node| node.is_empty)
    }

    /// Number of elements enclosing the current node.
    pub fn depth(&self) -> usize {
        match self.node_type() {
            Some(NodeType::Element) => self.open.len().saturating_sub(1),
            _ => self.open.len(),
        }
    }

    /// The current element, when positioned on one.
    pub fn element(&self) -> Option<&ElementNode> {
        self.current.as_ref().and_then(|node| node.element.as_ref())
    }

    pub fn attributes(&self) -> &[AttributeNode] {
        self.element().map_or(&[], |element| element.attributes.as_slice())
    }

    /// Value of an attribute of the current element by qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.element().and_then(|element| element.attribute(name))
    }

    /// The open elements, outermost first; the current element is last.
    pub fn node_sequence(&self) -> &NodeSequence {
        &self.open
    }

    /// The XML declaration, once it has been read.
    pub fn declaration(&self) -> Option<&Declaration> {
        self.declaration.as_ref()
    }

    /// Whether reading stopped because of a fatal problem.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    fn leave_current(&mut self) {
        if let Some(node) = self.current.take() {
            if node.node_type == NodeType::Element && node.is_empty {
                self.open.pop();
                self.counters.pop();
            }
        }
    }

    fn enter(&mut self, mut node: ReadNode) {
        match node.node_type {
            NodeType::Element => {
                if let Some(element) = node.element.as_mut() {
                    if self.counters.is_empty() {
                        self.counters.push(0);
                    }
                    if let Some(count) = self.counters.last_mut() {
                        *count += 1;
                        element.position = *count;
                    }
                    self.open.push(element.clone());
                    self.counters.push(0);
                }
            }
            NodeType::EndElement => {
                self.open.pop();
                self.counters.pop();
            }
            NodeType::XmlDeclaration => {
                if let Event::Decl(decl) = &node.event {
                    self.declaration = Some(Declaration {
                        version: decl.version().map(|v| lossy(&v)).unwrap_or_default(),
                        encoding: decl.encoding().and_then(Result::ok).map(|v| lossy(&v)),
                        standalone: decl.standalone().and_then(Result::ok).map(|v| lossy(&v)),
                    });
                }
            }
            _ => {}
        }
        self.current = Some(node);
    }

    fn location(&self, offset: u64) -> (u64, u64) {
        self.inner.get_ref().location(offset)
    }

    fn problem(&mut self, error: EngineError, offset: u64) {
        let (line, column) = self.location(offset);
        if error.severity() == xmlkit_issues::Severity::Fatal {
            tracing::debug!(error = %error, line, column, "XML reader stopped");
            self.failed = true;
            self.source_done = true;
        }
        diagnostics::report(error.to_issue_at(line, column));
    }

    /// Pull the next node from the source, checking well-formedness.
    fn pull(&mut self) -> Option<ReadNode> {
        if self.source_done {
            return None;
        }

        let offset = self.inner.buffer_position() as u64;
        self.buf.clear();
        let result = self
            .inner
            .read_resolved_event_into(&mut self.buf)
            .map(|(resolved, event)| (Resolved::from(resolved), event.into_owned()));

        let (resolved, event) = match result {
            Ok(pair) => pair,
            Err(err) => {
                let position = self.inner.error_position() as u64;
                self.problem(EngineError::from(err), position);
                return None;
            }
        };

        let node = match &event {
            Event::Start(start) | Event::Empty(start) => {
                let is_empty = matches!(event, Event::Empty(_));
                if self.root_closed {
                    self.problem(EngineError::ExtraContent, offset);
                    return None;
                }
                self.root_seen = true;

                let element = self.element_node(start, resolved, offset)?;
                if !is_empty {
                    self.source_open.push(element.name.clone());
                } else if self.source_open.is_empty() {
                    self.root_closed = true;
                }

                ReadNode {
                    node_type: NodeType::Element,
                    name: element.name.clone(),
                    element: Some(element),
                    value: String::new(),
                    is_empty,
                    event: event.clone(),
                }
            }
            Event::End(end) => {
                self.source_open.pop();
                if self.source_open.is_empty() {
                    self.root_closed = true;
                }
                ReadNode {
                    node_type: NodeType::EndElement,
                    element: None,
                    name: lossy(end.name().as_ref()),
                    value: String::new(),
                    is_empty: false,
                    event: event.clone(),
                }
            }
            Event::Text(text) => {
                let value = match text.unescape() {
                    Ok(value) => value.into_owned(),
                    Err(err) => {
                        self.problem(EngineError::from(err), offset);
                        lossy(text)
                    }
                };
                let whitespace = value.chars().all(char::is_whitespace);
                if !whitespace && self.source_open.is_empty() {
                    self.problem(EngineError::TextOutsideRoot, offset);
                    return None;
                }
                let node_type = if whitespace {
                    NodeType::Whitespace
                } else {
                    NodeType::Text
                };
                leaf(node_type, String::new(), value, event.clone())
            }
            Event::CData(cdata) => {
                if self.source_open.is_empty() {
                    self.problem(EngineError::TextOutsideRoot, offset);
                    return None;
                }
                leaf(NodeType::CData, String::new(), lossy(cdata), event.clone())
            }
            Event::Comment(comment) => {
                leaf(NodeType::Comment, String::new(), lossy(comment), event.clone())
            }
            Event::PI(pi) => {
                let content = lossy(pi.content()).trim_start().to_string();
                leaf(
                    NodeType::ProcessingInstruction,
                    lossy(pi.target()),
                    content,
                    event.clone(),
                )
            }
            Event::Decl(decl) => {
                let version = decl.version().map(|v| lossy(&v)).unwrap_or_default();
                if version != "1.0" {
                    self.problem(EngineError::UnsupportedVersion { version }, offset);
                }
                leaf(NodeType::XmlDeclaration, String::new(), String::new(), event.clone())
            }
            Event::DocType(doctype) => {
                self.problem(EngineError::DocTypeIgnored, offset);
                let value = lossy(doctype).trim().to_string();
                leaf(NodeType::DocumentType, String::new(), value, event.clone())
            }
            Event::Eof => {
                self.source_done = true;
                if !self.root_seen {
                    self.problem(EngineError::EmptyDocument, offset);
                } else if let Some(open) = self.source_open.last().cloned() {
                    self.problem(EngineError::UnexpectedEof { open }, offset);
                }
                return None;
            }
        };

        Some(node)
    }

    fn element_node(
        &mut self,
        start: &BytesStart<'_>,
        resolved: Resolved,
        offset: u64,
    ) -> Option<ElementNode> {
        let qname = start.name();
        let name = lossy(qname.as_ref());
        let local_name = lossy(qname.local_name().as_ref());
        let prefix = qname.prefix().map(|p| lossy(p.as_ref()));

        let namespace = match resolved {
            Resolved::Bound(uri) => Some(uri),
            Resolved::Unbound => None,
            Resolved::Unknown(prefix) => {
                self.problem(
                    EngineError::UndefinedPrefix {
                        prefix,
                        name: name.clone(),
                    },
                    offset,
                );
                None
            }
        };

        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = match attribute {
                Ok(attribute) => attribute,
                Err(err) => {
                    self.problem(
                        EngineError::InvalidAttribute {
                            element: name.clone(),
                            message: err.to_string(),
                        },
                        offset,
                    );
                    return None;
                }
            };

            let attribute_name = lossy(attribute.key.as_ref());
            let attribute_prefix = attribute.key.prefix().map(|p| lossy(p.as_ref()));
            let (attribute_resolved, attribute_local) = self.inner.resolve_attribute(attribute.key);
            let attribute_local = lossy(attribute_local.as_ref());
            let attribute_namespace = match Resolved::from(attribute_resolved) {
                Resolved::Bound(uri) => Some(uri),
                Resolved::Unbound => None,
                Resolved::Unknown(prefix) => {
                    self.problem(
                        EngineError::UndefinedPrefix {
                            prefix,
                            name: attribute_name.clone(),
                        },
                        offset,
                    );
                    None
                }
            };

            let value = match attribute.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(err) => {
                    self.problem(EngineError::from(err), offset);
                    lossy(&attribute.value)
                }
            };

            attributes.push(AttributeNode {
                name: attribute_name,
                local_name: attribute_local,
                prefix: attribute_prefix,
                namespace: attribute_namespace,
                value,
            });
        }

        Some(ElementNode {
            name,
            local_name,
            prefix,
            namespace,
            attributes,
            position: 0,
        })
    }
}

impl<R> std::fmt::Debug for XmlReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlReader")
            .field("node_type", &self.current.as_ref().map(|node| node.node_type))
            .field("depth", &self.open.len())
            .field("buffered", &self.replay.len())
            .field("failed", &self.failed)
            .field("finished", &self.finished)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xmlkit_issues::Severity;

    fn collecting<T>(f: impl FnOnce() -> T) -> (T, Vec<xmlkit_issues::Issue>) {
        let previous = diagnostics::use_internal_errors(true);
        let offset = diagnostics::log_len();
        let result = f();
        let issues = diagnostics::take_since(offset);
        diagnostics::use_internal_errors(previous);
        (result, issues)
    }

    fn element_names(xml: &str) -> Vec<(String, usize, usize)> {
        let mut reader = XmlReader::from_str(xml);
        let mut names = Vec::new();
        while reader.read() {
            if reader.node_type() == Some(NodeType::Element) {
                let position = reader.element().map_or(0, |e| e.position);
                names.push((reader.name().to_string(), reader.depth(), position));
            }
        }
        names
    }

    #[test]
    fn test_reads_elements_with_depth_and_position() {
        let names = element_names("<root><a/><b><c/></b><a/></root>");
        assert_eq!(
            names,
            vec![
                ("root".to_string(), 0, 1),
                ("a".to_string(), 1, 1),
                ("b".to_string(), 1, 2),
                ("c".to_string(), 2, 1),
                ("a".to_string(), 1, 3),
            ]
        );
    }

    #[test]
    fn test_node_sequence_tracks_ancestors() {
        let mut reader = XmlReader::from_str("<root><user><name>x</name></user></root>");
        let mut seen = Vec::new();
        while reader.read() {
            if reader.node_type() == Some(NodeType::Element) {
                let path: Vec<_> = reader
                    .node_sequence()
                    .elements()
                    .iter()
                    .map(|e| e.name.clone())
                    .collect();
                seen.push(path.join("/"));
            }
        }
        assert_eq!(seen, vec!["root", "root/user", "root/user/name"]);
    }

    #[test]
    fn test_text_and_attributes() {
        let mut reader = XmlReader::from_str(r#"<root id="a &amp; b">1 &lt; 2</root>"#);
        assert!(reader.read());
        assert_eq!(reader.attribute("id"), Some("a & b"));
        assert!(reader.read());
        assert_eq!(reader.node_type(), Some(NodeType::Text));
        assert_eq!(reader.value(), "1 < 2");
        assert_eq!(reader.depth(), 1);
        assert!(reader.read());
        assert_eq!(reader.node_type(), Some(NodeType::EndElement));
        assert!(!reader.read());
        assert!(!reader.has_failed());
    }

    #[test]
    fn test_namespaces_are_resolved() {
        let xml = r#"<f:root xmlns:f="urn:fizz"><f:num f:kind="odd"/><plain/></f:root>"#;
        let mut reader = XmlReader::from_str(xml);
        assert!(reader.read());
        assert_eq!(reader.local_name(), "root");
        assert_eq!(reader.namespace_uri(), Some("urn:fizz"));

        assert!(reader.read());
        assert_eq!(reader.name(), "f:num");
        let attribute = &reader.attributes()[0];
        assert_eq!(attribute.local_name, "kind");
        assert_eq!(attribute.namespace.as_deref(), Some("urn:fizz"));

        assert!(reader.read());
        assert_eq!(reader.namespace_uri(), None);
    }

    #[test]
    fn test_end_of_input_after_complete_document_is_clean() {
        let ((), issues) = collecting(|| {
            let mut reader = XmlReader::from_str("<?xml version=\"1.0\"?>\n<root/>\n");
            while reader.read() {}
            assert!(!reader.has_failed());
            assert_eq!(reader.declaration().map(|d| d.version.as_str()), Some("1.0"));
        });
        assert!(issues.is_empty());
    }

    #[test]
    fn test_empty_document_is_fatal() {
        let (failed, issues) = collecting(|| {
            let mut reader = XmlReader::from_str("   ");
            while reader.read() {}
            reader.has_failed()
        });
        assert!(failed);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity(), Severity::Fatal);
        assert_eq!(issues[0].message(), "Empty document");
    }

    #[test]
    fn test_extra_content_is_fatal() {
        let (count, issues) = collecting(|| {
            let mut reader = XmlReader::from_str("<a/><b/>");
            let mut count = 0;
            while reader.read() {
                count += 1;
            }
            count
        });
        assert_eq!(count, 1);
        assert_eq!(issues[0].message(), "Extra content at the end of the document");
        assert_eq!(issues[0].line(), Some(1));
        assert_eq!(issues[0].column(), Some(5));
    }

    #[test]
    fn test_unterminated_element_is_fatal() {
        let (failed, issues) = collecting(|| {
            let mut reader = XmlReader::from_str("<root>\n  <child>");
            while reader.read() {}
            reader.has_failed()
        });
        assert!(failed);
        assert!(!issues.is_empty());
        assert!(issues.iter().all(|issue| issue.severity() == Severity::Fatal));
    }

    #[test]
    fn test_mismatched_end_tag_is_fatal() {
        let (failed, issues) = collecting(|| {
            let mut reader = XmlReader::from_str("<root><a></b></root>");
            while reader.read() {}
            reader.has_failed()
        });
        assert!(failed);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity(), Severity::Fatal);
    }

    #[test]
    fn test_text_outside_root_is_fatal() {
        let (_, issues) = collecting(|| {
            let mut reader = XmlReader::from_str("<root/>trailing");
            while reader.read() {}
        });
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message(),
            "Text content is not allowed outside the document element"
        );
    }

    #[test]
    fn test_undefined_prefix_is_an_error_and_reading_continues() {
        let (count, issues) = collecting(|| {
            let mut reader = XmlReader::from_str("<root><x:a/></root>");
            let mut count = 0;
            while reader.read() {
                count += 1;
            }
            assert!(!reader.has_failed());
            count
        });
        assert_eq!(count, 3);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity(), Severity::Error);
        assert_eq!(issues[0].message(), "Namespace prefix x on x:a is not defined");
    }

    #[test]
    fn test_doctype_is_a_warning() {
        let (_, issues) = collecting(|| {
            let mut reader = XmlReader::from_str("<!DOCTYPE root>\n<root/>");
            while reader.read() {}
        });
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity(), Severity::Warning);
    }

    #[test]
    fn test_read_outer_xml_does_not_advance() {
        let mut reader =
            XmlReader::from_str("<root><user id=\"1\"><name>Ann</name></user><user/></root>");
        assert!(reader.read());
        assert!(reader.read());
        assert_eq!(
            reader.read_outer_xml().as_deref(),
            Some("<user id=\"1\"><name>Ann</name></user>")
        );
        assert_eq!(reader.name(), "user");

        assert!(reader.read());
        assert_eq!(reader.name(), "name");
        assert_eq!(reader.depth(), 2);
        assert!(reader.read());
        assert_eq!(reader.value(), "Ann");
        assert!(reader.read());
        assert!(reader.read());
        assert_eq!(reader.node_type(), Some(NodeType::EndElement));
        assert!(reader.read());
        assert_eq!(reader.read_outer_xml().as_deref(), Some("<user/>"));
        assert_eq!(reader.element().map(|e| e.position), Some(2));
    }

    #[test]
    fn test_read_outer_xml_carries_namespace_declarations() {
        let mut reader =
            XmlReader::from_str(r#"<f:root xmlns:f="urn:fizz"><f:num>3</f:num></f:root>"#);
        assert!(reader.read());
        assert!(reader.read());
        assert_eq!(
            reader.read_outer_xml().as_deref(),
            Some(r#"<f:num xmlns:f="urn:fizz">3</f:num>"#)
        );
    }

    #[test]
    fn test_read_outer_xml_over_broken_subtree() {
        let (result, issues) = collecting(|| {
            let mut reader = XmlReader::from_str("<root><a><b>text</a>");
            assert!(reader.read());
            assert!(reader.read());
            let outer = reader.read_outer_xml();
            // The buffered nodes are still handed out before reading stops.
            let mut remaining = 0;
            while reader.read() {
                remaining += 1;
            }
            (outer, remaining)
        });
        assert_eq!(result, (None, 2));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity(), Severity::Fatal);
    }

    #[test]
    fn test_from_file_missing() {
        let (reader, issues) = collecting(|| XmlReader::from_file("/nonexistent/input.xml"));
        assert!(reader.is_none());
        assert_eq!(
            issues[0].message(),
            "failed to load external entity \"/nonexistent/input.xml\""
        );
    }

    #[test]
    fn test_trim_text_config() {
        let config = ReaderConfig {
            trim_text: true,
            ..ReaderConfig::default()
        };
        let mut reader = XmlReader::from_str("<root>\n  <a/>\n</root>").with_config(&config);
        let mut kinds = Vec::new();
        while reader.read() {
            kinds.push(reader.node_type());
        }
        assert_eq!(
            kinds,
            vec![
                Some(NodeType::Element),
                Some(NodeType::Element),
                Some(NodeType::EndElement)
            ]
        );
    }
}

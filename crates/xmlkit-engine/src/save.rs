//! Serialize an [`XmlDocument`] back to markup.

use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use serde::{Deserialize, Serialize};

use crate::diagnostics;
use crate::error::EngineError;
use crate::tree::{Declaration, XmlDocument, XmlElement, XmlNode};

/// How a document is written out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveOptions {
    /// Indent nested elements by this many spaces. Whitespace-only text is
    /// dropped when indenting.
    pub indent: Option<usize>,

    /// Write the `<?xml ...?>` declaration.
    pub declaration: bool,

    /// Encoding named in the declaration, overriding the document's own.
    pub encoding: Option<String>,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            indent: None,
            declaration: true,
            encoding: None,
        }
    }
}

impl SaveOptions {
    pub fn pretty(indent: usize) -> Self {
        Self {
            indent: Some(indent),
            ..Self::default()
        }
    }
}

/// Serialize a whole document.
///
/// With a declaration the output ends in a newline, like most engines' save.
/// Returns `None` if writing failed; the failure is reported to the
/// diagnostic sink.
pub fn save(document: &XmlDocument, options: &SaveOptions) -> Option<String> {
    finish(write_document(document, options))
}

/// Serialize a single element and its subtree, without a declaration.
pub fn save_element(element: &XmlElement, options: &SaveOptions) -> Option<String> {
    let mut writer = new_writer(options);
    let result = write_element(&mut writer, element, options.indent.is_some())
        .map(|()| writer.into_inner());
    finish(result)
}

fn finish(result: Result<Vec<u8>, EngineError>) -> Option<String> {
    let bytes = match result {
        Ok(bytes) => bytes,
        Err(err) => {
            diagnostics::report(err.to_issue());
            return None;
        }
    };
    match String::from_utf8(bytes) {
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

fn new_writer(options: &SaveOptions) -> Writer<Vec<u8>> {
    match options.indent {
        Some(size) => Writer::new_with_indent(Vec::new(), b' ', size),
        None => Writer::new(Vec::new()),
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), EngineError> {
    writer.write_event(event).map_err(|err| EngineError::Io {
        message: err.to_string(),
    })
}

fn write_document(document: &XmlDocument, options: &SaveOptions) -> Result<Vec<u8>, EngineError> {
    let mut writer = new_writer(options);
    let pretty = options.indent.is_some();

    if options.declaration {
        let default = Declaration::default();
        let declaration = document.declaration.as_ref().unwrap_or(&default);
        let encoding = options.encoding.as_deref().or(declaration.encoding.as_deref());
        emit(
            &mut writer,
            Event::Decl(BytesDecl::new(
                &declaration.version,
                encoding,
                declaration.standalone.as_deref(),
            )),
        )?;
        if !pretty {
            writer.get_mut().push(b'\n');
        }
    }

    for node in &document.prolog {
        write_node(&mut writer, node, pretty)?;
    }
    write_element(&mut writer, &document.root, pretty)?;

    let mut bytes = writer.into_inner();
    if options.declaration {
        bytes.push(b'\n');
    }
    Ok(bytes)
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &XmlElement,
    pretty: bool,
) -> Result<(), EngineError> {
    let mut start = BytesStart::new(element.name.as_str());
    for attribute in &element.attributes {
        start.push_attribute((attribute.name.as_str(), attribute.value.as_str()));
    }

    let children: Vec<&XmlNode> = element
        .children
        .iter()
        .filter(|child| !(pretty && matches!(child, XmlNode::Text(t) if t.trim().is_empty())))
        .collect();

    if children.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    for child in children {
        write_node(writer, child, pretty)?;
    }
    emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

fn write_node(
    writer: &mut Writer<Vec<u8>>,
    node: &XmlNode,
    pretty: bool,
) -> Result<(), EngineError> {
    match node {
        XmlNode::Element(element) => write_element(writer, element, pretty),
        XmlNode::Text(text) => emit(writer, Event::Text(BytesText::new(text))),
        XmlNode::CData(text) => emit(writer, Event::CData(BytesCData::new(text.as_str()))),
        XmlNode::Comment(text) => {
            emit(writer, Event::Comment(BytesText::from_escaped(text.as_str())))
        }
        XmlNode::ProcessingInstruction { target, content } => {
            let body = if content.is_empty() {
                target.clone()
            } else {
                format!("{} {}", target, content)
            };
            emit(writer, Event::PI(BytesPI::new(body)))
        }
    }
}

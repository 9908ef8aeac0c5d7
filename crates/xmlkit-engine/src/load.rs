//! Build an [`XmlDocument`] from a reader.

use std::io::BufRead;

use crate::node::NodeType;
use crate::reader::XmlReader;
use crate::tree::{XmlAttribute, XmlDocument, XmlElement, XmlNode};

/// Read a whole document into memory.
///
/// Returns `None` if the reader stopped on a fatal problem. Problems are in
/// the diagnostic log; non-fatal ones (an undefined namespace prefix, a
/// bad entity reference) do not prevent the document from loading.
pub fn load<R: BufRead>(mut reader: XmlReader<R>) -> Option<XmlDocument> {
    let mut declaration = None;
    let mut prolog = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    while reader.read() {
        let Some(node_type) = reader.node_type() else {
            continue;
        };

        match node_type {
            NodeType::Element => {
                let Some(node) = reader.element() else {
                    continue;
                };
                let element = XmlElement {
                    name: node.name.clone(),
                    prefix: node.prefix.clone(),
                    namespace: node.namespace.clone(),
                    attributes: node
                        .attributes
                        .iter()
                        .map(|a| XmlAttribute {
                            name: a.name.clone(),
                            value: a.value.clone(),
                        })
                        .collect(),
                    children: Vec::new(),
                };

                if reader.is_empty_element() {
                    attach(element, &mut stack, &mut root);
                } else {
                    stack.push(element);
                }
            }
            NodeType::EndElement => {
                if let Some(element) = stack.pop() {
                    attach(element, &mut stack, &mut root);
                }
            }
            NodeType::Text | NodeType::Whitespace => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Text(reader.value().to_string()));
                }
            }
            NodeType::CData => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::CData(reader.value().to_string()));
                }
            }
            NodeType::Comment => {
                let comment = XmlNode::Comment(reader.value().to_string());
                push_misc(comment, &mut stack, &mut prolog, root.is_some());
            }
            NodeType::ProcessingInstruction => {
                let pi = XmlNode::ProcessingInstruction {
                    target: reader.name().to_string(),
                    content: reader.value().to_string(),
                };
                push_misc(pi, &mut stack, &mut prolog, root.is_some());
            }
            NodeType::XmlDeclaration => {
                declaration = reader.declaration().cloned();
            }
            NodeType::DocumentType => {}
        }
    }

    if reader.has_failed() {
        return None;
    }

    let root = root?;
    tracing::trace!(root = %root.name, "Loaded XML document");
    Some(XmlDocument {
        declaration,
        prolog,
        root,
    })
}

fn attach(element: XmlElement, stack: &mut [XmlElement], root: &mut Option<XmlElement>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => *root = Some(element),
    }
}

/// Comments and processing instructions after the document element are dropped.
fn push_misc(node: XmlNode, stack: &mut [XmlElement], prolog: &mut Vec<XmlNode>, after_root: bool) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if !after_root => prolog.push(node),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_simple_document() {
        let document = load(XmlReader::from_str(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><!-- head --><root a=\"1\"><b>text</b><c/></root>",
        ))
        .unwrap();

        let declaration = document.declaration.as_ref().unwrap();
        assert_eq!(declaration.version, "1.0");
        assert_eq!(declaration.encoding.as_deref(), Some("UTF-8"));
        assert_eq!(document.prolog, vec![XmlNode::Comment(" head ".to_string())]);
        assert_eq!(document.root.name, "root");
        assert_eq!(document.root.get_attribute("a"), Some("1"));
        assert_eq!(document.root.all_children().len(), 2);
        assert_eq!(document.root.get_children("b")[0].text(), "text");
    }

    #[test]
    fn test_load_keeps_mixed_content_in_order() {
        let document =
            load(XmlReader::from_str("<p>one <b>two</b> three<![CDATA[<four>]]></p>")).unwrap();
        assert_eq!(document.root.children.len(), 4);
        assert_eq!(document.root.text(), "one two three<four>");
    }

    #[test]
    fn test_load_fails_on_fatal_problem() {
        let previous = diagnostics::use_internal_errors(true);
        let offset = diagnostics::log_len();

        assert!(load(XmlReader::from_str("<root><unclosed></root>")).is_none());
        let issues = diagnostics::take_since(offset);
        assert!(!issues.is_empty());

        diagnostics::use_internal_errors(previous);
    }

    #[test]
    fn test_load_survives_non_fatal_problem() {
        let previous = diagnostics::use_internal_errors(true);
        let offset = diagnostics::log_len();

        let document = load(XmlReader::from_str("<root><x:a/></root>")).unwrap();
        assert_eq!(document.root.all_children()[0].name, "x:a");
        assert_eq!(diagnostics::take_since(offset).len(), 1);

        diagnostics::use_internal_errors(previous);
    }
}

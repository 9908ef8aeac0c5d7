//! In-memory document tree.

use serde::{Deserialize, Serialize};

/// A loaded XML document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlDocument {
    /// The `<?xml ...?>` declaration, if the input had one.
    pub declaration: Option<Declaration>,

    /// Comments and processing instructions before the document element.
    pub prolog: Vec<XmlNode>,

    /// The document element.
    pub root: XmlElement,
}

/// The XML declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl Default for Declaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: None,
            standalone: None,
        }
    }
}

/// An element with its attributes and content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlElement {
    /// Qualified name as written (`xsl:template`).
    pub name: String,

    /// Namespace prefix, if any.
    pub prefix: Option<String>,

    /// Resolved namespace URI, if any.
    pub namespace: Option<String>,

    /// Attributes in document order, namespace declarations included.
    pub attributes: Vec<XmlAttribute>,

    /// Child content in document order.
    pub children: Vec<XmlNode>,
}

/// An attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlAttribute {
    /// Qualified name as written (`xmlns:xsl`).
    pub name: String,

    /// The attribute value (after unescaping XML entities).
    pub value: String,
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum XmlNode {
    Element(XmlElement),
    /// Unescaped character data.
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction { target: String, content: String },
}

impl XmlDocument {
    pub fn new(root: XmlElement) -> Self {
        Self {
            declaration: None,
            prolog: Vec::new(),
            root,
        }
    }

    /// All elements in document order, the document element first.
    pub fn descendants(&self) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        collect_descendants(&self.root, &mut found);
        found
    }
}

fn collect_descendants<'a>(element: &'a XmlElement, found: &mut Vec<&'a XmlElement>) {
    found.push(element);
    for child in element.all_children() {
        collect_descendants(child, found);
    }
}

impl XmlElement {
    /// Create an element with no attributes and no children.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let prefix = name.split_once(':').map(|(prefix, _)| prefix.to_string());
        Self {
            name,
            prefix,
            namespace: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The name without its prefix.
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Get an attribute value by qualified name.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(XmlAttribute { name, value }),
        }
    }

    /// Check if this element has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Get child elements by qualified name.
    pub fn get_children(&self, name: &str) -> Vec<&XmlElement> {
        self.all_children()
            .into_iter()
            .filter(|e| e.name == name)
            .collect()
    }

    /// Get all child elements, ignoring text and other nodes.
    pub fn all_children(&self) -> Vec<&XmlElement> {
        self.children
            .iter()
            .filter_map(|c| match c {
                XmlNode::Element(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    /// Concatenated text of this element and its descendants.
    pub fn text(&self) -> String {
        let mut text = String::new();
        collect_text(self, &mut text);
        text
    }

    /// Remove whitespace-only text children, recursively.
    pub fn strip_whitespace(&mut self) {
        self.children
            .retain(|child| !matches!(child, XmlNode::Text(t) if t.trim().is_empty()));
        for child in &mut self.children {
            if let XmlNode::Element(element) = child {
                element.strip_whitespace();
            }
        }
    }
}

fn collect_text(element: &XmlElement, text: &mut String) {
    for child in &element.children {
        match child {
            XmlNode::Text(t) | XmlNode::CData(t) => text.push_str(t),
            XmlNode::Element(e) => collect_text(e, text),
            _ => {}
        }
    }
}

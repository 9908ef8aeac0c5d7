//! Reader node state.

/// The kind of node an [`XmlReader`](crate::XmlReader) is positioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// A start tag or an empty-element tag
    Element,
    EndElement,
    Text,
    /// Text made of whitespace only
    Whitespace,
    CData,
    Comment,
    ProcessingInstruction,
    XmlDeclaration,
    DocumentType,
}

/// An attribute as seen by the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeNode {
    /// Qualified name as written (`xlink:href`)
    pub name: String,
    pub local_name: String,
    pub prefix: Option<String>,
    /// Resolved namespace URI; unprefixed attributes have none
    pub namespace: Option<String>,
    /// Unescaped value
    pub value: String,
}

/// An element on the path from the document element to the reader's position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    /// Qualified name as written (`fizzbuzz:num`)
    pub name: String,
    pub local_name: String,
    pub prefix: Option<String>,
    /// Resolved namespace URI
    pub namespace: Option<String>,
    pub attributes: Vec<AttributeNode>,
    /// 1-based position among the element's parent's child elements
    pub position: usize,
}

impl ElementNode {
    /// Value of the attribute with the given qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }

    /// Whether an attribute with the given qualified name exists.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attribute| attribute.name == name)
    }
}

/// The chain of open elements, outermost first.
///
/// When the reader is positioned on an element, the last entry is that
/// element. Matchers inspect this to answer structural questions (name, depth,
/// ancestry, namespace) without needing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSequence {
    elements: Vec<ElementNode>,
}

impl NodeSequence {
    pub fn new(elements: Vec<ElementNode>) -> Self {
        Self { elements }
    }

    /// The innermost element.
    pub fn current(&self) -> Option<&ElementNode> {
        self.elements.last()
    }

    /// The parent of the innermost element.
    pub fn parent(&self) -> Option<&ElementNode> {
        self.elements.len().checked_sub(2).map(|index| &self.elements[index])
    }

    /// Number of elements in the chain.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[ElementNode] {
        &self.elements
    }

    /// The first `len` elements as their own sequence.
    pub fn prefix(&self, len: usize) -> NodeSequence {
        NodeSequence::new(self.elements[..len.min(self.elements.len())].to_vec())
    }

    pub(crate) fn push(&mut self, element: ElementNode) {
        self.elements.push(element);
    }

    pub(crate) fn pop(&mut self) -> Option<ElementNode> {
        self.elements.pop()
    }
}

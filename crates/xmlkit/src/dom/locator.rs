//! Finding elements in a [`Document`].

use xmlkit_engine::XmlElement;

use crate::dom::Document;

pub trait Locator {
    type Output<'a>;

    fn locate<'a>(&self, document: &'a Document) -> Self::Output<'a>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentElement;

impl Locator for DocumentElement {
    type Output<'a> = Option<&'a XmlElement>;

    fn locate<'a>(&self, document: &'a Document) -> Self::Output<'a> {
        document.to_unsafe_document().map(|tree| &tree.root)
    }
}

pub fn document_element() -> DocumentElement {
    DocumentElement
}

/// Matches the qualified name; `*` matches every element.
#[derive(Debug, Clone)]
pub struct ElementsWithTagname {
    name: String,
}

impl Locator for ElementsWithTagname {
    type Output<'a> = Vec<&'a XmlElement>;

    fn locate<'a>(&self, document: &'a Document) -> Self::Output<'a> {
        let Some(tree) = document.to_unsafe_document() else {
            return Vec::new();
        };
        tree.descendants()
            .into_iter()
            .filter(|element| self.name == "*" || element.name == self.name)
            .collect()
    }
}

/// All elements with this name, in document order.
pub fn elements_with_tagname(name: impl Into<String>) -> ElementsWithTagname {
    ElementsWithTagname { name: name.into() }
}

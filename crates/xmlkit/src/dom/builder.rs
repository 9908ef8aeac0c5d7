//! Adding nodes to a [`Document`].
//!
//! A [`Builder`] appends to the document and returns what it added. The
//! first element built into an empty document becomes its document element;
//! later ones are appended to the document element.
//!
//! ```rust
//! use xmlkit::dom::Document;
//! use xmlkit::dom::builder::{
//!     Builder, ElementConfigurator, attribute, children, element, new_element, value,
//! };
//!
//! let mut document = Document::empty();
//! let built = document
//!     .build([element(
//!         "root",
//!         [
//!             attribute("version", "2").boxed(),
//!             children([new_element("item", [value("one").boxed()])]).boxed(),
//!         ],
//!     )
//!     .boxed()])
//!     .unwrap();
//! assert_eq!(built.len(), 1);
//! assert_eq!(
//!     document.to_xml_string().unwrap(),
//!     "<?xml version=\"1.0\"?>\n<root version=\"2\"><item>one</item></root>\n"
//! );
//! ```

use xmlkit_engine::{XmlDocument, XmlElement, XmlNode};

use crate::dom::Document;
use crate::error_handling::RuntimeFault;

pub trait Builder {
    fn build(&self, document: &mut Document) -> Result<Vec<XmlNode>, RuntimeFault>;

    fn boxed(self) -> Box<dyn Builder>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

impl<F> Builder for F
where
    F: Fn(&mut Document) -> Result<Vec<XmlNode>, RuntimeFault>,
{
    fn build(&self, document: &mut Document) -> Result<Vec<XmlNode>, RuntimeFault> {
        self(document)
    }
}

/// Takes an element under construction and returns the next version of it.
pub trait ElementConfigurator {
    fn configure(&self, element: XmlElement) -> XmlElement;

    fn boxed(self) -> Box<dyn ElementConfigurator>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

impl<F> ElementConfigurator for F
where
    F: Fn(XmlElement) -> XmlElement,
{
    fn configure(&self, element: XmlElement) -> XmlElement {
        self(element)
    }
}

/// Build `name` and append it to the document.
///
/// Fails on a name that is not a valid XML name.
pub fn element<C>(name: &str, configurators: C) -> impl Builder + use<C>
where
    C: IntoIterator<Item = Box<dyn ElementConfigurator>>,
{
    let name = name.to_string();
    let configurators: Vec<_> = configurators.into_iter().collect();
    move |document: &mut Document| -> Result<Vec<XmlNode>, RuntimeFault> {
        if !is_valid_name(&name) {
            return Err(RuntimeFault::new(format!("Could not create element {}", name)));
        }
        let built = configure(XmlElement::new(name.as_str()), &configurators);
        let node = XmlNode::Element(built.clone());
        let slot = document.tree_mut();
        if let Some(tree) = slot.as_mut() {
            tree.root.children.push(node.clone());
        } else {
            *slot = Some(XmlDocument::new(built));
        }
        tracing::debug!(element = %name, "Built element");
        Ok(vec![node])
    }
}

/// A detached element, for nesting with [`children`].
pub fn new_element(
    name: &str,
    configurators: impl IntoIterator<Item = Box<dyn ElementConfigurator>>,
) -> XmlElement {
    let configurators: Vec<_> = configurators.into_iter().collect();
    configure(XmlElement::new(name), &configurators)
}

pub fn attribute(name: &str, value: &str) -> impl ElementConfigurator + use<> {
    let name = name.to_string();
    let value = value.to_string();
    move |mut element: XmlElement| {
        element.set_attribute(name.as_str(), value.as_str());
        element
    }
}

/// Append a text node.
pub fn value(text: &str) -> impl ElementConfigurator + use<> {
    let text = text.to_string();
    move |mut element: XmlElement| {
        element.children.push(XmlNode::Text(text.clone()));
        element
    }
}

pub fn children(elements: impl IntoIterator<Item = XmlElement>) -> impl ElementConfigurator {
    let nodes: Vec<XmlNode> = elements.into_iter().map(XmlNode::Element).collect();
    move |mut element: XmlElement| {
        element.children.extend(nodes.iter().cloned());
        element
    }
}

fn configure(element: XmlElement, configurators: &[Box<dyn ElementConfigurator>]) -> XmlElement {
    configurators
        .iter()
        .fold(element, |element, configurator| configurator.configure(element))
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}

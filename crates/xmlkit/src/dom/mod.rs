//! In-memory documents.
//!
//! A [`Document`] is built by folding an ordered list of [`Configurator`]s
//! over an empty document. Loading is itself a configurator step, so
//! `Document::from_xml_string(xml, [pretty_print().boxed()])` loads first
//! and pretty-prints second.
//!
//! ```rust
//! use xmlkit::dom::configurator::{Configurator, pretty_print};
//! use xmlkit::dom::Document;
//!
//! let document =
//!     Document::from_xml_string("<root><a>1</a></root>", [pretty_print().boxed()]).unwrap();
//! assert_eq!(
//!     document.to_xml_string().unwrap(),
//!     "<?xml version=\"1.0\"?>\n<root>\n  <a>1</a>\n</root>\n"
//! );
//! ```

pub mod builder;
pub mod configurator;
pub mod loader;
pub mod locator;
pub mod mapper;
pub mod traverser;

use std::path::Path;

use xmlkit_engine::{XmlDocument, XmlElement, XmlNode};

use crate::error_handling::RuntimeFault;
use builder::Builder;
use configurator::{Configurator, loader};
use loader::{xml_file_loader, xml_node_loader, xml_string_loader};
use locator::Locator;
use traverser::Visitor;

/// Output and whitespace settings carried by a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Keep whitespace-only text nodes when loading.
    pub preserve_white_space: bool,
    /// Indent the output of [`mapper::xml_string`].
    pub format_output: bool,
    pub indent: usize,
    /// Encoding written into the declaration.
    pub encoding: Option<String>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            preserve_white_space: true,
            format_output: false,
            indent: 2,
            encoding: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    tree: Option<XmlDocument>,
    options: DocumentOptions,
}

impl Document {
    /// A document with nothing loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Apply `configurators` in order to an empty document.
    pub fn configure(
        configurators: impl IntoIterator<Item = Box<dyn Configurator>>,
    ) -> Result<Self, RuntimeFault> {
        Self::empty().apply(configurators)
    }

    pub fn from_xml_string(
        xml: impl Into<String>,
        configurators: impl IntoIterator<Item = Box<dyn Configurator>>,
    ) -> Result<Self, RuntimeFault> {
        let load = loader(xml_string_loader(xml.into())).boxed();
        Self::configure(std::iter::once(load).chain(configurators))
    }

    pub fn from_xml_file(
        path: impl AsRef<Path>,
        configurators: impl IntoIterator<Item = Box<dyn Configurator>>,
    ) -> Result<Self, RuntimeFault> {
        let load = loader(xml_file_loader(path.as_ref().to_path_buf())).boxed();
        Self::configure(std::iter::once(load).chain(configurators))
    }

    /// A document whose document element is a copy of `element`.
    pub fn from_xml_node(
        element: &XmlElement,
        configurators: impl IntoIterator<Item = Box<dyn Configurator>>,
    ) -> Result<Self, RuntimeFault> {
        let load = loader(xml_node_loader(element.clone())).boxed();
        Self::configure(std::iter::once(load).chain(configurators))
    }

    /// Wrap an engine tree as is, then apply `configurators`.
    pub fn from_unsafe_document(
        tree: XmlDocument,
        configurators: impl IntoIterator<Item = Box<dyn Configurator>>,
    ) -> Result<Self, RuntimeFault> {
        Self {
            tree: Some(tree),
            options: DocumentOptions::default(),
        }
        .apply(configurators)
    }

    fn apply(
        self,
        configurators: impl IntoIterator<Item = Box<dyn Configurator>>,
    ) -> Result<Self, RuntimeFault> {
        configurators
            .into_iter()
            .enumerate()
            .try_fold(self, |document, (step, configurator)| {
                tracing::debug!(step, "Applying document configurator");
                configurator.configure(document)
            })
    }

    /// The engine tree, if anything has been loaded.
    pub fn to_unsafe_document(&self) -> Option<&XmlDocument> {
        self.tree.as_ref()
    }

    pub fn into_unsafe_document(self) -> Option<XmlDocument> {
        self.tree
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut DocumentOptions {
        &mut self.options
    }

    pub(crate) fn tree_mut(&mut self) -> &mut Option<XmlDocument> {
        &mut self.tree
    }

    pub fn locate<'a, L: Locator>(&'a self, locator: L) -> L::Output<'a> {
        locator.locate(self)
    }

    /// Change the document in place.
    pub fn manipulate(mut self, manipulator: impl FnOnce(&mut Document)) -> Self {
        manipulator(&mut self);
        self
    }

    /// The document element, for manipulators.
    pub fn document_element_mut(&mut self) -> Option<&mut XmlElement> {
        self.tree.as_mut().map(|tree| &mut tree.root)
    }

    /// Run `builders` in order and return every node they added.
    pub fn build(
        &mut self,
        builders: impl IntoIterator<Item = Box<dyn Builder>>,
    ) -> Result<Vec<XmlNode>, RuntimeFault> {
        builders
            .into_iter()
            .enumerate()
            .try_fold(Vec::new(), |mut built, (step, builder)| {
                tracing::debug!(step, "Running document builder");
                built.extend(builder.build(self)?);
                Ok(built)
            })
    }

    /// Walk the tree depth-first with `visitors` and return the document
    /// element. Removing the document element leaves the document empty.
    pub fn traverse(&mut self, visitors: &[&dyn Visitor]) -> Option<&XmlElement> {
        if let Some(mut tree) = self.tree.take() {
            if let Some(root) = traverser::traverse_root(tree.root, visitors) {
                tree.root = root;
                self.tree = Some(tree);
            }
        }
        self.tree.as_ref().map(|tree| &tree.root)
    }

    pub fn map<T>(&self, mapper: impl FnOnce(&Document) -> T) -> T {
        mapper(self)
    }

    pub fn to_xml_string(&self) -> Result<String, RuntimeFault> {
        self.map(mapper::xml_string())
    }
}

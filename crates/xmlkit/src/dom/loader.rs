//! Filling a [`Document`] from a source.
//!
//! Loaders run with diagnostics collected. Any error the engine records
//! while loading fails the load, even when the engine still produced a tree.

use std::path::{Path, PathBuf};

use xmlkit_engine::{XmlDocument, XmlElement, XmlReader, load};

use crate::dom::Document;
use crate::dom::configurator::strip_whitespace;
use crate::error_handling::{RuntimeFault, disallow_issues, guard};

const LOAD_FAILED: &str = "Could not load the DOM Document";

pub trait Loader {
    fn load(&self, document: &mut Document) -> Result<(), RuntimeFault>;
}

impl<F> Loader for F
where
    F: Fn(&mut Document) -> Result<(), RuntimeFault>,
{
    fn load(&self, document: &mut Document) -> Result<(), RuntimeFault> {
        self(document)
    }
}

pub(crate) fn ensure_file_exists(path: &Path) -> Result<(), RuntimeFault> {
    if path.is_file() {
        return Ok(());
    }
    Err(RuntimeFault::new(format!(
        "The file \"{}\" does not exist",
        path.display()
    )))
}

fn install(document: &mut Document, tree: XmlDocument) {
    *document.tree_mut() = Some(tree);
    if !document.options().preserve_white_space {
        strip_whitespace(document);
    }
}

pub fn xml_string_loader(xml: impl Into<String>) -> impl Loader {
    let xml = xml.into();
    move |document: &mut Document| -> Result<(), RuntimeFault> {
        let tree = disallow_issues(|| guard(load(XmlReader::from_str(&xml)), LOAD_FAILED))?;
        tracing::debug!(bytes = xml.len(), "Loaded document from string");
        install(document, tree);
        Ok(())
    }
}

pub fn xml_file_loader(path: impl AsRef<Path>) -> impl Loader {
    let path: PathBuf = path.as_ref().to_path_buf();
    move |document: &mut Document| -> Result<(), RuntimeFault> {
        ensure_file_exists(&path)?;
        let tree = disallow_issues(|| {
            let reader = guard(XmlReader::from_file(&path), LOAD_FAILED)?;
            guard(load(reader), LOAD_FAILED)
        })?;
        tracing::debug!(path = %path.display(), "Loaded document from file");
        install(document, tree);
        Ok(())
    }
}

/// Use a copy of `element` as the document element.
pub fn xml_node_loader(element: XmlElement) -> impl Loader {
    move |document: &mut Document| -> Result<(), RuntimeFault> {
        install(document, XmlDocument::new(element.clone()));
        Ok(())
    }
}

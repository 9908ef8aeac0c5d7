//! Steps applied while building a [`Document`].

use crate::dom::Document;
use crate::dom::loader::Loader;
use crate::error_handling::RuntimeFault;

/// Takes a document and returns the next version of it.
pub trait Configurator {
    fn configure(&self, document: Document) -> Result<Document, RuntimeFault>;

    fn boxed(self) -> Box<dyn Configurator>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

impl<F> Configurator for F
where
    F: Fn(Document) -> Result<Document, RuntimeFault>,
{
    fn configure(&self, document: Document) -> Result<Document, RuntimeFault> {
        self(document)
    }
}

/// Run a [`Loader`] as a configuration step.
pub fn loader(loader: impl Loader) -> impl Configurator {
    move |mut document: Document| -> Result<Document, RuntimeFault> {
        loader.load(&mut document)?;
        Ok(document)
    }
}

/// Drop whitespace-only text and write output without indentation.
pub fn trim_spaces() -> impl Configurator {
    |mut document: Document| -> Result<Document, RuntimeFault> {
        let options = document.options_mut();
        options.preserve_white_space = false;
        options.format_output = false;
        strip_whitespace(&mut document);
        Ok(document)
    }
}

/// Drop whitespace-only text and indent the output.
pub fn pretty_print() -> impl Configurator {
    |mut document: Document| -> Result<Document, RuntimeFault> {
        let options = document.options_mut();
        options.preserve_white_space = false;
        options.format_output = true;
        strip_whitespace(&mut document);
        Ok(document)
    }
}

/// Declare the document as UTF-8.
pub fn utf8() -> impl Configurator {
    |mut document: Document| -> Result<Document, RuntimeFault> {
        document.options_mut().encoding = Some("UTF-8".to_string());
        if let Some(tree) = document.tree_mut() {
            tree.declaration.get_or_insert_with(Default::default).encoding =
                Some("UTF-8".to_string());
        }
        Ok(document)
    }
}

pub(crate) fn strip_whitespace(document: &mut Document) {
    if let Some(root) = document.document_element_mut() {
        root.strip_whitespace();
    }
}

//! Turning a [`Document`] into something else.

use xmlkit_engine::{Declaration, SaveOptions, XmlElement, save, save_element};

use crate::dom::{Document, DocumentOptions};
use crate::error_handling::{RuntimeFault, disallow_issues, guard};

const OUTPUT_FAILED: &str = "Unable to output XML as string";

fn save_options(options: &DocumentOptions) -> SaveOptions {
    SaveOptions {
        indent: options.format_output.then_some(options.indent),
        declaration: true,
        encoding: options.encoding.clone(),
    }
}

/// The whole document as markup, declaration included.
///
/// A document with nothing loaded maps to the bare declaration.
pub fn xml_string() -> impl Fn(&Document) -> Result<String, RuntimeFault> {
    |document: &Document| {
        let options = save_options(document.options());
        let Some(tree) = document.to_unsafe_document() else {
            return Ok(empty_declaration(&options));
        };
        disallow_issues(|| guard(save(tree, &options), OUTPUT_FAILED))
    }
}

/// A single element as markup, without a declaration. Uses the output
/// settings of `document`.
pub fn element_xml_string(
    document: &Document,
    element: &XmlElement,
) -> Result<String, RuntimeFault> {
    let options = SaveOptions {
        declaration: false,
        ..save_options(document.options())
    };
    disallow_issues(|| guard(save_element(element, &options), OUTPUT_FAILED))
}

fn empty_declaration(options: &SaveOptions) -> String {
    let declaration = Declaration::default();
    match options.encoding.as_deref() {
        Some(encoding) => format!(
            "<?xml version=\"{}\" encoding=\"{}\"?>\n",
            declaration.version, encoding
        ),
        None => format!("<?xml version=\"{}\"?>\n", declaration.version),
    }
}

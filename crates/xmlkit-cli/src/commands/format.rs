//! Format command implementation

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use xmlkit::RuntimeFault;
use xmlkit::dom::Document;
use xmlkit::dom::configurator::{Configurator, pretty_print};

use super::report;
use crate::config::ReportFormat;

#[derive(Debug)]
pub struct FormatArgs {
    pub file: PathBuf,
    pub indent: usize,
}

pub fn execute(args: &FormatArgs, out: &mut impl Write) -> Result<()> {
    let indent = args.indent;
    let with_indent = move |mut document: Document| -> Result<Document, RuntimeFault> {
        document.options_mut().indent = indent;
        Ok(document)
    };

    let formatted =
        Document::from_xml_file(&args.file, [pretty_print().boxed(), with_indent.boxed()])
            .and_then(|document| document.to_xml_string());

    match formatted {
        Ok(xml) => {
            write!(out, "{}", xml)?;
            Ok(())
        }
        Err(fault) => {
            if !fault.issues().is_empty() {
                eprintln!("{}", report(fault.issues(), &args.file, ReportFormat::Text));
            }
            anyhow::bail!("{}", fault.message())
        }
    }
}

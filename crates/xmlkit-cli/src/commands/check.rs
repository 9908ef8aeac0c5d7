//! Check command implementation

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use xmlkit::dom::Document;
use xmlkit::dom::locator::elements_with_tagname;
use xmlkit::{RuntimeFault, guard, run_scoped};
use xmlkit_engine::{XmlReader, load};

use super::report;
use crate::config::ReportFormat;

#[derive(Debug)]
pub struct CheckArgs {
    pub file: PathBuf,
    pub format: ReportFormat,
}

/// Load the file, print every issue the engine recorded, and fail if any of
/// them is an error.
pub fn execute(args: &CheckArgs, out: &mut impl Write) -> Result<()> {
    let (loaded, issues) = run_scoped(|| -> Result<Document, RuntimeFault> {
        let reader = guard(XmlReader::from_file(&args.file), "Could not open the file")?;
        let tree = guard(load(reader), "Could not load the DOM Document")?;
        Document::from_unsafe_document(tree, [])
    });

    if args.format == ReportFormat::Json {
        writeln!(out, "{}", report(&issues, &args.file, args.format))?;
    } else if !issues.is_empty() {
        write!(out, "{}", report(&issues, &args.file, args.format))?;
    }

    match loaded {
        Ok(document) if !issues.has_errors() => {
            let elements = document.locate(elements_with_tagname("*")).len();
            tracing::debug!(elements, warnings = issues.len(), "Checked document");
            if args.format == ReportFormat::Text {
                writeln!(out, "{}: ok ({} elements)", args.file.display(), elements)?;
            }
            Ok(())
        }
        Ok(_) => anyhow::bail!("{} has errors", args.file.display()),
        Err(fault) => anyhow::bail!("{}: {}", args.file.display(), fault.message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(xml: &str, format: ReportFormat) -> (Result<()>, String) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("input.xml");
        std::fs::write(&file, xml).unwrap();

        let mut out = Vec::new();
        let result = execute(&CheckArgs { file: file.clone(), format }, &mut out);
        let output = String::from_utf8(out)
            .unwrap()
            .replace(&file.display().to_string(), "input.xml");
        (result, output)
    }

    #[test]
    fn test_well_formed_file() {
        let (result, output) = run("<root><a/><b/></root>", ReportFormat::Text);
        assert!(result.is_ok());
        assert_eq!(output, "input.xml: ok (3 elements)\n");
    }

    #[test]
    fn test_malformed_file_fails_with_report() {
        let (result, output) = run("<root><a></root>", ReportFormat::Json);
        let err = result.unwrap_err();
        assert!(err.to_string().ends_with("Could not load the DOM Document"));

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json[0]["severity"], "fatal");
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let (result, output) = run("<?xml version=\"1.1\"?><root/>", ReportFormat::Json);
        assert!(result.is_ok());
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json[0]["severity"], "warning");
    }
}

//! Extract command implementation

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use xmlkit::reader::Reader;
use xmlkit::reader::matcher::{Matcher, element_name, namespaced_element};
use xmlkit_engine::ReaderConfig;

use super::report;
use crate::config::ReportFormat;

#[derive(Debug)]
pub struct ExtractArgs {
    pub file: PathBuf,
    pub element: String,
    pub namespace: Option<String>,
    pub limit: Option<usize>,
    pub format: ReportFormat,
}

/// Stream matching elements to `out` and issue reports to `diagnostics`.
///
/// On a malformed file, everything found before the problem is still
/// written. A `--limit` stop never fails, but errors already seen in the
/// streamed part are reported under their own heading.
pub fn execute(
    args: &ExtractArgs,
    reader_config: &ReaderConfig,
    out: &mut impl Write,
    diagnostics: &mut impl Write,
) -> Result<()> {
    let reader = Reader::from_xml_file(&args.file)
        .map_err(|fault| anyhow::anyhow!("{}", fault.message()))?
        .with_config(reader_config.clone());

    let matcher = match &args.namespace {
        Some(namespace) => namespaced_element(namespace.as_str(), args.element.as_str()).boxed(),
        None => element_name(args.element.as_str()).boxed(),
    };

    let mut cursor = reader.provide(matcher);
    let limit = args.limit.unwrap_or(usize::MAX);
    let mut extracted = 0;

    while extracted < limit {
        match cursor.next() {
            Some(Ok(item)) => {
                writeln!(out, "{}", item)?;
                extracted += 1;
            }
            Some(Err(fault)) => {
                out.flush()?;
                writeln!(diagnostics, "{}", report(fault.issues(), &args.file, args.format))?;
                anyhow::bail!(
                    "{}: {} after {} elements",
                    args.file.display(),
                    fault.message(),
                    extracted
                );
            }
            None => break,
        }
    }

    let issues = cursor.issues();
    if issues.has_errors() {
        if args.format == ReportFormat::Text {
            writeln!(
                diagnostics,
                "{}: errors before the limit of {} elements:",
                args.file.display(),
                extracted
            )?;
        }
        writeln!(diagnostics, "{}", report(&issues, &args.file, args.format))?;
    } else if !issues.is_empty() {
        writeln!(diagnostics, "{}", report(&issues, &args.file, args.format))?;
    }
    tracing::info!(extracted, issues = issues.len(), "Extracted elements");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Run {
        result: Result<()>,
        output: String,
        diagnostics: String,
    }

    fn run(xml: &str, args: impl FnOnce(PathBuf) -> ExtractArgs) -> Run {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("input.xml");
        std::fs::write(&file, xml).unwrap();

        let mut out = Vec::new();
        let mut diagnostics = Vec::new();
        let result = execute(&args(file), &ReaderConfig::default(), &mut out, &mut diagnostics);
        Run {
            result,
            output: String::from_utf8(out).unwrap(),
            diagnostics: String::from_utf8(diagnostics).unwrap(),
        }
    }

    fn args(element: &str) -> impl FnOnce(PathBuf) -> ExtractArgs {
        let element = element.to_string();
        move |file| ExtractArgs {
            file,
            element,
            namespace: None,
            limit: None,
            format: ReportFormat::Text,
        }
    }

    #[test]
    fn test_extracts_every_match() {
        let run = run("<r><a>1</a><b/><a>2</a></r>", args("a"));
        assert!(run.result.is_ok());
        assert_eq!(run.output, "<a>1</a>\n<a>2</a>\n");
        assert_eq!(run.diagnostics, "");
    }

    #[test]
    fn test_limit() {
        let run = run("<r><a>1</a><a>2</a><a>3</a></r>", |file| ExtractArgs {
            limit: Some(2),
            ..args("a")(file)
        });
        assert!(run.result.is_ok());
        assert_eq!(run.output, "<a>1</a>\n<a>2</a>\n");
    }

    #[test]
    fn test_errors_before_the_limit_are_labelled() {
        let run = run("<r><a>1</a><x:b/><a>2</a><a>3</a></r>", |file| ExtractArgs {
            limit: Some(2),
            ..args("a")(file)
        });
        assert!(run.result.is_ok());
        assert_eq!(run.output, "<a>1</a>\n<a>2</a>\n");
        let heading = run.diagnostics.lines().next().unwrap();
        assert!(heading.ends_with("input.xml: errors before the limit of 2 elements:"));
    }

    #[test]
    fn test_errors_before_the_limit_as_json() {
        let run = run("<r><a>1</a><x:b/><a>2</a><a>3</a></r>", |file| ExtractArgs {
            limit: Some(2),
            format: ReportFormat::Json,
            ..args("a")(file)
        });
        let json: serde_json::Value = serde_json::from_str(&run.diagnostics).unwrap();
        assert_eq!(json[0]["severity"], "error");
    }

    #[test]
    fn test_warnings_are_reported_without_heading() {
        let run = run("<?xml version=\"1.1\"?><r><a>1</a></r>", |file| ExtractArgs {
            format: ReportFormat::Json,
            ..args("a")(file)
        });
        assert!(run.result.is_ok());
        let json: serde_json::Value = serde_json::from_str(&run.diagnostics).unwrap();
        assert_eq!(json[0]["severity"], "warning");
    }

    #[test]
    fn test_namespace() {
        let run = run(r#"<r xmlns:x="urn:x"><x:a>1</x:a><a>2</a></r>"#, |file| ExtractArgs {
            namespace: Some("urn:x".to_string()),
            ..args("a")(file)
        });
        assert_eq!(run.output, "<x:a xmlns:x=\"urn:x\">1</x:a>\n");
    }

    #[test]
    fn test_items_before_fault_are_written() {
        let run = run("<r><a>1</a><a>2</b></r>", args("a"));
        assert_eq!(run.output, "<a>1</a>\n");
        assert!(!run.diagnostics.is_empty());
        assert!(run.result.unwrap_err().to_string().ends_with("after 1 elements"));
    }

    #[test]
    fn test_missing_file() {
        let args = args("a")(PathBuf::from("/definitely/not/here.xml"));
        let err = execute(&args, &ReaderConfig::default(), &mut Vec::new(), &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "The file \"/definitely/not/here.xml\" does not exist");
    }
}

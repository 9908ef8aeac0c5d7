//! Command implementations for the xmlkit CLI
//!
//! Commands write their regular output to the writer they are given. Issue
//! reports go to stderr, or to the diagnostics writer where a command takes
//! one.

pub mod check;
pub mod extract;
pub mod format;

use std::path::Path;

use xmlkit::IssueCollection;

use crate::config::ReportFormat;

/// Issues as text, with source snippets when the file can still be read.
pub fn report(issues: &IssueCollection, file: &Path, format: ReportFormat) -> String {
    match format {
        ReportFormat::Json => issues.to_json().to_string(),
        ReportFormat::Text => match std::fs::read_to_string(file) {
            Ok(source) => issues.render_with_source(&file.display().to_string(), &source),
            Err(_) => issues.to_text(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmlkit::{Issue, Severity};

    #[test]
    fn test_json_report() {
        let issues = IssueCollection::new(vec![
            Issue::engine(Severity::Error, "bad").with_location(1, 2),
        ]);
        let json: serde_json::Value =
            serde_json::from_str(&report(&issues, Path::new("x.xml"), ReportFormat::Json)).unwrap();
        assert_eq!(json[0]["message"], "bad");
    }

    #[test]
    fn test_text_report_without_source() {
        let issues = IssueCollection::new(vec![Issue::engine(Severity::Warning, "odd")]);
        assert_eq!(
            report(&issues, Path::new("/definitely/not/here.xml"), ReportFormat::Text),
            "[WARNING] odd"
        );
    }
}

//! Source-context rendering with ariadne.

use crate::collection::IssueCollection;
use crate::issue::{Issue, Severity};
use ariadne::{Config, Label, Report, ReportKind, Source};

impl IssueCollection {
    /// Render every issue against the XML text it was reported for.
    ///
    /// Issues with a line and column get an ariadne snippet pointing at that
    /// position; issues without a location (or with one outside `source`) fall
    /// back to their plain one-line form. Output is uncoloured so it can be
    /// written to logs and files.
    pub fn render_with_source(&self, name: &str, source: &str) -> String {
        let mut result = String::new();

        for issue in self.iter() {
            match render_issue(issue, name, source) {
                Some(snippet) => result.push_str(&snippet),
                None => {
                    result.push_str(&issue.to_string());
                    result.push('\n');
                }
            }
        }

        result
    }
}

fn render_issue(issue: &Issue, name: &str, source: &str) -> Option<String> {
    let offset = char_offset(source, issue.line()?, issue.column()?)?;
    let end = (offset + 1).min(source.chars().count()).max(offset);

    let kind = match issue.severity() {
        Severity::Warning => ReportKind::Warning,
        Severity::Error | Severity::Fatal => ReportKind::Error,
    };

    let id = name.to_string();
    let report = Report::build(kind, id.clone(), offset)
        .with_config(Config::default().with_color(false))
        .with_message(issue.message())
        .with_label(Label::new((id.clone(), offset..end)).with_message(issue.severity().as_str()))
        .finish();

    let mut output = Vec::new();
    report
        .write((id, Source::from(source)), &mut output)
        .ok()?;

    String::from_utf8(output).ok()
}

/// Convert a 1-based line and 1-based byte column into the char offset ariadne
/// expects.
fn char_offset(source: &str, line: u64, column: u64) -> Option<usize> {
    let line_index = usize::try_from(line.checked_sub(1)?).ok()?;
    let column_index = usize::try_from(column.checked_sub(1)?).ok()?;

    let mut chars_before = 0usize;
    for (index, text) in source.split('\n').enumerate() {
        if index == line_index {
            let byte_column = column_index.min(text.len());
            let prefix = text.get(..byte_column)?;
            return Some(chars_before + prefix.chars().count());
        }
        // +1 for the newline itself
        chars_before += text.chars().count() + 1;
    }

    None
}

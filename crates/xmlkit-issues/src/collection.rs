//! Ordered, immutable collections of issues.

use crate::issue::{Issue, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered collection of [`Issue`]s.
///
/// Insertion order is emission order and is preserved by every operation.
/// A collection is built once (usually when a capture scope is drained) and
/// never modified afterwards; [`IssueCollection::merge`] returns a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueCollection {
    issues: Vec<Issue>,
}

impl IssueCollection {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.issues.iter()
    }

    pub fn as_slice(&self) -> &[Issue] {
        &self.issues
    }

    /// Whether any issue is an `Error` or worse.
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(Issue::is_error)
    }

    /// Whether any issue is `Fatal`.
    pub fn has_fatal(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity() == Severity::Fatal)
    }

    /// The most severe level present, if any.
    pub fn highest_severity(&self) -> Option<Severity> {
        self.issues.iter().map(Issue::severity).max()
    }

    /// Issues at or above `minimum`, in their original order.
    pub fn filter_severity(&self, minimum: Severity) -> IssueCollection {
        self.issues
            .iter()
            .filter(|issue| issue.severity() >= minimum)
            .cloned()
            .collect()
    }

    /// A new collection holding `self`'s issues followed by `other`'s.
    pub fn merge(&self, other: &IssueCollection) -> IssueCollection {
        self.issues
            .iter()
            .chain(other.issues.iter())
            .cloned()
            .collect()
    }

    /// Render as text, one issue per line, in emission order.
    ///
    /// # Example
    ///
    /// ```
    /// use xmlkit_issues::{Issue, IssueCollection, Severity};
    ///
    /// let issues = IssueCollection::new(vec![
    ///     Issue::engine(Severity::Warning, "first"),
    ///     Issue::engine(Severity::Error, "second").with_location(2, 4),
    /// ]);
    /// assert_eq!(issues.to_text(), "[WARNING] first\n[ERROR] second on line 2, column 4");
    /// ```
    pub fn to_text(&self) -> String {
        self.issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render as a JSON array.
    ///
    /// ```
    /// use xmlkit_issues::{Issue, IssueCollection, Severity};
    ///
    /// let issues = IssueCollection::new(vec![Issue::engine(Severity::Fatal, "boom")]);
    /// let json = issues.to_json();
    /// assert_eq!(json[0]["severity"], "fatal");
    /// assert_eq!(json[0]["message"], "boom");
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self.issues)
    }
}

impl fmt::Display for IssueCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<Vec<Issue>> for IssueCollection {
    fn from(issues: Vec<Issue>) -> Self {
        Self::new(issues)
    }
}

impl FromIterator<Issue> for IssueCollection {
    fn from_iter<I: IntoIterator<Item = Issue>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for IssueCollection {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl<'a> IntoIterator for &'a IssueCollection {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}

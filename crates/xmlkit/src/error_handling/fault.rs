//! The error type raised from engine diagnostics.

use thiserror::Error;
use xmlkit_issues::IssueCollection;

/// A failure carrying the issues that explain it.
///
/// Raised by [`guard`](super::guard), by the stream cursor when its input
/// turns out to be malformed, and by [`disallow_issues`](super::disallow_issues).
/// Display shows the message followed by every issue, one per line, in the
/// order the engine reported them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", format_issues(.issues))]
pub struct RuntimeFault {
    message: String,
    issues: IssueCollection,
}

fn format_issues(issues: &IssueCollection) -> String {
    issues.iter().map(|issue| format!("\n{}", issue)).collect()
}

impl RuntimeFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            issues: IssueCollection::empty(),
        }
    }

    pub fn with_issues(message: impl Into<String>, issues: IssueCollection) -> Self {
        Self {
            message: message.into(),
            issues,
        }
    }

    /// A fault whose only explanation is the issues themselves.
    pub fn from_issues(issues: IssueCollection) -> Self {
        Self::with_issues("Detected issues", issues)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn issues(&self) -> &IssueCollection {
        &self.issues
    }

    pub fn into_issues(self) -> IssueCollection {
        self.issues
    }
}

/// Errors that can carry the issues drained from a capture scope.
///
/// Used by [`try_run_scoped`](super::try_run_scoped) and
/// [`disallow_issues`](super::disallow_issues) when the wrapped action fails.
pub trait AttachIssues {
    fn attach_issues(self, issues: IssueCollection) -> Self;
}

impl AttachIssues for RuntimeFault {
    /// A fault that already explains itself keeps its own issues; one raised
    /// without any takes the scope's.
    fn attach_issues(self, issues: IssueCollection) -> Self {
        if self.issues.is_empty() {
            Self { issues, ..self }
        } else {
            self
        }
    }
}

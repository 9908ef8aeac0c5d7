//! Structured diagnostics for the xmlkit toolkit.
//!
//! Every problem the XML engine (or the toolkit itself) notices is recorded as
//! an [`Issue`]: a severity, a message, where it came from and, when known, the
//! line and column it points at. Issues are gathered into an
//! [`IssueCollection`], which keeps them in the order they were emitted. That
//! order matters: when a streaming read fails, it tells which issue belongs to
//! which already-read chunk.
//!
//! # Example
//!
//! ```
//! use xmlkit_issues::{Issue, IssueCollection, Severity};
//!
//! let issues = IssueCollection::new(vec![
//!     Issue::engine(Severity::Warning, "Unsupported version '1.1'").with_location(1, 1),
//!     Issue::engine(Severity::Fatal, "Premature end of data in tag root").with_location(3, 7),
//! ]);
//!
//! assert!(issues.has_errors());
//! assert!(issues.has_fatal());
//! assert_eq!(issues.highest_severity(), Some(Severity::Fatal));
//! ```
//!
//! # Rendering
//!
//! - [`IssueCollection::to_text`]: one line per issue, in emission order
//! - [`IssueCollection::to_json`]: machine-readable output
//! - [`IssueCollection::render_with_source`]: ariadne source snippets for
//!   issues that carry a location

pub mod collection;
pub mod issue;
pub mod render;

pub use collection::IssueCollection;
pub use issue::{Issue, IssueSource, Severity};

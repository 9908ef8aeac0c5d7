//! An XML toolkit layered over [`xmlkit_engine`].
//!
//! The engine never returns errors. It signals failure with a sentinel
//! (`false`, `None`) and appends what went wrong to a per-thread diagnostic
//! log. This crate turns that into ordinary Rust:
//!
//! - [`error_handling::run_scoped`] switches the engine into collect mode for
//!   the duration of a closure and hands back the issues recorded inside it.
//!   Scopes nest; each sees only its own issues.
//! - [`error_handling::guard`] turns a sentinel into a [`RuntimeFault`]
//!   carrying the issues recorded so far.
//! - [`error_handling::stop_on_first_issue`] builds a lazy iterator from an
//!   `advance`/`extract` pair. Items are handed out as soon as they are found;
//!   a malformed input surfaces as a single fault after every item that was
//!   read before it.
//!
//! On top of those sit the [`dom::Document`], the streaming [`reader::Reader`]
//! with its [`reader::matcher`]s, the [`writer::Writer`] with its builders, and
//! [`Xmlns`].
//!
//! # Example
//!
//! ```rust
//! use xmlkit::reader::{Reader, matcher};
//!
//! let reader = Reader::from_xml_string("<users><user>Ann</user><user>Bob</user></users>");
//! let users: Vec<String> = reader
//!     .provide(matcher::element_name("user"))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(users, vec!["<user>Ann</user>", "<user>Bob</user>"]);
//! ```

pub mod dom;
pub mod error_handling;
pub mod reader;
pub mod writer;
pub mod xmlns;

pub use error_handling::{
    AttachIssues, CursorState, RuntimeFault, Step, StreamCursor, disallow_issues, guard,
    run_scoped, stop_on_first_issue, try_run_scoped,
};
pub use xmlkit_issues::{Issue, IssueCollection, IssueSource, Severity};
pub use xmlns::Xmlns;

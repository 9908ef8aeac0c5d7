//! Turning engine diagnostics into Rust errors.
//!
//! - [`capture`]: scoped collection of engine issues
//! - [`guard`]: sentinel return values to [`RuntimeFault`]
//! - [`cursor`]: the stop-on-first-issue streaming protocol

pub mod capture;
pub mod cursor;
pub mod fault;
pub mod guard;

pub use capture::{current_issues, disallow_issues, is_capturing, run_scoped, try_run_scoped};
pub use cursor::{CursorState, Step, StreamCursor, stop_on_first_issue};
pub use fault::{AttachIssues, RuntimeFault};
pub use guard::{FalseReturn, guard};

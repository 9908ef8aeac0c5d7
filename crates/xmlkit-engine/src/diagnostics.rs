//! The engine's ambient diagnostic state.
//!
//! Like most native XML engines, this one does not hand errors back to the
//! caller directly. It appends them to an ambient log, and whether they are
//! kept at all depends on an ambient "collect mode" flag:
//!
//! - collect mode on: issues are appended to the log and stay there until
//!   someone takes them
//! - collect mode off: issues are emitted as `tracing` events and dropped
//!
//! The state is per thread. A host that reads on several threads gets one sink
//! per thread and never observes another thread's issues.
//!
//! The log is append-only from the engine's point of view. Consumers slice it
//! by offset ([`log_len`] before, [`take_since`] after), which lets nested
//! consumers each see only their own segment.

use std::cell::RefCell;
use xmlkit_issues::{Issue, Severity};

#[derive(Debug)]
struct DiagnosticSink {
    collecting: bool,
    log: Vec<Issue>,
}

impl DiagnosticSink {
    const fn new() -> Self {
        Self {
            collecting: false,
            log: Vec::new(),
        }
    }
}

thread_local! {
    static SINK: RefCell<DiagnosticSink> = const { RefCell::new(DiagnosticSink::new()) };
}

/// Switch collect mode on or off, returning the previous setting.
pub fn use_internal_errors(enable: bool) -> bool {
    SINK.with(|sink| std::mem::replace(&mut sink.borrow_mut().collecting, enable))
}

/// Whether collect mode is currently on.
pub fn internal_errors() -> bool {
    SINK.with(|sink| sink.borrow().collecting)
}

/// Report an issue.
///
/// Appended to the log in collect mode; otherwise logged through `tracing`
/// and discarded.
pub fn report(issue: Issue) {
    let collected = SINK.with(|sink| {
        let mut sink = sink.borrow_mut();
        if sink.collecting {
            sink.log.push(issue.clone());
            true
        } else {
            false
        }
    });

    if collected {
        tracing::trace!(
            severity = %issue.severity(),
            issue = issue.message(),
            "Collected XML issue"
        );
        return;
    }

    match issue.severity() {
        Severity::Warning => tracing::warn!(
            line = issue.line(),
            column = issue.column(),
            "{}",
            issue.message()
        ),
        Severity::Error | Severity::Fatal => tracing::error!(
            severity = %issue.severity(),
            line = issue.line(),
            column = issue.column(),
            "{}",
            issue.message()
        ),
    }
}

/// Number of issues currently in the log.
pub fn log_len() -> usize {
    SINK.with(|sink| sink.borrow().log.len())
}

/// Copy of the issues appended at or after `offset`.
pub fn log_since(offset: usize) -> Vec<Issue> {
    SINK.with(|sink| {
        let sink = sink.borrow();
        sink.log.get(offset..).map(<[Issue]>::to_vec).unwrap_or_default()
    })
}

/// Remove and return the issues appended at or after `offset`.
///
/// The log is left truncated to `offset`.
pub fn take_since(offset: usize) -> Vec<Issue> {
    SINK.with(|sink| {
        let mut sink = sink.borrow_mut();
        if offset >= sink.log.len() {
            return Vec::new();
        }
        sink.log.split_off(offset)
    })
}

/// Drop every issue at or after `offset`.
pub fn truncate_log(offset: usize) {
    SINK.with(|sink| sink.borrow_mut().log.truncate(offset));
}

/// Empty the log.
pub fn clear_log() {
    truncate_log(0);
}

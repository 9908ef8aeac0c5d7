//! Scoped capture of engine diagnostics.
//!
//! A capture scope switches the engine into collect mode and remembers
//! where the diagnostic log ended when it was entered. When the scope ends
//! it removes everything appended after that point, returns it as an
//! [`IssueCollection`] and puts the previous mode back.
//!
//! Because every scope only ever slices the log from its own entry offset,
//! scopes nest: an inner scope takes its own segment and leaves the log
//! exactly as the outer scope last saw it.
//!
//! ```rust
//! use xmlkit::error_handling::run_scoped;
//! use xmlkit_engine::{XmlReader, load};
//!
//! let (document, issues) = run_scoped(|| load(XmlReader::from_str("<a><b></a>")));
//! assert!(document.is_none());
//! assert!(issues.has_fatal());
//! ```

use std::cell::{Cell, RefCell};
use std::marker::PhantomData;

use xmlkit_engine::diagnostics;
use xmlkit_issues::IssueCollection;

use super::fault::{AttachIssues, RuntimeFault};

thread_local! {
    /// `(id, entry offset)` of the scopes open on this thread, innermost last.
    static SCOPES: RefCell<Vec<(u64, usize)>> = const { RefCell::new(Vec::new()) };
    static NEXT_ID: Cell<u64> = const { Cell::new(0) };
}

/// One activation of diagnostic collection.
///
/// The previous collect mode is restored when the scope is finished or
/// dropped, including while unwinding from a panic. Closing a scope also
/// closes every scope opened inside it that is still open: their issues go
/// to the closing scope, and finishing them later yields nothing and leaves
/// the mode alone.
#[derive(Debug)]
pub(crate) struct CaptureScope {
    id: u64,
    previous_mode: bool,
    offset: usize,
    closed: bool,
    _thread_bound: PhantomData<*const ()>,
}

impl CaptureScope {
    pub(crate) fn enter() -> Self {
        let previous_mode = diagnostics::use_internal_errors(true);
        let offset = diagnostics::log_len();
        let id = NEXT_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        let depth = SCOPES.with(|scopes| {
            let mut scopes = scopes.borrow_mut();
            scopes.push((id, offset));
            scopes.len()
        });
        tracing::trace!(depth, offset, "Entered capture scope");

        Self {
            id,
            previous_mode,
            offset,
            closed: false,
            _thread_bound: PhantomData,
        }
    }

    /// End the scope and take its issues.
    pub(crate) fn finish(mut self) -> IssueCollection {
        self.close()
    }

    fn close(&mut self) -> IssueCollection {
        self.closed = true;
        let position = SCOPES.with(|scopes| {
            let mut scopes = scopes.borrow_mut();
            let position = scopes.iter().position(|(id, _)| *id == self.id);
            if let Some(position) = position {
                scopes.truncate(position);
            }
            position
        });
        let Some(position) = position else {
            tracing::trace!(id = self.id, "Capture scope was closed by an enclosing scope");
            return IssueCollection::empty();
        };

        let issues = diagnostics::take_since(self.offset);
        diagnostics::use_internal_errors(self.previous_mode);
        tracing::trace!(depth = position + 1, issues = issues.len(), "Left capture scope");
        IssueCollection::new(issues)
    }
}

impl Drop for CaptureScope {
    fn drop(&mut self) {
        if !self.closed {
            self.close();
        }
    }
}

/// Run `action` with diagnostics collected, returning its result together
/// with every issue it caused.
pub fn run_scoped<R>(action: impl FnOnce() -> R) -> (R, IssueCollection) {
    let scope = CaptureScope::enter();
    let result = action();
    (result, scope.finish())
}

/// Like [`run_scoped`] for fallible actions: on `Err`, the issues are
/// attached to the error instead of being returned.
pub fn try_run_scoped<T, E: AttachIssues>(
    action: impl FnOnce() -> Result<T, E>,
) -> Result<(T, IssueCollection), E> {
    let (result, issues) = run_scoped(action);
    match result {
        Ok(value) => Ok((value, issues)),
        Err(err) => Err(err.attach_issues(issues)),
    }
}

/// Run `action` and fail if it recorded any error, even if it returned `Ok`.
///
/// Warnings are dropped.
pub fn disallow_issues<T>(
    action: impl FnOnce() -> Result<T, RuntimeFault>,
) -> Result<T, RuntimeFault> {
    let (value, issues) = try_run_scoped(action)?;
    if issues.has_errors() {
        tracing::debug!(issues = issues.len(), "Action recorded XML errors");
        return Err(RuntimeFault::from_issues(issues));
    }
    Ok(value)
}

/// Issues visible to the innermost open scope, without draining them.
///
/// Empty when no scope is open on this thread.
pub fn current_issues() -> IssueCollection {
    match SCOPES.with(|scopes| scopes.borrow().last().copied()) {
        Some((_, offset)) => IssueCollection::new(diagnostics::log_since(offset)),
        None => IssueCollection::empty(),
    }
}

/// Whether a capture scope is open on this thread.
pub fn is_capturing() -> bool {
    SCOPES.with(|scopes| !scopes.borrow().is_empty())
}

//! Converting sentinel failures into faults.

use std::fmt::Display;

use xmlkit_engine::diagnostics;
use xmlkit_issues::{Issue, Severity};

use super::capture::{current_issues, is_capturing};
use super::fault::RuntimeFault;

/// A value that signals failure by being a sentinel instead of an error.
pub trait FalseReturn {
    type Output;

    /// `None` when the value is the failure sentinel.
    fn into_success(self) -> Option<Self::Output>;
}

impl FalseReturn for bool {
    type Output = bool;

    fn into_success(self) -> Option<bool> {
        self.then_some(true)
    }
}

impl<T> FalseReturn for Option<T> {
    type Output = T;

    fn into_success(self) -> Option<T> {
        self
    }
}

/// An `Err` counts as the sentinel; its message is recorded as an internal
/// issue so it ends up in the fault next to the engine's own.
impl<T, E: Display> FalseReturn for Result<T, E> {
    type Output = T;

    fn into_success(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                diagnostics::report(Issue::internal(Severity::Error, err.to_string()));
                None
            }
        }
    }
}

/// Turn a sentinel return value into a [`RuntimeFault`].
///
/// The fault carries the issues visible to the innermost capture scope.
/// `guard` does not open a scope itself; outside of one the fault has no
/// issues.
///
/// ```rust
/// use xmlkit::error_handling::{guard, run_scoped};
/// use xmlkit_engine::{XmlReader, load};
///
/// let (result, _) = run_scoped(|| guard(load(XmlReader::from_str("<open>")), "Could not load"));
/// let fault = result.unwrap_err();
/// assert_eq!(fault.message(), "Could not load");
/// assert!(fault.issues().has_fatal());
/// ```
pub fn guard<V: FalseReturn>(value: V, message: &str) -> Result<V::Output, RuntimeFault> {
    if let Some(output) = value.into_success() {
        return Ok(output);
    }

    if !is_capturing() {
        tracing::debug!(message, "Sentinel failure outside of a capture scope");
    }
    Err(RuntimeFault::with_issues(message, current_issues()))
}

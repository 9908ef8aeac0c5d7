//! The stop-on-first-issue streaming protocol.
//!
//! A streaming engine reads ahead in chunks. It can hand out several good
//! items from a chunk before it trips over a malformed fragment further on,
//! and when it does, its "advance" primitive just returns `false`, the same
//! as at a clean end of input. The cursor tells the two apart by looking at
//! the issues the engine recorded while advancing:
//!
//! - every item found is handed out immediately and is final
//! - when advancing stops and an error was recorded, one fault follows the
//!   items, and nothing after it
//! - when advancing stops cleanly, the stream just ends
//!
//! A consumer that stops early never sees a fault, and the cursor makes no
//! further calls.

use std::iter::FusedIterator;

use xmlkit_issues::{Issue, IssueCollection};

use super::capture::run_scoped;
use super::fault::RuntimeFault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Nothing has been read yet.
    Idle,
    Producing,
    /// Input ended cleanly.
    Exhausted,
    /// Input ended with an error; the fault has been handed out.
    Failed,
}

impl CursorState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CursorState::Exhausted | CursorState::Failed)
    }
}

/// Outcome of one [`StreamCursor::step`].
#[derive(Debug)]
pub enum Step<T> {
    Item(T),
    /// No more items. Returned for a clean end and for every step after a
    /// terminal state has been reached.
    End,
    Fault(RuntimeFault),
}

/// Lazy, forward-only extraction over an `advance`/`extract` pair.
///
/// `advance` moves the source to its next position and returns `false` when
/// there is none. `extract` looks at the current position and returns an
/// item if there is one. Both run inside their own capture scope; the
/// cursor keeps what they record.
pub struct StreamCursor<S, A, X> {
    source: S,
    advance: A,
    extract: X,
    state: CursorState,
    issues: Vec<Issue>,
}

impl<S, T, A, X> StreamCursor<S, A, X>
where
    A: FnMut(&mut S) -> bool,
    X: FnMut(&mut S) -> Option<T>,
{
    pub fn new(source: S, advance: A, extract: X) -> Self {
        Self {
            source,
            advance,
            extract,
            state: CursorState::Idle,
            issues: Vec::new(),
        }
    }

    /// Advance until the next item, the end of input or a fault.
    pub fn step(&mut self) -> Step<T> {
        while !self.state.is_terminal() {
            let (advanced, issues) = run_scoped(|| (self.advance)(&mut self.source));
            self.issues.extend(issues);

            if !advanced {
                return self.finish();
            }
            self.state = CursorState::Producing;

            let (item, issues) = run_scoped(|| (self.extract)(&mut self.source));
            self.issues.extend(issues);

            if let Some(item) = item {
                return Step::Item(item);
            }
        }
        Step::End
    }

    fn finish(&mut self) -> Step<T> {
        let issues = self.issues();
        if issues.has_errors() {
            self.state = CursorState::Failed;
            tracing::debug!(issues = issues.len(), "Stream stopped on an issue");
            return Step::Fault(RuntimeFault::with_issues(
                "Detected issues during streaming",
                issues,
            ));
        }

        self.state = CursorState::Exhausted;
        tracing::trace!(warnings = issues.len(), "Stream exhausted");
        Step::End
    }
}

impl<S, A, X> StreamCursor<S, A, X> {
    /// Everything recorded so far, warnings included.
    pub fn issues(&self) -> IssueCollection {
        IssueCollection::new(self.issues.clone())
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S, T, A, X> Iterator for StreamCursor<S, A, X>
where
    A: FnMut(&mut S) -> bool,
    X: FnMut(&mut S) -> Option<T>,
{
    type Item = Result<T, RuntimeFault>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            Step::Item(item) => Some(Ok(item)),
            Step::Fault(fault) => Some(Err(fault)),
            Step::End => None,
        }
    }
}

impl<S, T, A, X> FusedIterator for StreamCursor<S, A, X>
where
    A: FnMut(&mut S) -> bool,
    X: FnMut(&mut S) -> Option<T>,
{
}

impl<S, A, X> std::fmt::Debug for StreamCursor<S, A, X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamCursor")
            .field("state", &self.state)
            .field("issues", &self.issues.len())
            .finish()
    }
}

/// Build a [`StreamCursor`] over `source`.
pub fn stop_on_first_issue<S, T, A, X>(source: S, advance: A, extract: X) -> StreamCursor<S, A, X>
where
    A: FnMut(&mut S) -> bool,
    X: FnMut(&mut S) -> Option<T>,
{
    StreamCursor::new(source, advance, extract)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xmlkit_engine::diagnostics;
    use xmlkit_issues::Severity;

    /// Scripted source: the advance results, the extract results, and how
    /// many calls were made.
    struct Script {
        advances: Vec<bool>,
        items: Vec<Option<&'static str>>,
        error_on_advance: Option<usize>,
        warning_on_advance: Option<usize>,
        advance_calls: usize,
        extract_calls: usize,
    }

    impl Script {
        fn new(advances: Vec<bool>, items: Vec<Option<&'static str>>) -> Self {
            Self {
                advances,
                items,
                error_on_advance: None,
                warning_on_advance: None,
                advance_calls: 0,
                extract_calls: 0,
            }
        }
    }

    fn advance(script: &mut Script) -> bool {
        let call = script.advance_calls;
        script.advance_calls += 1;
        if script.error_on_advance == Some(call) {
            diagnostics::report(Issue::engine(Severity::Error, "malformed fragment"));
        }
        if script.warning_on_advance == Some(call) {
            diagnostics::report(Issue::engine(Severity::Warning, "odd but fine"));
        }
        script.advances.get(call).copied().unwrap_or(false)
    }

    fn extract(script: &mut Script) -> Option<&'static str> {
        let call = script.extract_calls;
        script.extract_calls += 1;
        script.items.get(call).copied().flatten()
    }

    #[test]
    fn test_items_then_fault() {
        let mut script = Script::new(
            vec![true, true, true, false],
            vec![Some("A"), None, Some("B")],
        );
        script.error_on_advance = Some(3);
        let mut cursor = stop_on_first_issue(script, advance, extract);

        assert_eq!(cursor.next().unwrap().unwrap(), "A");
        assert_eq!(cursor.next().unwrap().unwrap(), "B");
        let fault = cursor.next().unwrap().unwrap_err();
        assert_eq!(fault.message(), "Detected issues during streaming");
        assert_eq!(fault.issues().as_slice()[0].message(), "malformed fragment");
        assert!(cursor.next().is_none());
        assert_eq!(cursor.state(), CursorState::Failed);
    }

    #[test]
    fn test_clean_end_has_no_fault() {
        let script = Script::new(vec![true, true, false], vec![Some("A"), Some("B")]);
        let items: Vec<_> = stop_on_first_issue(script, advance, extract).collect();
        assert_eq!(items, vec![Ok("A"), Ok("B")]);
    }

    #[test]
    fn test_state_transitions() {
        let script = Script::new(vec![true, false], vec![Some("A")]);
        let mut cursor = stop_on_first_issue(script, advance, extract);
        assert_eq!(cursor.state(), CursorState::Idle);
        assert!(matches!(cursor.step(), Step::Item("A")));
        assert_eq!(cursor.state(), CursorState::Producing);
        assert!(matches!(cursor.step(), Step::End));
        assert_eq!(cursor.state(), CursorState::Exhausted);
    }

    #[test]
    fn test_terminal_state_makes_no_calls() {
        let script = Script::new(vec![false], vec![]);
        let mut cursor = stop_on_first_issue(script, advance, extract);
        assert!(matches!(cursor.step(), Step::End));
        assert!(matches!(cursor.step(), Step::End));
        assert!(matches!(cursor.step(), Step::End));
        assert_eq!(cursor.source().advance_calls, 1);
        assert_eq!(cursor.source().extract_calls, 0);
    }

    #[test]
    fn test_early_stop_never_faults() {
        let mut script = Script::new(
            vec![true, true, true, false],
            vec![Some("A"), Some("B"), Some("C")],
        );
        script.error_on_advance = Some(3);
        let mut cursor = stop_on_first_issue(script, advance, extract);

        let first: Vec<_> = cursor.by_ref().take(1).collect();
        assert_eq!(first, vec![Ok("A")]);
        assert_eq!(cursor.source().advance_calls, 1);
        assert_eq!(cursor.source().extract_calls, 1);
        assert_eq!(cursor.state(), CursorState::Producing);
    }

    #[test]
    fn test_warnings_do_not_fault() {
        let mut script = Script::new(vec![true, false], vec![Some("A")]);
        script.warning_on_advance = Some(0);
        let mut cursor = stop_on_first_issue(script, advance, extract);

        assert_eq!(cursor.next(), Some(Ok("A")));
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.state(), CursorState::Exhausted);
        assert_eq!(cursor.issues().len(), 1);
        assert_eq!(cursor.issues().highest_severity(), Some(Severity::Warning));
    }

    #[test]
    fn test_error_recorded_mid_stream_faults_at_end() {
        let mut script = Script::new(vec![true, true, false], vec![Some("A"), Some("B")]);
        script.error_on_advance = Some(1);
        let results: Vec<_> = stop_on_first_issue(script, advance, extract).collect();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], Ok("A"));
        assert_eq!(results[1], Ok("B"));
        assert!(results[2].is_err());
    }

    #[test]
    fn test_cursor_leaves_ambient_state_alone() {
        let mut script = Script::new(vec![false], vec![]);
        script.error_on_advance = Some(0);
        let _ = stop_on_first_issue(script, advance, extract).collect::<Vec<_>>();
        assert!(!diagnostics::internal_errors());
        assert_eq!(diagnostics::log_len(), 0);
    }
}

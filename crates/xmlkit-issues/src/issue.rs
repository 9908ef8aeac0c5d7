//! A single diagnostic record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious an issue is.
///
/// Severities are ordered: `Warning < Error < Fatal`. Anything at or above
/// [`Severity::Error`] is terminal for the operation that recorded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Recorded, but does not fail the operation by itself
    Warning,
    /// A recoverable error; the engine may continue, the result is not trusted
    Error,
    /// The engine cannot continue past this point
    Fatal,
}

impl Severity {
    /// Whether this severity fails the operation that recorded it.
    pub fn is_error(self) -> bool {
        self >= Severity::Error
    }

    /// Lowercase name, as used in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        };
        f.write_str(label)
    }
}

/// Who reported an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSource {
    /// The XML engine (parser, reader, writer)
    Engine,
    /// Toolkit code wrapping the engine
    Internal,
}

/// One structured diagnostic.
///
/// Issues are immutable once built: the `with_*` methods consume the value and
/// return a new one, and there are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issue {
    severity: Severity,
    message: String,
    source: IssueSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    /// 1-based line
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u64>,
    /// 1-based column, in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<u64>,
}

impl Issue {
    /// Create an issue reported by the given source.
    pub fn new(severity: Severity, source: IssueSource, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            source,
            file: None,
            line: None,
            column: None,
        }
    }

    /// Create an issue reported by the XML engine.
    pub fn engine(severity: Severity, message: impl Into<String>) -> Self {
        Self::new(severity, IssueSource::Engine, message)
    }

    /// Create an issue reported by toolkit code.
    pub fn internal(severity: Severity, message: impl Into<String>) -> Self {
        Self::new(severity, IssueSource::Internal, message)
    }

    /// Attach a 1-based line and column.
    pub fn with_location(mut self, line: u64, column: u64) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Attach the name of the file the issue was found in.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source(&self) -> IssueSource {
        self.source
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn line(&self) -> Option<u64> {
        self.line
    }

    pub fn column(&self) -> Option<u64> {
        self.column
    }

    /// Whether this issue fails the operation that recorded it.
    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}

impl fmt::Display for Issue {
    /// `[ERROR] file.xml: message on line 3, column 5`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.severity)?;
        if let Some(file) = &self.file {
            write!(f, "{}: ", file)?;
        }
        f.write_str(&self.message)?;
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, " on line {}, column {}", line, column),
            (Some(line), None) => write!(f, " on line {}", line),
            _ => Ok(()),
        }
    }
}

//! Engine-level problems and their conversion into issues.

use std::fmt;
use xmlkit_issues::{Issue, Severity};

/// Something the engine noticed while reading or writing.
///
/// Engine problems are never returned to callers as `Err`. They are turned
/// into [`Issue`]s and handed to [`diagnostics::report`](crate::diagnostics::report),
/// while the engine operation itself signals failure through its sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// XML syntax or well-formedness error from quick-xml.
    XmlSyntax { message: String },

    /// An entity or character reference that could not be unescaped.
    InvalidEscape { message: String },

    /// A malformed attribute inside a start tag.
    InvalidAttribute { element: String, message: String },

    /// A namespace prefix with no binding in scope.
    UndefinedPrefix { prefix: String, name: String },

    /// End of input with elements still open.
    UnexpectedEof { open: String },

    /// No root element at all.
    EmptyDocument,

    /// An element after the document element was closed.
    ExtraContent,

    /// Non-whitespace text outside of the document element.
    TextOutsideRoot,

    /// The input could not be read or the output could not be written.
    Io { message: String },

    /// A file that could not be opened.
    ExternalEntity { path: String },

    /// An XML declaration with a version other than 1.0.
    UnsupportedVersion { version: String },

    /// A DOCTYPE declaration; internal subsets are not processed.
    DocTypeIgnored,

    /// A writer call made while the writer was in the wrong state.
    WriterState { message: String },
}

impl EngineError {
    pub fn severity(&self) -> Severity {
        match self {
            EngineError::UnsupportedVersion { .. } | EngineError::DocTypeIgnored => {
                Severity::Warning
            }
            EngineError::InvalidEscape { .. }
            | EngineError::UndefinedPrefix { .. }
            | EngineError::WriterState { .. } => Severity::Error,
            EngineError::XmlSyntax { .. }
            | EngineError::InvalidAttribute { .. }
            | EngineError::UnexpectedEof { .. }
            | EngineError::EmptyDocument
            | EngineError::ExtraContent
            | EngineError::TextOutsideRoot
            | EngineError::Io { .. }
            | EngineError::ExternalEntity { .. } => Severity::Fatal,
        }
    }

    /// Convert into an issue without location information.
    pub fn to_issue(&self) -> Issue {
        Issue::engine(self.severity(), self.to_string())
    }

    /// Convert into an issue pointing at a 1-based line and column.
    pub fn to_issue_at(&self, line: u64, column: u64) -> Issue {
        self.to_issue().with_location(line, column)
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::XmlSyntax { message } => write!(f, "XML syntax error: {}", message),
            EngineError::InvalidEscape { message } => {
                write!(f, "Invalid entity or character reference: {}", message)
            }
            EngineError::InvalidAttribute { element, message } => {
                write!(f, "Malformed attribute in start tag {}: {}", element, message)
            }
            EngineError::UndefinedPrefix { prefix, name } => {
                write!(f, "Namespace prefix {} on {} is not defined", prefix, name)
            }
            EngineError::UnexpectedEof { open } => {
                write!(f, "Premature end of data in tag {}", open)
            }
            EngineError::EmptyDocument => write!(f, "Empty document"),
            EngineError::ExtraContent => write!(f, "Extra content at the end of the document"),
            EngineError::TextOutsideRoot => {
                write!(f, "Text content is not allowed outside the document element")
            }
            EngineError::Io { message } => write!(f, "I/O error: {}", message),
            EngineError::ExternalEntity { path } => {
                write!(f, "failed to load external entity \"{}\"", path)
            }
            EngineError::UnsupportedVersion { version } => {
                write!(f, "Unsupported version '{}'", version)
            }
            EngineError::DocTypeIgnored => {
                write!(f, "DOCTYPE declaration is not processed")
            }
            EngineError::WriterState { message } => write!(f, "Writer error: {}", message),
        }
    }
}

impl From<quick_xml::Error> for EngineError {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(io) => EngineError::Io {
                message: io.to_string(),
            },
            quick_xml::Error::Escape(escape) => EngineError::InvalidEscape {
                message: escape.to_string(),
            },
            other => EngineError::XmlSyntax {
                message: other.to_string(),
            },
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io {
            message: err.to_string(),
        }
    }
}

//! Error types for clishape.

use thiserror::Error;

use crate::schema::ValidationError;

/// Main error type for clishape operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A rule definition misbehaved while scanning
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// The scanned result does not conform to the extractor schema
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Extractor definition or dispatch errors
    #[error("Extractor error: {0}")]
    Extractor(#[from] ExtractorError),

    /// The executor failed to produce output for a command
    #[error("Failed to acquire output for '{command}': {source}")]
    Acquisition {
        command: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// A rule defect detected while scanning a specific line.
///
/// These are never caused by lines that simply do not match; they mean a
/// rule matched and then could not do what it was written to do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("rule '{rule}' on line {line_number} ('{line}'): {kind}")]
pub struct ScanError {
    /// Name of the rule that fired.
    pub rule: String,

    /// 1-based line number in the scanned text.
    pub line_number: usize,

    /// The trimmed line the rule fired on.
    pub line: String,

    /// What went wrong.
    pub kind: ScanErrorKind,
}

/// The kind of rule defect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanErrorKind {
    /// A capture matched text that is not a base-10 integer
    #[error("capture '{capture}' value '{value}' is not an integer")]
    InvalidInteger { capture: String, value: String },

    /// The action referenced a capture that did not participate in the match
    #[error("capture '{capture}' did not participate in the match")]
    MissingCapture { capture: String },

    /// The action referenced a context mode that is not set
    #[error("context mode '{mode}' is not set")]
    MissingMode { mode: String },

    /// The action tried to descend through a value that is not a mapping
    #[error("'{path}' holds {found}, not a mapping")]
    PathConflict { path: String, found: &'static str },
}

/// Extractor definition and dispatch errors.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Invalid regex pattern in a rule or command template
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// No command template accepts the supplied parameters
    #[error("Extractor '{extractor}' has no command template for parameters [{params}]")]
    NoTemplate { extractor: String, params: String },

    /// No extractor registered under this name
    #[error("Unknown extractor '{name}'")]
    UnknownExtractor { name: String },

    /// No registered command template matches the command
    #[error("No extractor matches command '{command}'")]
    NoMatchingExtractor { command: String },

    /// An extractor with this name is already registered
    #[error("Extractor '{name}' is already registered")]
    AlreadyRegistered { name: String },
}

/// Result type alias using clishape's Error.
pub type Result<T> = std::result::Result<T, Error>;

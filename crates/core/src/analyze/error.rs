//! Error types for document analysis

use thiserror::Error;

/// Errors that can occur while folding records into a stats tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyzeError {
    /// A value's type tag does not match its payload
    ///
    /// Fatal to the current record only; statistics gathered so far remain.
    #[error("Invalid record: '{field}' is tagged {tag} but {reason}")]
    InvalidRecord {
        field: String,
        tag: &'static str,
        reason: String,
    },

    /// The record source failed mid-stream
    #[error("Record source error: {0}")]
    Source(#[from] SourceError),
}

impl AnalyzeError {
    /// Invalid value at the current position; callers prefix the path
    pub(crate) fn invalid(tag: &'static str, reason: impl Into<String>) -> Self {
        AnalyzeError::InvalidRecord {
            field: String::new(),
            tag,
            reason: reason.into(),
        }
    }

    /// Prefix the offending field path with its parent segment
    pub(crate) fn within(self, parent: &str) -> Self {
        match self {
            AnalyzeError::InvalidRecord { field, tag, reason } => {
                let field = if field.is_empty() {
                    parent.to_string()
                } else if field.starts_with('[') {
                    format!("{parent}{field}")
                } else {
                    format!("{parent}.{field}")
                };
                AnalyzeError::InvalidRecord { field, tag, reason }
            }
            other => other,
        }
    }

    /// Whether the error only affects the record being analyzed
    pub fn is_record_local(&self) -> bool {
        matches!(self, AnalyzeError::InvalidRecord { .. })
    }
}

/// Errors raised by record sources
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// IO error while reading input
    #[error("IO error: {0}")]
    Io(String),

    /// Input could not be parsed
    #[error("JSON parsing error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl From<std::io::Error> for SourceError {
    fn from(e: std::io::Error) -> Self {
        SourceError::Io(e.to_string())
    }
}

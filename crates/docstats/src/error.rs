//! CLI error types

use std::path::PathBuf;

use docstats_core::analyze::{AnalyzeError, SourceError};
use docstats_core::render::RenderError;
use thiserror::Error;

/// Errors reported by the `docstats` binary
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Failed to write {0}: {1}")]
    FileWriteError(PathBuf, String),

    #[error("Analysis failed: {0}")]
    AnalysisError(#[from] AnalyzeError),

    #[error("Failed to render report: {0}")]
    RenderError(#[from] RenderError),
}

impl CliError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            CliError::FileReadError(path, reason) => {
                format!(
                    "Cannot read input: {}\nReason: {reason}\n\n\
                    Hint: Check that the file exists, or pass '-' to read from stdin.",
                    path.display()
                )
            }
            CliError::AnalysisError(AnalyzeError::InvalidRecord { .. }) => {
                format!(
                    "{self}\n\nHint: Drop --strict to skip invalid records and keep going."
                )
            }
            CliError::AnalysisError(AnalyzeError::Source(SourceError::Parse { line, .. })) => {
                format!(
                    "{self}\n\nHint: Check the JSON syntax around line {line}, \
                    or pass --format if the extension does not match the content."
                )
            }
            _ => self.to_string(),
        }
    }
}

impl From<SourceError> for CliError {
    fn from(e: SourceError) -> Self {
        CliError::AnalysisError(AnalyzeError::Source(e))
    }
}

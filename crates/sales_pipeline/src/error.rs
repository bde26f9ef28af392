//! Error types for the cleaning pipeline.

use sales_core::CoreError;
use sales_parser::ParserError;
use sales_validator::ValidationError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that abort a cleaning run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Source file does not exist
    #[error("Source file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader or writer failed
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The file is readable but not a usable table
    #[error("Malformed CSV {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },

    /// Validity pass failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Rule set file could not be loaded
    #[error(transparent)]
    Parser(#[from] ParserError),

    /// Configuration is invalid
    #[error(transparent)]
    Config(#[from] CoreError),
}

impl PipelineError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn malformed(path: &Path, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// True for failures a later attempt may not hit: missing files and I/O.
    ///
    /// Schema, rule and configuration errors are deterministic.
    pub fn is_retryable(&self) -> bool {
        match self {
            PipelineError::NotFound(_) | PipelineError::Io { .. } => true,
            PipelineError::Csv { source, .. } => source.is_io_error(),
            _ => false,
        }
    }
}

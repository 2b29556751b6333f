//! Error types for the CLI

use thiserror::Error;
use wirecheck::CompareError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Upload is not an accepted image file
    #[error("Invalid file type. Only image files are allowed. ({path})")]
    InvalidFileType {
        /// Offending path
        path: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wirecheck library error
    #[error("{}", user_message(.0))]
    Compare(#[from] CompareError),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid file type error
    #[must_use]
    pub fn invalid_file_type(path: impl Into<String>) -> Self {
        Self::InvalidFileType { path: path.into() }
    }
}

/// Text shown to the user for a fatal comparison error
fn user_message(err: &CompareError) -> String {
    match err {
        CompareError::Decode { input, .. } => {
            format!("Could not process images: the {input} upload is not a readable image ({err})")
        }
        CompareError::DimensionMismatch { .. } => format!("Could not process images: {err}"),
        CompareError::Config { .. } => err.to_string(),
        _ => format!("Comparison failed: {err}"),
    }
}

//! Result and error types for Wirecheck.

use thiserror::Error;

/// Result type for Wirecheck operations
pub type CompareResult<T> = Result<T, CompareError>;

/// Stage name carried by overlay render errors
pub const OVERLAY_STAGE: &str = "overlay";

/// Stage name carried by heatmap render errors
pub const HEATMAP_STAGE: &str = "heatmap";

/// Which of the two comparison inputs an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRole {
    /// The design mock-up
    Wireframe,
    /// The screenshot of the built page
    LiveSite,
}

impl std::fmt::Display for InputRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wireframe => f.write_str("wireframe"),
            Self::LiveSite => f.write_str("live site"),
        }
    }
}

/// Errors that can occur while comparing a wireframe with a live site
#[derive(Debug, Error)]
pub enum CompareError {
    /// An input could not be decoded as a raster image
    #[error("Failed to decode {input} image: {message}")]
    Decode {
        /// Input that failed
        input: InputRole,
        /// Error message
        message: String,
    },

    /// Two images that must share dimensions do not
    #[error("Image dimensions differ: {left_width}x{left_height} vs {right_width}x{right_height}")]
    DimensionMismatch {
        /// Width of the first image
        left_width: u32,
        /// Height of the first image
        left_height: u32,
        /// Width of the second image
        right_width: u32,
        /// Height of the second image
        right_height: u32,
    },

    /// Overlay or heatmap rendering failed
    #[error("Rendering {stage} failed: {message}")]
    Render {
        /// Stage that failed ("overlay" or "heatmap")
        stage: &'static str,
        /// Error message
        message: String,
    },

    /// Text recognition failed
    #[error("OCR failed: {message}")]
    Ocr {
        /// Error message
        message: String,
    },

    /// Invalid configuration value
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompareError {
    /// Create a decode error for the given input
    #[must_use]
    pub fn decode(input: InputRole, message: impl Into<String>) -> Self {
        Self::Decode {
            input,
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error
    #[must_use]
    pub const fn dimension_mismatch(left: (u32, u32), right: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            left_width: left.0,
            left_height: left.1,
            right_width: right.0,
            right_height: right.1,
        }
    }

    /// Create a render error for a stage
    #[must_use]
    pub fn render(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Render {
            stage,
            message: message.into(),
        }
    }

    /// Create an OCR error
    #[must_use]
    pub fn ocr(message: impl Into<String>) -> Self {
        Self::Ocr {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error aborts a comparison outright.
    ///
    /// Heatmap rendering and OCR failures are recovered by the pipeline;
    /// everything else is surfaced to the caller.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::Ocr { .. } | Self::Render { stage: HEATMAP_STAGE, .. }
        )
    }
}

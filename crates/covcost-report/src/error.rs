//! Error types for report output.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while rendering results.
#[derive(Debug, Error)]
pub enum ReportError {
    /// JSON serialization failed.
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    /// Nothing to draw.
    #[error("none of the requested provinces have data to plot")]
    EmptyChart,

    /// Chart drawing failed.
    #[error("failed to draw chart {path}: {message}")]
    Plot { path: PathBuf, message: String },
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

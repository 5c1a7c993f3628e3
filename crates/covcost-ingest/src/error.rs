//! Error types for source loading.

use std::path::PathBuf;
use thiserror::Error;

use covcost_model::ModelError;

/// Errors that can occur while loading source tables.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Data directory not found.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file has no header row.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// Failed to parse a lookup CSV record.
    #[error("invalid record {line} in {path}: {source}")]
    Record {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },

    // === Shape Errors ===
    /// Required identifier column not found.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// Lookup value rejected by the model.
    #[error("invalid value in {path}: {source}")]
    InvalidValue {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;

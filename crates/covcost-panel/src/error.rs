//! Error types for panel construction.

use thiserror::Error;

/// Errors that can occur while building the analysis panel.
#[derive(Debug, Error)]
pub enum PanelError {
    /// A column the stage depends on is absent.
    #[error("column '{column}' not found in {stage} panel")]
    MissingColumn { column: String, stage: String },

    /// Duplicate (province, quarter) keys when they are configured as fatal.
    #[error("{rows} rows share {keys} duplicated province-quarter keys")]
    DuplicateObservations { rows: usize, keys: usize },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for PanelError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for panel operations.
pub type Result<T> = std::result::Result<T, PanelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PanelError::MissingColumn {
            column: "Urbanization_Rate".to_string(),
            stage: "feature".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "column 'Urbanization_Rate' not found in feature panel"
        );

        let err = PanelError::DuplicateObservations { rows: 4, keys: 2 };
        assert!(err.to_string().contains("2 duplicated"));
    }
}

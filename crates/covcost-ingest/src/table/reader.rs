//! Wide CSV reading.

use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use covcost_model::columns::{ID_COLUMNS, is_quarter_column};

use crate::error::{IngestError, Result};

/// Reads a CSV file into a Polars DataFrame.
///
/// Header names are kept verbatim, including surrounding whitespace, so that
/// quarter-column selection sees exactly what the file contains.
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    if metadata.len() == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(df)
}

/// Reads a wide provincial table and checks its identifier columns.
///
/// The table must carry `GbProv` and `ProvEN`; quarter columns are not
/// validated here, since a table without any simply reshapes to nothing.
pub fn read_wide_table(path: &Path) -> Result<DataFrame> {
    let df = read_csv_table(path)?;
    let names = df.get_column_names();
    for column in ID_COLUMNS {
        if !names.iter().any(|name| name.as_str() == column) {
            return Err(IngestError::MissingColumn {
                column: column.to_string(),
                path: path.to_path_buf(),
            });
        }
    }
    let quarter_columns = names
        .iter()
        .filter(|name| is_quarter_column(name.as_str()))
        .count();
    debug!(
        path = %path.display(),
        rows = df.height(),
        quarter_columns,
        "loaded wide table"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_wide_table() {
        let file = create_temp_csv("GbProv,ProvEN,2020Q1,2020Q2\n110000,Beijing,1.5,2.5\n");
        let df = read_wide_table(file.path()).unwrap();

        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 4);
    }

    #[test]
    fn test_read_wide_table_missing_id_column() {
        let file = create_temp_csv("Code,ProvEN,2020Q1\n110000,Beijing,1.5\n");
        let result = read_wide_table(file.path());

        assert!(matches!(
            result,
            Err(IngestError::MissingColumn { ref column, .. }) if column == "GbProv"
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_csv_table(Path::new("/nonexistent/grp.csv"));

        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_read_empty_file() {
        let file = create_temp_csv("");
        let result = read_csv_table(file.path());

        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }
}

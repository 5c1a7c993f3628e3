//! Urbanization lookup loading.

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;

use covcost_model::UrbanizationTable;

use crate::error::{IngestError, Result};

#[derive(Debug, Deserialize)]
struct UrbanizationRecord {
    #[serde(rename = "ProvEN")]
    province: String,
    #[serde(rename = "Urbanization_Rate")]
    rate: f64,
}

/// Load a replacement urbanization table from a `ProvEN,Urbanization_Rate` CSV.
pub fn load_urbanization_csv(path: &Path) -> Result<UrbanizationTable> {
    let bytes = std::fs::read(path).map_err(|e| {
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
    let content = bytes.strip_prefix("\u{feff}".as_bytes()).unwrap_or(&bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(content);
    let mut entries = Vec::new();
    for record in reader.deserialize::<UrbanizationRecord>() {
        let record = record.map_err(|e| IngestError::Record {
            path: path.to_path_buf(),
            line: e.position().map(csv::Position::line).unwrap_or(0),
            source: e,
        })?;
        entries.push((record.province, record.rate));
    }
    UrbanizationTable::from_entries(entries).map_err(|source| IngestError::InvalidValue {
        path: path.to_path_buf(),
        source,
    })
}

use serde::{Deserialize, Serialize};

/// A row whose (province, quarter) key is shared with at least one other row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateEntry {
    /// Position of the row in the merged panel.
    pub row: usize,
    pub province_code: String,
    pub province_name: String,
    pub quarter: String,
    /// Remaining columns of the row, formatted for display.
    pub values: Vec<(String, String)>,
}

/// Every row involved in a duplicated observation key, in panel order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub entries: Vec<DuplicateEntry>,
}

impl DuplicateReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of distinct keys that occur more than once.
    pub fn key_count(&self) -> usize {
        let mut keys: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|entry| (entry.province_code.as_str(), entry.quarter.as_str()))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys.len()
    }
}

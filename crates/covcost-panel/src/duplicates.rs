//! Quarter label cleanup and duplicate observation detection.

use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame};
use tracing::warn;

use covcost_model::columns::{OBSERVATION_KEYS, PANEL_KEYS, PROVINCE_NAME, QUARTER};
use covcost_model::{DuplicateEntry, DuplicateReport};

use crate::error::Result;
use crate::frame::string_values;

/// Strips surrounding whitespace from every quarter label.
pub fn trim_quarter_labels(df: &mut DataFrame) -> Result<()> {
    let trimmed: Vec<String> = string_values(df, QUARTER, "merged")?
        .into_iter()
        .map(|label| label.trim().to_string())
        .collect();
    df.with_column(Column::new(QUARTER.into(), trimmed))?;
    Ok(())
}

/// Collects every row whose `(GbProv, Quarter)` key occurs more than once.
///
/// All members of a duplicated key are reported, first occurrence included;
/// the panel itself is left untouched.
pub fn find_duplicate_observations(df: &DataFrame) -> Result<DuplicateReport> {
    let [code_column, quarter_column] = OBSERVATION_KEYS;
    let codes = string_values(df, code_column, "merged")?;
    let quarters = string_values(df, quarter_column, "merged")?;
    let names = string_values(df, PROVINCE_NAME, "merged")?;

    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for (code, quarter) in codes.iter().zip(&quarters) {
        *counts.entry((code.as_str(), quarter.as_str())).or_default() += 1;
    }

    let value_columns: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(ToString::to_string)
        .filter(|name| !PANEL_KEYS.contains(&name.as_str()))
        .collect();
    let values = value_columns
        .iter()
        .map(|name| string_values(df, name, "merged"))
        .collect::<Result<Vec<_>>>()?;

    let mut entries = Vec::new();
    for row in 0..df.height() {
        let key = (codes[row].as_str(), quarters[row].as_str());
        if counts.get(&key).copied().unwrap_or(0) < 2 {
            continue;
        }
        entries.push(DuplicateEntry {
            row,
            province_code: codes[row].clone(),
            province_name: names[row].clone(),
            quarter: quarters[row].clone(),
            values: value_columns
                .iter()
                .zip(&values)
                .map(|(name, column)| (name.clone(), column[row].clone()))
                .collect(),
        });
    }

    let report = DuplicateReport { entries };
    if !report.is_empty() {
        warn!(
            rows = report.len(),
            keys = report.key_count(),
            "duplicate province-quarter entries found"
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merged() -> DataFrame {
        DataFrame::new(vec![
            Column::new("GbProv".into(), vec![110000i64, 110000, 120000, 110000]),
            Column::new("ProvEN".into(), vec!["Beijing", "Beijing", "Tianjin", "Beijing"]),
            Column::new("Quarter".into(), vec![" 2020Q1", "2020Q1 ", "2020Q1", "2020Q2"]),
            Column::new("GRP_real".into(), vec![1.0, 1.5, 2.0, 3.0]),
        ])
        .unwrap()
    }

    #[test]
    fn trimming_exposes_duplicates() {
        let mut df = merged();
        assert!(find_duplicate_observations(&df).unwrap().is_empty());

        trim_quarter_labels(&mut df).unwrap();
        let report = find_duplicate_observations(&df).unwrap();

        assert_eq!(report.len(), 2);
        assert_eq!(report.key_count(), 1);
        assert_eq!(report.entries[0].row, 0);
        assert_eq!(report.entries[1].row, 1);
        assert_eq!(report.entries[1].quarter, "2020Q1");
        assert_eq!(
            report.entries[1].values,
            vec![("GRP_real".to_string(), "1.5".to_string())]
        );
    }

    #[test]
    fn report_leaves_rows_in_place() {
        let mut df = merged();
        trim_quarter_labels(&mut df).unwrap();
        let _ = find_duplicate_observations(&df).unwrap();

        assert_eq!(df.height(), 4);
    }
}

//! Joins between long panels and the urbanization lookup.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{BooleanChunked, Column, DataFrame, IdxCa, IdxSize, NewChunkedArray};
use tracing::debug;

use covcost_model::UrbanizationTable;
use covcost_model::columns::{PANEL_KEYS, PROVINCE_NAME, URBANIZATION};

use crate::error::Result;
use crate::frame::{require_columns, string_values};

/// Suffix for right-hand columns whose name already exists on the left.
const RIGHT_SUFFIX: &str = "_right";

/// Inner join of two long panels on `GbProv, ProvEN, Quarter`.
///
/// Rows follow the order of `left`; a key matching several right rows
/// yields one output row per pair. Left rows without a match are dropped.
pub fn merge_panels(left: &DataFrame, right: &DataFrame) -> Result<DataFrame> {
    require_columns(left, &PANEL_KEYS, "left")?;
    require_columns(right, &PANEL_KEYS, "right")?;

    let right_keys = composite_keys(right, "right")?;
    let mut lookup: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, key) in right_keys.iter().enumerate() {
        lookup.entry(key.as_str()).or_default().push(idx);
    }

    let left_keys = composite_keys(left, "left")?;
    let mut left_idx: Vec<IdxSize> = Vec::with_capacity(left.height());
    let mut right_idx: Vec<IdxSize> = Vec::with_capacity(left.height());
    let mut unmatched = 0usize;
    for (idx, key) in left_keys.iter().enumerate() {
        match lookup.get(key.as_str()) {
            Some(matches) => {
                for &other in matches {
                    left_idx.push(idx as IdxSize);
                    right_idx.push(other as IdxSize);
                }
            }
            None => unmatched += 1,
        }
    }

    let value_columns: Vec<String> = right
        .get_column_names()
        .into_iter()
        .filter(|name| !PANEL_KEYS.contains(&name.as_str()))
        .map(ToString::to_string)
        .collect();

    let mut merged = left.take(&IdxCa::from_vec("left".into(), left_idx))?;
    let right_values = right
        .select(value_columns)?
        .take(&IdxCa::from_vec("right".into(), right_idx))?;
    for column in right_values.get_columns() {
        let name = column.name().to_string();
        let column = if merged.column(&name).is_ok() {
            column.clone().with_name(format!("{name}{RIGHT_SUFFIX}").into())
        } else {
            column.clone()
        };
        merged.with_column(column)?;
    }

    debug!(
        left_rows = left.height(),
        right_rows = right.height(),
        merged_rows = merged.height(),
        unmatched_left = unmatched,
        "merged panels"
    );
    Ok(merged)
}

/// Left join of the urbanization lookup on `ProvEN`, dropping provinces
/// without a rate.
pub fn attach_urbanization(panel: &DataFrame, table: &UrbanizationTable) -> Result<DataFrame> {
    let names = string_values(panel, PROVINCE_NAME, "merged")?;
    let rates: Vec<Option<f64>> = names.iter().map(|name| table.rate(name)).collect();
    let keep: Vec<bool> = rates.iter().map(Option::is_some).collect();

    let unmatched: BTreeSet<&str> = names
        .iter()
        .zip(&rates)
        .filter(|(_, rate)| rate.is_none())
        .map(|(name, _)| name.as_str())
        .collect();
    if !unmatched.is_empty() {
        debug!(
            provinces = ?unmatched,
            rows = keep.iter().filter(|k| !**k).count(),
            "dropping rows without an urbanization rate"
        );
    }

    let mut joined = panel.clone();
    joined.with_column(Column::new(URBANIZATION.into(), rates))?;
    let mask = BooleanChunked::from_slice("urbanized".into(), &keep);
    Ok(joined.filter(&mask)?)
}

fn composite_keys(df: &DataFrame, stage: &str) -> Result<Vec<String>> {
    let parts = PANEL_KEYS
        .iter()
        .map(|column| string_values(df, column, stage))
        .collect::<Result<Vec<_>>>()?;
    Ok((0..df.height())
        .map(|idx| {
            parts
                .iter()
                .map(|values| values[idx].as_str())
                .collect::<Vec<_>>()
                .join("\u{1f}")
        })
        .collect())
}

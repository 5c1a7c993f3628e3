//! Panel frame type and column access helpers.
//!
//! [`PanelFrame`] wraps a Polars DataFrame with the name of the pipeline
//! stage that produced it, so errors and log events can say where a column
//! went missing.

use std::collections::BTreeSet;

use polars::prelude::{AnyValue, DataFrame};

use covcost_ingest::{any_to_f64, any_to_string};
use covcost_model::columns::PROVINCE_CODE;

use crate::error::{PanelError, Result};

/// A long-format panel at a given pipeline stage.
#[derive(Debug, Clone)]
pub struct PanelFrame {
    /// Stage that produced the frame (e.g. "merged", "features").
    pub stage: String,
    /// The panel rows as a Polars DataFrame.
    pub data: DataFrame,
}

impl PanelFrame {
    pub fn new(stage: impl Into<String>, data: DataFrame) -> Self {
        Self {
            stage: stage.into(),
            data,
        }
    }

    /// Returns the number of observations in the frame.
    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    /// Number of distinct province codes.
    pub fn province_count(&self) -> Result<usize> {
        let codes = string_values(&self.data, PROVINCE_CODE, &self.stage)?;
        Ok(codes.iter().collect::<BTreeSet<_>>().len())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.data.column(name).is_ok()
    }

    pub fn f64_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        f64_values(&self.data, name, &self.stage)
    }

    pub fn string_values(&self, name: &str) -> Result<Vec<String>> {
        string_values(&self.data, name, &self.stage)
    }

    pub fn i64_values(&self, name: &str) -> Result<Vec<Option<i64>>> {
        let values = self.f64_values(name)?;
        Ok(values.into_iter().map(|v| v.map(|v| v as i64)).collect())
    }
}

/// Numeric values of a column, `None` for nulls and unparseable cells.
pub fn f64_values(df: &DataFrame, name: &str, stage: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name).map_err(|_| missing(name, stage))?;
    Ok((0..df.height())
        .map(|idx| column.get(idx).ok().and_then(any_to_f64))
        .collect())
}

/// Display values of a column, empty strings for nulls.
pub fn string_values(df: &DataFrame, name: &str, stage: &str) -> Result<Vec<String>> {
    let column = df.column(name).map_err(|_| missing(name, stage))?;
    Ok((0..df.height())
        .map(|idx| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect())
}

/// Fails with [`PanelError::MissingColumn`] for the first absent column.
pub fn require_columns(df: &DataFrame, columns: &[&str], stage: &str) -> Result<()> {
    for column in columns {
        if df.column(column).is_err() {
            return Err(missing(column, stage));
        }
    }
    Ok(())
}

fn missing(column: &str, stage: &str) -> PanelError {
    PanelError::MissingColumn {
        column: column.to_string(),
        stage: stage.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Column::new("GbProv".into(), vec![110000i64, 110000, 120000]),
            Column::new("GRP_real".into(), vec![Some(1.5), None, Some(2.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn reads_values_and_counts_provinces() {
        let frame = PanelFrame::new("merged", sample());

        assert_eq!(frame.record_count(), 3);
        assert_eq!(frame.province_count().unwrap(), 2);
        assert_eq!(
            frame.f64_values("GRP_real").unwrap(),
            vec![Some(1.5), None, Some(2.0)]
        );
        assert_eq!(frame.string_values("GbProv").unwrap()[2], "120000");
    }

    #[test]
    fn missing_column_names_the_stage() {
        let frame = PanelFrame::new("features", sample());
        let err = frame.f64_values("log_GRP").unwrap_err();

        assert!(matches!(
            err,
            PanelError::MissingColumn { ref column, ref stage }
                if column == "log_GRP" && stage == "features"
        ));
    }
}

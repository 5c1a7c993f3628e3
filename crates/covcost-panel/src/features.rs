//! Derived regression variables.
//!
//! The builder runs on the merged panel in a fixed order:
//!
//! 1. trim quarter labels and report duplicate `(GbProv, Quarter)` keys
//! 2. drop rows with non-positive or missing `GRP_real`
//! 3. `log_GRP`, `Covid_Cases` (cases per person) and the `Time` code
//! 4. sort by province and time
//! 5. optional one-row lags, zero-filled current values (combined model
//!    only) and urbanization interactions

use std::time::Instant;

use polars::prelude::{BooleanChunked, Column, DataFrame, IdxCa, IdxSize, NewChunkedArray};
use tracing::{debug, info, warn};

use covcost_model::columns::{
    CASES, CASES_LAG, CASES_PER_MILLION, GRP_REAL, LOG_GRP, PROVINCE_CODE, QUARTER, STRINGENCY,
    STRINGENCY_LAG, STRINGENCY_LAG_X_URBAN, STRINGENCY_X_URBAN, TIME, URBANIZATION,
};
use covcost_model::{DuplicateReport, ModelSpec, QuarterIndex};

use crate::duplicates::{find_duplicate_observations, trim_quarter_labels};
use crate::error::{PanelError, Result};
use crate::frame::{PanelFrame, f64_values, require_columns, string_values};

/// Case rates are reported per million inhabitants.
const CASES_SCALE: f64 = 1_000_000.0;

/// Which optional variable groups to derive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureOptions {
    pub lags: bool,
    pub interactions: bool,
    /// Replace missing current stringency and case values with zero.
    pub zero_fill_current: bool,
    /// Fail instead of warning when duplicate keys are found.
    pub fail_on_duplicates: bool,
}

impl FeatureOptions {
    pub fn for_model(spec: ModelSpec) -> Self {
        Self {
            lags: spec.needs_lags(),
            interactions: spec.needs_urbanization(),
            zero_fill_current: spec == ModelSpec::Combined,
            fail_on_duplicates: false,
        }
    }

    #[must_use]
    pub fn with_fail_on_duplicates(mut self, fail: bool) -> Self {
        self.fail_on_duplicates = fail;
        self
    }
}

/// Regression-ready panel plus what was learned while building it.
#[derive(Debug, Clone)]
pub struct PreparedPanel {
    pub frame: PanelFrame,
    pub quarters: QuarterIndex,
    pub duplicates: DuplicateReport,
    /// Rows removed for a non-positive or missing `GRP_real`.
    pub dropped_non_positive: usize,
}

/// Builds every derived column the options ask for.
pub fn build_features(mut merged: DataFrame, options: FeatureOptions) -> Result<PreparedPanel> {
    let start = Instant::now();
    require_columns(&merged, &[PROVINCE_CODE, QUARTER, GRP_REAL], "merged")?;

    trim_quarter_labels(&mut merged)?;
    let duplicates = find_duplicate_observations(&merged)?;
    if options.fail_on_duplicates && !duplicates.is_empty() {
        return Err(PanelError::DuplicateObservations {
            rows: duplicates.len(),
            keys: duplicates.key_count(),
        });
    }

    let (mut df, dropped_non_positive) = filter_positive_output(&merged)?;
    add_log_output(&mut df)?;
    add_case_share(&mut df)?;
    let quarters = add_time_index(&mut df)?;
    let mut df = sort_by_province_and_time(&df)?;

    if options.lags {
        add_lags(&mut df)?;
    }
    if options.zero_fill_current {
        fill_missing_with_zero(&mut df, &[STRINGENCY, CASES_PER_MILLION, CASES])?;
    }
    if options.interactions {
        add_interactions(&mut df, options.lags)?;
    }

    info!(
        rows = df.height(),
        quarters = quarters.len(),
        dropped_non_positive,
        duplicates = duplicates.len(),
        lags = options.lags,
        interactions = options.interactions,
        duration_ms = start.elapsed().as_millis(),
        "features built"
    );
    Ok(PreparedPanel {
        frame: PanelFrame::new("features", df),
        quarters,
        duplicates,
        dropped_non_positive,
    })
}

/// Keeps rows whose `GRP_real` is present and strictly positive.
pub fn filter_positive_output(df: &DataFrame) -> Result<(DataFrame, usize)> {
    let grp = f64_values(df, GRP_REAL, "merged")?;
    let keep: Vec<bool> = grp.iter().map(|v| v.is_some_and(|v| v > 0.0)).collect();
    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped > 0 {
        debug!(dropped, "dropping rows with non-positive output");
    }
    let mask = BooleanChunked::from_slice("positive".into(), &keep);
    Ok((df.filter(&mask)?, dropped))
}

fn add_log_output(df: &mut DataFrame) -> Result<()> {
    let logged: Vec<Option<f64>> = f64_values(df, GRP_REAL, "features")?
        .into_iter()
        .map(|v| v.map(f64::ln))
        .collect();
    df.with_column(Column::new(LOG_GRP.into(), logged))?;
    Ok(())
}

fn add_case_share(df: &mut DataFrame) -> Result<()> {
    let scaled: Vec<Option<f64>> = f64_values(df, CASES_PER_MILLION, "features")?
        .into_iter()
        .map(|v| v.map(|v| v / CASES_SCALE))
        .collect();
    df.with_column(Column::new(CASES.into(), scaled))?;
    Ok(())
}

/// Codes trimmed quarter labels by their lexical rank.
pub fn add_time_index(df: &mut DataFrame) -> Result<QuarterIndex> {
    let labels = string_values(df, QUARTER, "features")?;
    let index = QuarterIndex::from_labels(labels.iter().map(String::as_str));
    let odd = index.non_canonical_labels();
    if !odd.is_empty() {
        warn!(
            labels = ?odd,
            "quarter labels outside YYYYQn are coded by string order"
        );
    }
    let codes: Vec<Option<i64>> = labels.iter().map(|label| index.code(label)).collect();
    df.with_column(Column::new(TIME.into(), codes))?;
    Ok(index)
}

/// Stable sort by province code, then time code.
pub fn sort_by_province_and_time(df: &DataFrame) -> Result<DataFrame> {
    let codes = string_values(df, PROVINCE_CODE, "features")?;
    let times = f64_values(df, TIME, "features")?;
    let mut order: Vec<usize> = (0..df.height()).collect();
    order.sort_by(|&a, &b| {
        codes[a]
            .cmp(&codes[b])
            .then_with(|| times[a].partial_cmp(&times[b]).unwrap_or(std::cmp::Ordering::Equal))
    });
    let idx: Vec<IdxSize> = order.into_iter().map(|i| i as IdxSize).collect();
    Ok(df.take(&IdxCa::from_vec("order".into(), idx))?)
}

/// One-row lags of stringency and case share within each province.
///
/// Expects rows sorted by province and time. The first row of every
/// province, and any lag of a missing value, is set to zero.
pub fn add_lags(df: &mut DataFrame) -> Result<()> {
    let codes = string_values(df, PROVINCE_CODE, "features")?;
    for (source, target) in [(STRINGENCY, STRINGENCY_LAG), (CASES, CASES_LAG)] {
        let values = f64_values(df, source, "features")?;
        let lagged = lag_within_groups(&codes, &values);
        df.with_column(Column::new(target.into(), lagged))?;
    }
    Ok(())
}

/// Shifts `values` down one row, restarting at every change of `groups`.
pub fn lag_within_groups(groups: &[String], values: &[Option<f64>]) -> Vec<f64> {
    (0..values.len())
        .map(|idx| {
            if idx > 0 && groups[idx] == groups[idx - 1] {
                values[idx - 1].unwrap_or(0.0)
            } else {
                0.0
            }
        })
        .collect()
}

/// Replaces nulls in `columns` with zero.
fn fill_missing_with_zero(df: &mut DataFrame, columns: &[&str]) -> Result<()> {
    for &name in columns {
        let values = f64_values(df, name, "features")?;
        let missing = values.iter().filter(|v| v.is_none()).count();
        if missing == 0 {
            continue;
        }
        debug!(column = name, missing, "filling missing values with zero");
        let filled: Vec<f64> = values.into_iter().map(|v| v.unwrap_or(0.0)).collect();
        df.with_column(Column::new(name.into(), filled))?;
    }
    Ok(())
}

fn add_interactions(df: &mut DataFrame, with_lags: bool) -> Result<()> {
    let urban = f64_values(df, URBANIZATION, "features")?;
    let mut pairs = vec![(STRINGENCY, STRINGENCY_X_URBAN)];
    if with_lags {
        pairs.push((STRINGENCY_LAG, STRINGENCY_LAG_X_URBAN));
    }
    for (source, target) in pairs {
        let values = f64_values(df, source, "features")?;
        let product: Vec<Option<f64>> = values
            .iter()
            .zip(&urban)
            .map(|(v, u)| Some((*v)? * (*u)?))
            .collect();
        df.with_column(Column::new(target.into(), product))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merged() -> DataFrame {
        DataFrame::new(vec![
            Column::new("GbProv".into(), vec![120000i64, 110000, 110000, 120000, 110000]),
            Column::new("ProvEN".into(), vec!["Tianjin", "Beijing", "Beijing", "Tianjin", "Beijing"]),
            Column::new("Quarter".into(), vec!["2020Q2", "2020Q2 ", "2020Q1", "2020Q1", "2020Q3"]),
            Column::new("GRP_real".into(), vec![Some(4.0), Some(2.0), Some(1.0), Some(3.0), Some(0.0)]),
            Column::new("Stringency_Index".into(), vec![Some(40.0), Some(20.0), Some(10.0), None, Some(50.0)]),
            Column::new("Covid_Cases_per_mil".into(), vec![4.0, 2.0, 1.0, 3.0, 5.0]),
            Column::new("Urbanization_Rate".into(), vec![85.49, 87.83, 87.83, 85.49, 87.83]),
        ])
        .unwrap()
    }

    #[test]
    fn builds_baseline_columns() {
        let prepared = build_features(merged(), FeatureOptions::default()).unwrap();
        let frame = &prepared.frame;

        assert_eq!(prepared.dropped_non_positive, 1);
        assert_eq!(frame.record_count(), 4);
        assert_eq!(prepared.quarters.labels(), ["2020Q1", "2020Q2"]);
        assert_eq!(
            frame.string_values("GbProv").unwrap(),
            vec!["110000", "110000", "120000", "120000"]
        );
        assert_eq!(
            frame.i64_values("Time").unwrap(),
            vec![Some(0), Some(1), Some(0), Some(1)]
        );
        let logs = frame.f64_values("log_GRP").unwrap();
        assert!((logs[1].unwrap() - 2f64.ln()).abs() < 1e-12);
        assert_eq!(frame.f64_values("Covid_Cases").unwrap()[0], Some(1e-6));
        assert!(!frame.has_column("Stringency_Index_L1"));
    }

    #[test]
    fn lags_restart_per_province_and_fill_zero() {
        let prepared = build_features(merged(), FeatureOptions::for_model(ModelSpec::Lagged)).unwrap();
        let frame = &prepared.frame;

        assert_eq!(
            frame.f64_values("Stringency_Index_L1").unwrap(),
            vec![Some(0.0), Some(10.0), Some(0.0), Some(0.0)]
        );
        assert_eq!(
            frame.f64_values("Covid_Cases_L1").unwrap(),
            vec![Some(0.0), Some(1e-6), Some(0.0), Some(3e-6)]
        );
    }

    #[test]
    fn interactions_multiply_by_urbanization() {
        let prepared =
            build_features(merged(), FeatureOptions::for_model(ModelSpec::Interaction)).unwrap();
        let frame = &prepared.frame;

        let current = frame.f64_values("Stringency_x_Urban").unwrap();
        assert!((current[0].unwrap() - 878.3).abs() < 1e-9);
        assert_eq!(current[2], None);
        assert_eq!(frame.f64_values("Stringency_Index").unwrap()[2], None);
        assert!(!frame.has_column("Stringency_L1_x_Urban"));
    }

    #[test]
    fn combined_model_zero_fills_current_values() {
        let mut df = merged();
        df.with_column(Column::new(
            "Covid_Cases_per_mil".into(),
            vec![Some(4.0), None, Some(1.0), Some(3.0), Some(5.0)],
        ))
        .unwrap();
        let prepared = build_features(df, FeatureOptions::for_model(ModelSpec::Combined)).unwrap();
        let frame = &prepared.frame;

        // rows: Beijing Q1, Beijing Q2, Tianjin Q1, Tianjin Q2
        assert_eq!(frame.f64_values("Stringency_Index").unwrap()[2], Some(0.0));
        assert_eq!(frame.f64_values("Covid_Cases").unwrap()[1], Some(0.0));
        let current = frame.f64_values("Stringency_x_Urban").unwrap();
        assert!((current[0].unwrap() - 878.3).abs() < 1e-9);
        assert_eq!(current[2], Some(0.0));
        let lagged = frame.f64_values("Stringency_L1_x_Urban").unwrap();
        assert!((lagged[1].unwrap() - 878.3).abs() < 1e-9);
        for column in ModelSpec::Combined.regressors() {
            assert!(frame.f64_values(column).unwrap().iter().all(Option::is_some));
        }
    }

    #[test]
    fn interactions_require_urbanization() {
        let df = merged().drop("Urbanization_Rate").unwrap();
        let err = build_features(df, FeatureOptions::for_model(ModelSpec::Interaction)).unwrap_err();

        assert!(matches!(err, PanelError::MissingColumn { ref column, .. } if column == "Urbanization_Rate"));
    }

    #[test]
    fn duplicates_can_be_fatal() {
        let mut df = merged();
        df.with_column(Column::new(
            "Quarter".into(),
            vec!["2020Q2", "2020Q1", "2020Q1", "2020Q1", "2020Q3"],
        ))
        .unwrap();

        let prepared = build_features(df.clone(), FeatureOptions::default()).unwrap();
        assert_eq!(prepared.duplicates.len(), 2);

        let options = FeatureOptions::default().with_fail_on_duplicates(true);
        let err = build_features(df, options).unwrap_err();
        assert!(matches!(err, PanelError::DuplicateObservations { rows: 2, keys: 1 }));
    }

    #[test]
    fn lag_helper_shifts_within_groups() {
        let groups: Vec<String> = ["a", "a", "a", "b"].iter().map(ToString::to_string).collect();
        let values = [Some(1.0), None, Some(3.0), Some(4.0)];

        assert_eq!(lag_within_groups(&groups, &values), vec![0.0, 1.0, 0.0, 0.0]);
    }
}

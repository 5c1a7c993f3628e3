//! Per-province output series for trend charts.

use polars::prelude::DataFrame;

use covcost_model::columns::{PROVINCE_NAME, QUARTER};

use crate::error::Result;
use crate::frame::{f64_values, string_values};

/// Provinces charted when none are requested.
pub const DEFAULT_TREND_PROVINCES: [&str; 4] = ["Beijing", "Guangdong", "Hubei", "Xinjiang"];

/// Observed values of one province in quarter order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceSeries {
    pub province: String,
    /// `(quarter label, value)` pairs; missing values are skipped.
    pub points: Vec<(String, f64)>,
}

/// Extracts the series of the requested provinces from a long panel.
///
/// Series are returned in request order. Provinces absent from the panel
/// produce no series.
pub fn province_series(
    panel: &DataFrame,
    value: &str,
    provinces: &[String],
) -> Result<Vec<ProvinceSeries>> {
    let names = string_values(panel, PROVINCE_NAME, "trend")?;
    let quarters = string_values(panel, QUARTER, "trend")?;
    let values = f64_values(panel, value, "trend")?;

    let mut series = Vec::new();
    for province in provinces {
        let mut points: Vec<(String, f64)> = names
            .iter()
            .zip(&quarters)
            .zip(&values)
            .filter(|((name, _), _)| *name == province)
            .filter_map(|((_, quarter), value)| value.map(|v| (quarter.trim().to_string(), v)))
            .collect();
        if points.is_empty() {
            continue;
        }
        points.sort_by(|a, b| a.0.cmp(&b.0));
        series.push(ProvinceSeries {
            province: province.clone(),
            points,
        });
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    #[test]
    fn selects_requested_provinces_in_order() {
        let df = DataFrame::new(vec![
            Column::new("ProvEN".into(), vec!["Hubei", "Beijing", "Hubei", "Beijing"]),
            Column::new("Quarter".into(), vec!["2020Q2", "2020Q1", "2020Q1", "2020Q2"]),
            Column::new("GRP_real".into(), vec![Some(9.0), Some(8.0), Some(7.0), None]),
        ])
        .unwrap();
        let wanted = vec!["Beijing".to_string(), "Hubei".to_string(), "Tibet".to_string()];
        let series = province_series(&df, "GRP_real", &wanted).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].province, "Beijing");
        assert_eq!(series[0].points, vec![("2020Q1".to_string(), 8.0)]);
        assert_eq!(
            series[1].points,
            vec![("2020Q1".to_string(), 7.0), ("2020Q2".to_string(), 9.0)]
        );
    }
}

//! Trend chart of quarterly real output.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::path::Path;

use plotters::prelude::{
    BLACK, ChartBuilder, Circle, Color, IntoDrawingArea, LineSeries, Palette, Palette99,
    PathElement, SVGBackend, WHITE,
};
use tracing::info;

use covcost_panel::ProvinceSeries;

use crate::error::{ReportError, Result};

pub const TREND_TITLE: &str = "Quarterly Real GRP for Select Provinces (2020-2022)";

const CHART_SIZE: (u32, u32) = (1200, 700);

/// Writes one line per province to an SVG file at `path`.
///
/// The x axis is the sorted union of quarter labels across all series.
pub fn plot_trends(series: &[ProvinceSeries], path: &Path) -> Result<()> {
    let labels: Vec<String> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(label, _)| label.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if labels.is_empty() {
        return Err(ReportError::EmptyChart);
    }

    let (mut y_min, mut y_max) = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(_, value)| *value))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let padding = ((y_max - y_min) * 0.05).max(1.0);
    y_min -= padding;
    y_max += padding;
    let x_max = (labels.len() - 1).max(1) as f64;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|err| plot_error(path, err))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(TREND_TITLE, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)
        .map_err(|err| plot_error(path, err))?;

    chart
        .configure_mesh()
        .x_desc("Quarter")
        .y_desc("Real GRP (2019 Billion RMB)")
        .x_labels(labels.len())
        .x_label_formatter(&|x| quarter_label(&labels, *x))
        .draw()
        .map_err(|err| plot_error(path, err))?;

    for (idx, province) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let points: Vec<(f64, f64)> = province
            .points
            .iter()
            .filter_map(|(label, value)| {
                labels
                    .iter()
                    .position(|candidate| candidate == label)
                    .map(|x| (x as f64, *value))
            })
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
            .map_err(|err| plot_error(path, err))?
            .label(province.province.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart
            .draw_series(points.into_iter().map(|p| Circle::new(p, 3, color.filled())))
            .map_err(|err| plot_error(path, err))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|err| plot_error(path, err))?;
    root.present().map_err(|err| plot_error(path, err))?;

    info!(path = %path.display(), series = series.len(), quarters = labels.len(), "trend chart written");
    Ok(())
}

/// Label of the quarter nearest to `x`; blank between ticks.
fn quarter_label(labels: &[String], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

fn plot_error(path: &Path, err: impl Display) -> ReportError {
    ReportError::Plot {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_only_on_whole_ticks() {
        let labels = vec!["2020Q1".to_string(), "2020Q2".to_string()];
        assert_eq!(quarter_label(&labels, 0.0), "2020Q1");
        assert_eq!(quarter_label(&labels, 1.0000000001), "2020Q2");
        assert_eq!(quarter_label(&labels, 0.5), "");
        assert_eq!(quarter_label(&labels, 5.0), "");
        assert_eq!(quarter_label(&labels, -1.0), "");
    }
}

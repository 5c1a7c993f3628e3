//! Report text and chart output.

use covcost_model::{
    BetaSource, Coefficient, CostSummary, CovarianceKind, DuplicateEntry, DuplicateReport,
    ModelSpec, QuarterIndex, RegressionResult, UrbanizationTable,
};
use covcost_panel::ProvinceSeries;
use covcost_report::{
    MISSING_VARIABLES, ReportError, Styling, interpretation, plot_trends, render_cost,
    render_duplicates, render_regression, render_time_index, to_json,
};

fn coefficient(name: &str, estimate: f64, p_value: f64) -> Coefficient {
    Coefficient {
        name: name.to_string(),
        estimate,
        std_error: 0.001,
        t_stat: estimate / 0.001,
        p_value,
        ci_lower: estimate - 0.00196,
        ci_upper: estimate + 0.00196,
    }
}

fn result(model: ModelSpec, coefficients: Vec<Coefficient>) -> RegressionResult {
    RegressionResult {
        model,
        dependent: "log_GRP".to_string(),
        coefficients,
        n_obs: 372,
        n_entities: 31,
        n_periods: 12,
        df_resid: 328,
        r_squared: 0.2154,
        covariance: CovarianceKind::Clustered,
    }
}

#[test]
fn baseline_interpretation() {
    let fitted = result(
        ModelSpec::Baseline,
        vec![
            coefficient("Stringency_Index", -0.00075, 0.001),
            coefficient("Covid_Cases", 1.5, 0.3),
        ],
    );
    let text = interpretation(&fitted, &UrbanizationTable::default()).join("\n");
    insta::assert_snapshot!("baseline_interpretation", text);
}

#[test]
fn lagged_interpretation() {
    let fitted = result(
        ModelSpec::Lagged,
        vec![
            coefficient("Stringency_Index", -0.00123456, 0.04567),
            coefficient("Stringency_Index_L1", 0.0005, 0.5),
            coefficient("Covid_Cases", 1.5, 0.3),
            coefficient("Covid_Cases_L1", 0.2, 0.8),
        ],
    );
    let text = interpretation(&fitted, &UrbanizationTable::default()).join("\n");
    insta::assert_snapshot!("lagged_interpretation", text);
}

#[test]
fn significant_interaction_reports_total_effects() {
    let fitted = result(
        ModelSpec::Interaction,
        vec![
            coefficient("Stringency_Index", -0.002, 0.0123),
            coefficient("Stringency_x_Urban", 0.00001, 0.05),
            coefficient("Covid_Cases", 1.5, 0.3),
        ],
    );
    let text = interpretation(&fitted, &UrbanizationTable::default()).join("\n");
    insta::assert_snapshot!("interaction_interpretation", text);
}

#[test]
fn insignificant_interaction_skips_total_effects() {
    let fitted = result(
        ModelSpec::Interaction,
        vec![
            coefficient("Stringency_Index", -0.002, 0.0123),
            coefficient("Stringency_x_Urban", 0.00001, 0.1),
            coefficient("Covid_Cases", 1.5, 0.3),
        ],
    );
    let lines = interpretation(&fitted, &UrbanizationTable::default());

    assert!(lines.contains(
        &"The interaction term is not statistically significant at conventional levels.".to_string()
    ));
    assert!(!lines.iter().any(|line| line.contains("Gansu")));
}

#[test]
fn missing_coefficient_is_reported_and_rendering_continues() {
    let fitted = result(
        ModelSpec::Lagged,
        vec![coefficient("Stringency_Index", -0.001, 0.2)],
    );
    let lines = interpretation(&fitted, &UrbanizationTable::default());
    assert_eq!(lines.last().map(String::as_str), Some(MISSING_VARIABLES));

    let text = render_regression(&fitted, &UrbanizationTable::default(), Styling::Never);
    assert!(text.contains("Total Observations: 372"));
    assert!(text.ends_with(&format!("{MISSING_VARIABLES}\n")));
}

#[test]
fn combined_model_is_table_only() {
    let coefficients = ModelSpec::Combined
        .regressors()
        .iter()
        .map(|name| coefficient(name, 0.001, 0.5))
        .collect();
    let fitted = result(ModelSpec::Combined, coefficients);

    assert!(interpretation(&fitted, &UrbanizationTable::default()).is_empty());
    let text = render_regression(&fitted, &UrbanizationTable::default(), Styling::Never);
    assert!(text.contains("TWFE Results with Lagged Terms and Urbanization Interaction"));
    assert!(text.contains("Stringency_L1_x_Urban"));
    assert!(text.contains("Number of Provinces: 31"));
    assert!(text.contains("R-squared (two-way demeaned): 0.2154"));
    assert!(!text.contains("Interpretation"));
}

#[test]
fn cost_banner() {
    let summary = CostSummary {
        beta: -0.00075,
        beta_source: BetaSource::Fixed,
        observations: 372,
        total_billion: 1_234_567.891,
    };
    insta::assert_snapshot!("cost_banner", render_cost(&summary).trim_end());
}

#[test]
fn duplicate_warning_lists_every_row() {
    let entry = |row: usize, value: &str| DuplicateEntry {
        row,
        province_code: "110000".to_string(),
        province_name: "Beijing".to_string(),
        quarter: "2020Q1".to_string(),
        values: vec![("GRP_real".to_string(), value.to_string())],
    };
    let report = DuplicateReport {
        entries: vec![entry(0, "100"), entry(7, "105")],
    };
    let text = render_duplicates(&report, Styling::Never);

    assert!(text.starts_with(
        "!!! WARNING: Found duplicate entries for the same province and quarter !!!"
    ));
    assert!(text.contains("100") && text.contains("105"));
    assert!(text.contains("2 rows share 1 province-quarter keys"));

    let clean = render_duplicates(&DuplicateReport::default(), Styling::Never);
    assert_eq!(
        clean,
        "--- No duplicate province-quarter entries found. Proceeding. ---\n"
    );
}

#[test]
fn time_index_shows_both_ends() {
    let labels: Vec<String> = (0..12)
        .map(|q| format!("{}Q{}", 2020 + q / 4, q % 4 + 1))
        .collect();
    let quarters = QuarterIndex::from_labels(labels.iter().map(String::as_str));
    let text = render_time_index(&quarters, Styling::Never);

    assert!(text.contains("2020Q1") && text.contains("2021Q1"));
    assert!(text.contains("2021Q4") && text.contains("2022Q4"));
    assert!(!text.contains("2021Q2") && !text.contains("2021Q3"));
    assert!(text.contains("\n...\n"));
}

#[test]
fn json_carries_coefficients() {
    let fitted = result(
        ModelSpec::Baseline,
        vec![coefficient("Stringency_Index", -0.00075, 0.001)],
    );
    let json: serde_json::Value = serde_json::from_str(&to_json(&fitted).unwrap()).unwrap();

    assert_eq!(json["model"], "baseline");
    assert_eq!(json["covariance"], "clustered");
    assert_eq!(json["coefficients"][0]["name"], "Stringency_Index");
    assert_eq!(json["n_obs"], 372);
    assert_eq!(json["r_squared"], 0.2154);
}

#[test]
fn trend_chart_is_written_as_svg() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grp.svg");
    let series = vec![
        ProvinceSeries {
            province: "Beijing".to_string(),
            points: vec![("2020Q1".to_string(), 8.0), ("2020Q2".to_string(), 9.5)],
        },
        ProvinceSeries {
            province: "Hubei".to_string(),
            points: vec![("2020Q1".to_string(), 7.0), ("2020Q3".to_string(), 10.0)],
        },
    ];
    plot_trends(&series, &path).unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Quarterly Real GRP for Select Provinces (2020-2022)"));
    assert!(svg.contains("Hubei"));
}

#[test]
fn empty_chart_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = plot_trends(&[], &dir.path().join("empty.svg")).unwrap_err();
    assert!(matches!(err, ReportError::EmptyChart));
}

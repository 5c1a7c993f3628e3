//! Tests for covcost-model types.

use covcost_model::{
    BetaSource, Coefficient, CostSummary, CovarianceKind, DuplicateEntry, DuplicateReport,
    ModelSpec, RegressionResult,
};

fn coefficient(name: &str, estimate: f64, p_value: f64) -> Coefficient {
    Coefficient {
        name: name.to_string(),
        estimate,
        std_error: 0.1,
        t_stat: estimate / 0.1,
        p_value,
        ci_lower: estimate - 0.196,
        ci_upper: estimate + 0.196,
    }
}

fn sample_result() -> RegressionResult {
    RegressionResult {
        model: ModelSpec::Baseline,
        dependent: "log_GRP".to_string(),
        coefficients: vec![
            coefficient("Stringency_Index", -0.0012, 0.03),
            coefficient("Covid_Cases", 1.5, 0.4),
        ],
        n_obs: 372,
        n_entities: 31,
        n_periods: 12,
        df_resid: 328,
        r_squared: 0.12,
        covariance: CovarianceKind::Clustered,
    }
}

#[test]
fn looks_up_coefficients_by_name() {
    let result = sample_result();
    assert_eq!(result.param("Stringency_Index"), Some(-0.0012));
    assert_eq!(result.p_value("Covid_Cases"), Some(0.4));
    assert!(result.param("Stringency_x_Urban").is_none());
}

#[test]
fn result_serializes() {
    let result = sample_result();
    let json = serde_json::to_string(&result).expect("serialize result");
    assert!(json.contains("\"model\":\"baseline\""));
    assert!(json.contains("\"covariance\":\"clustered\""));
    let round: RegressionResult = serde_json::from_str(&json).expect("deserialize result");
    assert_eq!(round, result);
}

#[test]
fn cost_summary_converts_to_trillions() {
    let summary = CostSummary {
        beta: -0.00075,
        beta_source: BetaSource::Fixed,
        observations: 372,
        total_billion: 2_345.5,
    };
    assert!((summary.total_trillion() - 2.3455).abs() < 1e-12);
}

#[test]
fn duplicate_report_counts_distinct_keys() {
    let entry = |row: usize, code: &str, quarter: &str| DuplicateEntry {
        row,
        province_code: code.to_string(),
        province_name: "Beijing".to_string(),
        quarter: quarter.to_string(),
        values: Vec::new(),
    };
    let report = DuplicateReport {
        entries: vec![
            entry(0, "110000", "2020Q1"),
            entry(3, "110000", "2020Q1"),
            entry(5, "110000", "2020Q2"),
            entry(7, "110000", "2020Q2"),
            entry(9, "110000", "2020Q2"),
        ],
    };
    assert_eq!(report.len(), 5);
    assert_eq!(report.key_count(), 2);
    assert!(DuplicateReport::default().is_empty());
}

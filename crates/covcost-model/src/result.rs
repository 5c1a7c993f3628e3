//! Estimator output consumed by the reporter.

use serde::{Deserialize, Serialize};

use crate::spec::ModelSpec;

/// Covariance estimator used for the standard errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CovarianceKind {
    /// Entity-clustered sandwich without small-sample scaling.
    Clustered,
    /// Entity-clustered sandwich scaled by `G/(G-1) * (N-1)/(N-K)`.
    ClusteredDebiased,
}

impl CovarianceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CovarianceKind::Clustered => "Clustered",
            CovarianceKind::ClusteredDebiased => "Clustered (debiased)",
        }
    }
}

/// One estimated regressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_stat: f64,
    pub p_value: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

/// Fitted two-way fixed-effects regression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub model: ModelSpec,
    pub dependent: String,
    pub coefficients: Vec<Coefficient>,
    pub n_obs: usize,
    pub n_entities: usize,
    pub n_periods: usize,
    pub df_resid: usize,
    /// R² of the regression after removing province and quarter effects.
    pub r_squared: f64,
    pub covariance: CovarianceKind,
}

impl RegressionResult {
    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|coef| coef.name == name)
    }

    /// Point estimate for a regressor.
    pub fn param(&self, name: &str) -> Option<f64> {
        self.coefficient(name).map(|coef| coef.estimate)
    }

    pub fn p_value(&self, name: &str) -> Option<f64> {
        self.coefficient(name).map(|coef| coef.p_value)
    }
}

/// Percentage change in the level of a logged outcome for a one-unit change
/// of a regressor with coefficient `beta`.
pub fn percent_effect(beta: f64) -> f64 {
    (beta.exp() - 1.0) * 100.0
}

use serde::{Deserialize, Serialize};

/// Stringency elasticity used when no estimate is supplied: the
/// statistically significant `Stringency_Index` coefficient of the lagged
/// model.
pub const DEFAULT_STRINGENCY_BETA: f64 = -0.00075;

/// Where the elasticity used for the counterfactual came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetaSource {
    /// Fixed constant, either the default or a `--beta` override.
    Fixed,
    /// Estimated in the same run from the baseline model.
    Estimated,
}

/// Aggregate counterfactual policy cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    pub beta: f64,
    pub beta_source: BetaSource,
    /// Observations that contributed to the total.
    pub observations: usize,
    /// Total policy-attributable GRP loss, billion 2019 RMB.
    pub total_billion: f64,
}

impl CostSummary {
    pub fn total_trillion(&self) -> f64 {
        self.total_billion / 1000.0
    }
}

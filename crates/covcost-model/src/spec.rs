//! Regression model specifications.
//!
//! Every specification regresses `log_GRP` on a fixed set of regressors
//! with province and quarter fixed effects. They differ only in which
//! derived features they need and which regressors they include.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::columns::{
    CASES, CASES_LAG, LOG_GRP, STRINGENCY, STRINGENCY_LAG, STRINGENCY_LAG_X_URBAN,
    STRINGENCY_X_URBAN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSpec {
    /// Contemporaneous stringency and cases.
    Baseline,
    /// Adds one-quarter lags of stringency and cases.
    Lagged,
    /// Adds the stringency × urbanization interaction.
    Interaction,
    /// Lags and interactions together.
    Combined,
}

impl ModelSpec {
    pub const ALL: [ModelSpec; 4] = [
        ModelSpec::Baseline,
        ModelSpec::Lagged,
        ModelSpec::Interaction,
        ModelSpec::Combined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSpec::Baseline => "baseline",
            ModelSpec::Lagged => "lagged",
            ModelSpec::Interaction => "interaction",
            ModelSpec::Combined => "combined",
        }
    }

    /// Report banner for the model.
    pub fn title(&self) -> &'static str {
        match self {
            ModelSpec::Baseline => "Two-Way Fixed Effects (TWFE) Panel Regression Results",
            ModelSpec::Lagged => "TWFE Panel Regression Results with Lagged Independent Variables",
            ModelSpec::Interaction => {
                "TWFE Panel Regression Results with Urbanization Interaction Term"
            }
            ModelSpec::Combined => "TWFE Results with Lagged Terms and Urbanization Interaction",
        }
    }

    pub fn dependent(&self) -> &'static str {
        LOG_GRP
    }

    /// Regressors in report order.
    ///
    /// The urbanization rate itself never appears: it is time-invariant and
    /// absorbed by the province effects, only its interactions are kept.
    pub fn regressors(&self) -> &'static [&'static str] {
        match self {
            ModelSpec::Baseline => &[STRINGENCY, CASES],
            ModelSpec::Lagged => &[STRINGENCY, STRINGENCY_LAG, CASES, CASES_LAG],
            ModelSpec::Interaction => &[STRINGENCY, STRINGENCY_X_URBAN, CASES],
            ModelSpec::Combined => &[
                STRINGENCY,
                STRINGENCY_LAG,
                STRINGENCY_X_URBAN,
                STRINGENCY_LAG_X_URBAN,
                CASES,
                CASES_LAG,
            ],
        }
    }

    pub fn needs_lags(&self) -> bool {
        matches!(self, ModelSpec::Lagged | ModelSpec::Combined)
    }

    pub fn needs_urbanization(&self) -> bool {
        matches!(self, ModelSpec::Interaction | ModelSpec::Combined)
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_requirements_follow_regressors() {
        for spec in ModelSpec::ALL {
            let regressors = spec.regressors();
            assert_eq!(spec.needs_lags(), regressors.contains(&STRINGENCY_LAG));
            assert_eq!(
                spec.needs_urbanization(),
                regressors.contains(&STRINGENCY_X_URBAN)
            );
            assert_eq!(regressors[0], STRINGENCY);
        }
    }
}

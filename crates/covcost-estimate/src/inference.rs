//! Reference distributions for tests and intervals.

use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

use crate::error::{EstimateError, Result};

/// Two-sided level of the reported confidence intervals.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Distribution of the t-statistics under the null.
#[derive(Debug, Clone)]
pub enum Reference {
    Normal(Normal),
    StudentsT(StudentsT),
}

impl Reference {
    pub fn normal() -> Result<Self> {
        Normal::new(0.0, 1.0)
            .map(Reference::Normal)
            .map_err(|e| EstimateError::Distribution {
                distribution: "standard normal",
                message: e.to_string(),
            })
    }

    pub fn students_t(df: usize) -> Result<Self> {
        StudentsT::new(0.0, 1.0, df as f64)
            .map(Reference::StudentsT)
            .map_err(|e| EstimateError::Distribution {
                distribution: "Student-t",
                message: e.to_string(),
            })
    }

    /// Two-sided p-value of `t`.
    pub fn p_value(&self, t: f64) -> f64 {
        if !t.is_finite() {
            return if t.is_nan() { f64::NAN } else { 0.0 };
        }
        let tail = match self {
            Reference::Normal(d) => d.sf(t.abs()),
            Reference::StudentsT(d) => d.sf(t.abs()),
        };
        (2.0 * tail).min(1.0)
    }

    /// Critical value for a two-sided interval at [`CONFIDENCE_LEVEL`].
    pub fn critical_value(&self) -> f64 {
        let q = 1.0 - (1.0 - CONFIDENCE_LEVEL) / 2.0;
        match self {
            Reference::Normal(d) => d.inverse_cdf(q),
            Reference::StudentsT(d) => d.inverse_cdf(q),
        }
    }
}

//! Two-way fixed-effects estimation for the provincial panel.
//!
//! Province and quarter effects are absorbed by alternating projections,
//! the remaining within variation is fitted by OLS and standard errors are
//! clustered by province.

pub mod covariance;
pub mod design;
pub mod error;
pub mod fixed_effects;
pub mod inference;
pub mod twfe;

pub use design::{Sample, build_sample};
pub use error::{EstimateError, Result};
pub use fixed_effects::FixedEffects;
pub use twfe::{FitOptions, fit_twfe};

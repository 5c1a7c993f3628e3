//! Error types for model estimation.

use thiserror::Error;

use covcost_panel::PanelError;

/// Errors that can occur while fitting a model.
#[derive(Debug, Error)]
pub enum EstimateError {
    /// Panel columns could not be read.
    #[error(transparent)]
    Panel(#[from] PanelError),

    /// No complete observation left to fit.
    #[error("no complete observations for the {model} model")]
    EmptySample { model: String },

    /// Regressor has no variation left after removing fixed effects.
    #[error("regressor '{name}' is absorbed by the fixed effects")]
    AbsorbedRegressor { name: String },

    /// X'X cannot be inverted.
    #[error("design matrix is rank deficient after absorbing fixed effects")]
    Singular,

    /// Too few observations for the number of parameters.
    #[error("no residual degrees of freedom: {n_obs} observations, {absorbed} absorbed effects, {regressors} regressors")]
    NoResidualDegreesOfFreedom {
        n_obs: usize,
        absorbed: usize,
        regressors: usize,
    },

    /// Invalid solver input.
    #[error("invalid estimation input: {0}")]
    Validation(String),

    /// Reference distribution could not be built.
    #[error("failed to construct {distribution} distribution: {message}")]
    Distribution {
        distribution: &'static str,
        message: String,
    },
}

/// Result type for estimation.
pub type Result<T> = std::result::Result<T, EstimateError>;

//! Two-way fixed-effects OLS.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, info};

use covcost_model::{Coefficient, CovarianceKind, ModelSpec, RegressionResult};
use covcost_panel::PanelFrame;

use crate::covariance::clustered_covariance;
use crate::design::build_sample;
use crate::error::{EstimateError, Result};
use crate::fixed_effects::FixedEffects;
use crate::inference::Reference;

/// Share of a regressor's raw sum of squares that must survive absorption.
const ABSORBED_RATIO: f64 = 1e-12;


/// Estimation switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitOptions {
    /// Apply the small-sample cluster correction and use Student-t inference.
    pub debiased: bool,
}

impl FitOptions {
    fn covariance_kind(self) -> CovarianceKind {
        if self.debiased {
            CovarianceKind::ClusteredDebiased
        } else {
            CovarianceKind::Clustered
        }
    }
}

/// Regresses `log_GRP` on the regressors of `spec` with province and
/// quarter effects, clustering standard errors by province.
pub fn fit_twfe(panel: &PanelFrame, spec: ModelSpec, options: FitOptions) -> Result<RegressionResult> {
    let sample = build_sample(panel, spec)?;
    let n = sample.n_obs();
    let k = sample.regressors.len();
    let effects = FixedEffects::new(sample.entity.clone(), sample.time.clone())?;

    let y = DVector::from_vec(effects.absorb(&sample.y)?);
    let mut x = DMatrix::<f64>::zeros(n, k);
    for (j, (name, column)) in sample.regressors.iter().zip(&sample.columns).enumerate() {
        let raw: f64 = column.iter().map(|v| v * v).sum();
        let demeaned = effects.absorb(column)?;
        let within: f64 = demeaned.iter().map(|v| v * v).sum();
        if raw == 0.0 || within <= ABSORBED_RATIO * raw {
            return Err(EstimateError::AbsorbedRegressor { name: name.clone() });
        }
        x.set_column(j, &DVector::from_vec(demeaned));
    }

    let absorbed = effects.absorbed_dof();
    if n <= k + absorbed {
        return Err(EstimateError::NoResidualDegreesOfFreedom {
            n_obs: n,
            absorbed,
            regressors: k,
        });
    }
    let df_resid = n - k - absorbed;

    // Regressors differ by many orders of magnitude (case shares near 1e-5,
    // interactions in the thousands), so solve on unit-norm columns.
    let scales = normalize_columns(&mut x);
    check_rank(&x)?;
    let xtx_inv = (x.transpose() * &x).try_inverse().ok_or(EstimateError::Singular)?;
    let scaled_beta = &xtx_inv * (x.transpose() * &y);
    let residuals = &y - &x * &scaled_beta;
    let beta = scaled_beta.component_div(&scales);

    let rss = residuals.norm_squared();
    let tss = y.norm_squared();
    let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { 0.0 };

    let scaled_covariance =
        clustered_covariance(&x, &residuals, &xtx_inv, &sample.entity, options.debiased);
    let reference = if options.debiased {
        Reference::students_t(df_resid)?
    } else {
        Reference::normal()?
    };
    let critical = reference.critical_value();

    let coefficients = sample
        .regressors
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let estimate = beta[j];
            let std_error = scaled_covariance[(j, j)].max(0.0).sqrt() / scales[j];
            let t_stat = estimate / std_error;
            Coefficient {
                name: name.clone(),
                estimate,
                std_error,
                t_stat,
                p_value: reference.p_value(t_stat),
                ci_lower: estimate - critical * std_error,
                ci_upper: estimate + critical * std_error,
            }
        })
        .collect();

    info!(
        model = %spec,
        n_obs = n,
        entities = effects.n_entities(),
        periods = effects.n_periods(),
        dropped = sample.dropped,
        df_resid,
        r_squared,
        "model fitted"
    );

    Ok(RegressionResult {
        model: spec,
        dependent: spec.dependent().to_string(),
        coefficients,
        n_obs: n,
        n_entities: effects.n_entities(),
        n_periods: effects.n_periods(),
        df_resid,
        r_squared,
        covariance: options.covariance_kind(),
    })
}

/// Scales every column to unit Euclidean norm and returns the norms.
///
/// Columns must be non-zero; absorbed regressors are rejected before this.
fn normalize_columns(x: &mut DMatrix<f64>) -> DVector<f64> {
    let mut scales = DVector::<f64>::zeros(x.ncols());
    for (j, mut column) in x.column_iter_mut().enumerate() {
        let norm = column.norm();
        column /= norm;
        scales[j] = norm;
    }
    scales
}

/// Rejects a design whose smallest singular value is within rounding
/// error of zero, using the `s_max * max(n, k) * eps` cutoff.
fn check_rank(x: &DMatrix<f64>) -> Result<()> {
    let singular = x.clone().svd(false, false).singular_values;
    let largest = singular.iter().copied().fold(0.0, f64::max);
    let smallest = singular.iter().copied().fold(f64::INFINITY, f64::min);
    let tolerance = largest * x.nrows().max(x.ncols()) as f64 * f64::EPSILON;
    debug!(largest, smallest, tolerance, "design singular value range");
    if largest.is_nan() || largest <= 0.0 || smallest <= tolerance {
        return Err(EstimateError::Singular);
    }
    Ok(())
}

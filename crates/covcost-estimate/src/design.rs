//! Regression sample extraction.

use std::collections::BTreeMap;

use tracing::debug;

use covcost_model::ModelSpec;
use covcost_model::columns::{PROVINCE_CODE, TIME};
use covcost_panel::PanelFrame;

use crate::error::{EstimateError, Result};

/// Complete-case sample of one model, with 0-based group levels.
#[derive(Debug, Clone)]
pub struct Sample {
    pub regressors: Vec<String>,
    pub y: Vec<f64>,
    /// One vector per regressor.
    pub columns: Vec<Vec<f64>>,
    pub entity: Vec<usize>,
    pub time: Vec<usize>,
    /// Rows dropped for a missing dependent, regressor or index value.
    pub dropped: usize,
}

impl Sample {
    pub fn n_obs(&self) -> usize {
        self.y.len()
    }
}

/// Pulls the dependent, regressors and panel index of `spec` out of `panel`.
pub fn build_sample(panel: &PanelFrame, spec: ModelSpec) -> Result<Sample> {
    let dependent = panel.f64_values(spec.dependent())?;
    let regressors: Vec<Vec<Option<f64>>> = spec
        .regressors()
        .iter()
        .map(|name| panel.f64_values(name))
        .collect::<covcost_panel::Result<_>>()?;
    let codes = panel.string_values(PROVINCE_CODE)?;
    let times = panel.i64_values(TIME)?;

    let complete: Vec<usize> = (0..panel.record_count())
        .filter(|&row| {
            dependent[row].is_some()
                && times[row].is_some()
                && regressors.iter().all(|values| values[row].is_some())
        })
        .collect();
    let dropped = panel.record_count() - complete.len();
    if dropped > 0 {
        debug!(model = %spec, dropped, "dropping incomplete observations");
    }
    if complete.is_empty() {
        return Err(EstimateError::EmptySample {
            model: spec.to_string(),
        });
    }

    let entity = dense_levels(complete.iter().map(|&row| codes[row].clone()));
    let time = dense_levels(complete.iter().filter_map(|&row| times[row]));
    let y = complete.iter().filter_map(|&row| dependent[row]).collect();
    let columns = regressors
        .iter()
        .map(|values| complete.iter().filter_map(|&row| values[row]).collect())
        .collect();

    Ok(Sample {
        regressors: spec.regressors().iter().map(ToString::to_string).collect(),
        y,
        columns,
        entity,
        time,
        dropped,
    })
}

/// Maps keys to dense 0-based levels in sorted key order.
fn dense_levels<K: Ord + Clone>(keys: impl Iterator<Item = K>) -> Vec<usize> {
    let keys: Vec<K> = keys.collect();
    let mut levels: BTreeMap<K, usize> = keys.iter().cloned().map(|k| (k, 0)).collect();
    for (level, slot) in levels.values_mut().enumerate() {
        *slot = level;
    }
    keys.iter().map(|k| levels[k]).collect()
}

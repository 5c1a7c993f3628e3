//! Counterfactual output without stringency measures.

use polars::prelude::{Column, DataFrame};
use tracing::info;

use covcost_model::columns::{GRP_COUNTERFACTUAL, GRP_REAL, POLICY_COST, STRINGENCY};
use covcost_model::{BetaSource, CostSummary};

use crate::error::Result;
use crate::frame::f64_values;

/// Adds `GRP_counterfactual` and `Policy_Cost` and sums the cost.
///
/// The counterfactual removes the stringency effect from observed output:
/// `GRP_real / exp(beta * Stringency_Index)`. Rows missing either input
/// carry a null cost and do not contribute to the total.
pub fn apply_counterfactual(
    panel: &mut DataFrame,
    beta: f64,
    beta_source: BetaSource,
) -> Result<CostSummary> {
    let grp = f64_values(panel, GRP_REAL, "cost")?;
    let stringency = f64_values(panel, STRINGENCY, "cost")?;

    let counterfactual: Vec<Option<f64>> = grp
        .iter()
        .zip(&stringency)
        .map(|(grp, s)| Some((*grp)? / (beta * (*s)?).exp()))
        .collect();
    let cost: Vec<Option<f64>> = counterfactual
        .iter()
        .zip(&grp)
        .map(|(cf, grp)| Some((*cf)? - (*grp)?))
        .collect();

    let observations = cost.iter().flatten().count();
    let total_billion: f64 = cost.iter().flatten().sum();

    panel.with_column(Column::new(GRP_COUNTERFACTUAL.into(), counterfactual))?;
    panel.with_column(Column::new(POLICY_COST.into(), cost))?;

    info!(beta, observations, total_billion, "counterfactual cost computed");
    Ok(CostSummary {
        beta,
        beta_source,
        observations,
        total_billion,
    })
}

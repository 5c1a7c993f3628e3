//! Analysis pipeline with explicit stages.
//!
//! The stages run in order:
//! 1. **Ingest**: read the wide source tables
//! 2. **Reshape**: one row per province-quarter for each source
//! 3. **Merge**: inner join on province and quarter, optional urbanization
//! 4. **Features**: duplicate check, log output, time index, lags, interactions
//! 5. **Estimate**: two-way fixed-effects fit
//!
//! The cost and trend runs reuse the first stages and branch off after the
//! reshape.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use covcost_estimate::{FitOptions, fit_twfe};
use covcost_ingest::{DataSources, SourceSet, SourceTables, load_urbanization_csv};
use covcost_model::columns::{CASES_PER_MILLION, GRP_REAL, STRINGENCY};
use covcost_model::{
    BetaSource, CostSummary, DEFAULT_STRINGENCY_BETA, ModelSpec, RegressionResult,
    UrbanizationTable,
};
use covcost_panel::{
    FeatureOptions, PreparedPanel, ProvinceSeries, apply_counterfactual, attach_urbanization,
    build_features, merge_panels, province_series, reshape_to_panel,
};

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Load the wide tables of `set`.
pub fn ingest(sources: &DataSources, set: SourceSet) -> Result<SourceTables> {
    let span = info_span!("ingest", data_dir = %sources.data_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let tables = sources.load(set).context("load source tables")?;
    info!(
        provinces = tables.grp.height(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(tables)
}

/// Load the urbanization lookup, from `path` when given.
pub fn load_urbanization(path: Option<&Path>) -> Result<UrbanizationTable> {
    match path {
        Some(path) => {
            let table = load_urbanization_csv(path)
                .with_context(|| format!("load urbanization rates from {}", path.display()))?;
            info!(path = %path.display(), provinces = table.len(), "urbanization rates loaded");
            Ok(table)
        }
        None => Ok(UrbanizationTable::default()),
    }
}

// ============================================================================
// Stage 2: Reshape
// ============================================================================

/// Long-format panels, one per loaded source.
#[derive(Debug, Clone)]
pub struct LongPanels {
    pub grp: DataFrame,
    pub stringency: Option<DataFrame>,
    pub cases: Option<DataFrame>,
}

pub fn reshape(tables: &SourceTables) -> Result<LongPanels> {
    let span = info_span!("reshape");
    let _guard = span.enter();
    let start = Instant::now();

    let grp = reshape_to_panel(&tables.grp, GRP_REAL).context("reshape grp")?;
    let stringency = tables
        .stringency
        .as_ref()
        .map(|df| reshape_to_panel(df, STRINGENCY))
        .transpose()
        .context("reshape stringency")?;
    let cases = tables
        .cases
        .as_ref()
        .map(|df| reshape_to_panel(df, CASES_PER_MILLION))
        .transpose()
        .context("reshape cases")?;

    info!(
        grp_rows = grp.height(),
        stringency_rows = stringency.as_ref().map(DataFrame::height),
        cases_rows = cases.as_ref().map(DataFrame::height),
        duration_ms = start.elapsed().as_millis(),
        "reshape complete"
    );
    Ok(LongPanels {
        grp,
        stringency,
        cases,
    })
}

// ============================================================================
// Stage 3: Merge
// ============================================================================

/// Joins the loaded panels, then the urbanization rates when given.
pub fn merge(long: &LongPanels, urbanization: Option<&UrbanizationTable>) -> Result<DataFrame> {
    let span = info_span!("merge");
    let _guard = span.enter();
    let start = Instant::now();

    let mut merged = long.grp.clone();
    for (name, panel) in [("stringency", &long.stringency), ("cases", &long.cases)] {
        if let Some(panel) = panel {
            let before = merged.height();
            merged = merge_panels(&merged, panel).with_context(|| format!("merge {name}"))?;
            debug!(source = name, before, after = merged.height(), "merged source");
        }
    }
    if let Some(table) = urbanization {
        merged = attach_urbanization(&merged, table).context("merge urbanization")?;
    }

    info!(
        rows = merged.height(),
        urbanization = urbanization.is_some(),
        duration_ms = start.elapsed().as_millis(),
        "merge complete"
    );
    Ok(merged)
}

// ============================================================================
// Stage 4: Features
// ============================================================================

pub fn features(merged: DataFrame, options: FeatureOptions) -> Result<PreparedPanel> {
    let span = info_span!("features");
    let _guard = span.enter();
    build_features(merged, options).context("build regression features")
}

// ============================================================================
// Stage 5: Estimate
// ============================================================================

pub fn estimate(
    prepared: &PreparedPanel,
    spec: ModelSpec,
    options: FitOptions,
) -> Result<RegressionResult> {
    let span = info_span!("estimate", model = %spec);
    let _guard = span.enter();
    let start = Instant::now();

    let result =
        fit_twfe(&prepared.frame, spec, options).with_context(|| format!("fit {spec} model"))?;
    info!(
        coefficients = result.coefficients.len(),
        duration_ms = start.elapsed().as_millis(),
        "estimate complete"
    );
    Ok(result)
}

// ============================================================================
// Runs
// ============================================================================

/// Settings of one regression run.
#[derive(Debug, Clone, Default)]
pub struct ModelRun {
    pub fit: FitOptions,
    pub fail_on_duplicates: bool,
    /// Rates for the interaction models; the built-in table when `None`.
    pub urbanization: Option<UrbanizationTable>,
}

/// Everything a regression report needs.
#[derive(Debug, Clone)]
pub struct ModelOutcome {
    pub prepared: PreparedPanel,
    pub result: RegressionResult,
    pub urbanization: UrbanizationTable,
}

/// Ingest through estimate for one model.
pub fn run_model(sources: &DataSources, spec: ModelSpec, run: ModelRun) -> Result<ModelOutcome> {
    let span = info_span!("model", model = %spec);
    let _guard = span.enter();

    let tables = ingest(sources, SourceSet::All)?;
    let long = reshape(&tables)?;
    let urbanization = run.urbanization.unwrap_or_default();
    let merged = merge(&long, spec.needs_urbanization().then_some(&urbanization))?;
    let options = FeatureOptions::for_model(spec).with_fail_on_duplicates(run.fail_on_duplicates);
    let prepared = features(merged, options)?;
    let result = estimate(&prepared, spec, run.fit)?;

    Ok(ModelOutcome {
        prepared,
        result,
        urbanization,
    })
}

/// Where the cost coefficient comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BetaChoice {
    Fixed(f64),
    /// Baseline fit on the full panel in the same run.
    Estimate {
        fit: FitOptions,
        fail_on_duplicates: bool,
    },
}

impl Default for BetaChoice {
    fn default() -> Self {
        BetaChoice::Fixed(DEFAULT_STRINGENCY_BETA)
    }
}

/// Counterfactual cost summary and, when estimated, the fit behind it.
#[derive(Debug, Clone)]
pub struct CostOutcome {
    pub summary: CostSummary,
    pub baseline: Option<RegressionResult>,
}

/// Counterfactual cost over the merged GRP and stringency panel.
pub fn run_cost(sources: &DataSources, beta: BetaChoice) -> Result<CostOutcome> {
    let span = info_span!("cost");
    let _guard = span.enter();

    let set = match beta {
        BetaChoice::Fixed(_) => SourceSet::GrpStringency,
        BetaChoice::Estimate { .. } => SourceSet::All,
    };
    let tables = ingest(sources, set)?;
    let long = reshape(&tables)?;

    let (beta, source, baseline) = match beta {
        BetaChoice::Fixed(beta) => (beta, BetaSource::Fixed, None),
        BetaChoice::Estimate {
            fit,
            fail_on_duplicates,
        } => {
            let merged = merge(&long, None)?;
            let options = FeatureOptions::for_model(ModelSpec::Baseline)
                .with_fail_on_duplicates(fail_on_duplicates);
            let prepared = features(merged, options)?;
            let result = estimate(&prepared, ModelSpec::Baseline, fit)?;
            let beta = result
                .param(STRINGENCY)
                .ok_or_else(|| anyhow!("baseline fit has no {STRINGENCY} coefficient"))?;
            (beta, BetaSource::Estimated, Some(result))
        }
    };

    let cost_panels = LongPanels {
        cases: None,
        ..long
    };
    let mut panel = merge(&cost_panels, None)?;
    let summary = apply_counterfactual(&mut panel, beta, source).context("compute policy cost")?;
    Ok(CostOutcome { summary, baseline })
}

/// Real GRP series of `provinces` in quarter order.
pub fn run_trends(sources: &DataSources, provinces: &[String]) -> Result<Vec<ProvinceSeries>> {
    let span = info_span!("trends");
    let _guard = span.enter();

    let tables = ingest(sources, SourceSet::Grp)?;
    let long = reshape(&tables)?;
    let series = province_series(&long.grp, GRP_REAL, provinces).context("select provinces")?;
    for province in provinces {
        if !series.iter().any(|s| &s.province == province) {
            debug!(province = %province, "province has no GRP data");
        }
    }
    Ok(series)
}

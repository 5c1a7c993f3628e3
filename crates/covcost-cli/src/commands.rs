use anyhow::{Context, Result};
use tracing::{info, warn};

use covcost_estimate::FitOptions;
use covcost_model::ModelSpec;
use covcost_panel::DEFAULT_TREND_PROVINCES;
use covcost_report::{
    Styling, plot_trends, render_cost, render_duplicates, render_regression, render_time_index,
    to_json,
};

use covcost_cli::pipeline::{BetaChoice, ModelRun, load_urbanization, run_cost, run_model, run_trends};

use crate::cli::{CostArgs, ModelArgs, PlotArgs};

pub fn run_regression(spec: ModelSpec, args: &ModelArgs, styling: Styling) -> Result<()> {
    let urbanization = load_urbanization(args.urbanization.as_deref())?;
    let run = ModelRun {
        fit: FitOptions {
            debiased: args.debiased,
        },
        fail_on_duplicates: args.fail_on_duplicates,
        urbanization: Some(urbanization),
    };
    let outcome = run_model(&args.data.sources(), spec, run)?;

    if args.json {
        println!("{}", to_json(&outcome.result).context("serialize regression result")?);
        return Ok(());
    }

    print!("{}", render_duplicates(&outcome.prepared.duplicates, styling));
    if spec == ModelSpec::Baseline {
        print!("{}", render_time_index(&outcome.prepared.quarters, styling));
    }
    print!(
        "{}",
        render_regression(&outcome.result, &outcome.urbanization, styling)
    );
    Ok(())
}

pub fn run_cost_estimate(args: &CostArgs) -> Result<()> {
    let beta = if args.estimate {
        BetaChoice::Estimate {
            fit: FitOptions {
                debiased: args.debiased,
            },
            fail_on_duplicates: args.fail_on_duplicates,
        }
    } else {
        args.beta.map_or_else(BetaChoice::default, BetaChoice::Fixed)
    };
    let outcome = run_cost(&args.data.sources(), beta)?;
    if let Some(baseline) = &outcome.baseline {
        info!(
            beta = outcome.summary.beta,
            n_obs = baseline.n_obs,
            "cost uses the estimated baseline coefficient"
        );
    }

    if args.json {
        println!("{}", to_json(&outcome.summary).context("serialize cost summary")?);
    } else {
        print!("{}", render_cost(&outcome.summary));
    }
    Ok(())
}

pub fn run_plot(args: &PlotArgs) -> Result<()> {
    let provinces: Vec<String> = if args.provinces.is_empty() {
        DEFAULT_TREND_PROVINCES.iter().map(ToString::to_string).collect()
    } else {
        args.provinces.clone()
    };
    let series = run_trends(&args.data.sources(), &provinces)?;
    if series.len() < provinces.len() {
        warn!(
            requested = provinces.len(),
            found = series.len(),
            "some provinces have no GRP data"
        );
    }
    plot_trends(&series, &args.output)
        .with_context(|| format!("write chart {}", args.output.display()))?;
    println!("Chart written to {}", args.output.display());
    Ok(())
}

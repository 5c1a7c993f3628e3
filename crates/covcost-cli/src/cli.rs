//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use covcost_ingest::{DEFAULT_CASES_FILE, DEFAULT_GRP_FILE, DEFAULT_STRINGENCY_FILE, DataSources};

#[derive(Parser)]
#[command(
    name = "covcost",
    version,
    about = "Economic cost of COVID-19 stringency across Chinese provinces",
    long_about = "Estimate the output cost of COVID-19 stringency measures from a \
                  quarterly provincial panel.\n\n\
                  Fits two-way fixed-effects regressions of log real GRP on the \
                  OxCGRT stringency index and case rates, and turns the stringency \
                  coefficient into a counterfactual loss in 2019 RMB."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Baseline TWFE: stringency and case rates.
    Twfe(ModelArgs),

    /// TWFE with one-quarter lags of stringency and case rates.
    Lagged(ModelArgs),

    /// TWFE with the stringency x urbanization interaction.
    Interaction(ModelArgs),

    /// TWFE with lags and urbanization interactions together.
    Combined(ModelArgs),

    /// Counterfactual GRP loss attributable to stringency.
    Cost(CostArgs),

    /// Chart quarterly real GRP for selected provinces.
    Plot(PlotArgs),
}

/// Locations of the source tables.
#[derive(Args, Clone)]
pub struct DataArgs {
    /// Directory holding the source CSV files.
    #[arg(long = "data-dir", value_name = "DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Real GRP table, relative to the data directory.
    #[arg(long = "grp-file", value_name = "FILE", default_value = DEFAULT_GRP_FILE)]
    pub grp_file: PathBuf,

    /// Stringency index table, relative to the data directory.
    #[arg(long = "stringency-file", value_name = "FILE", default_value = DEFAULT_STRINGENCY_FILE)]
    pub stringency_file: PathBuf,

    /// Case rate table, relative to the data directory.
    #[arg(long = "cases-file", value_name = "FILE", default_value = DEFAULT_CASES_FILE)]
    pub cases_file: PathBuf,
}

impl DataArgs {
    pub fn sources(&self) -> DataSources {
        DataSources::new(&self.data_dir)
            .with_grp_file(&self.grp_file)
            .with_stringency_file(&self.stringency_file)
            .with_cases_file(&self.cases_file)
    }
}

#[derive(Args)]
pub struct ModelArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Apply the small-sample cluster correction and Student-t inference.
    #[arg(long = "debiased")]
    pub debiased: bool,

    /// Stop when a province-quarter appears more than once.
    #[arg(long = "fail-on-duplicates")]
    pub fail_on_duplicates: bool,

    /// CSV with `ProvEN,Urbanization_Rate` replacing the built-in rates.
    #[arg(long = "urbanization", value_name = "PATH")]
    pub urbanization: Option<PathBuf>,

    /// Print the regression result as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct CostArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Stringency coefficient to use instead of the default.
    #[arg(long = "beta", value_name = "F64", allow_negative_numbers = true, conflicts_with = "estimate")]
    pub beta: Option<f64>,

    /// Take the coefficient from a baseline TWFE fit in the same run.
    #[arg(long = "estimate")]
    pub estimate: bool,

    /// Use debiased clustered errors for the estimating fit.
    #[arg(long = "debiased", requires = "estimate")]
    pub debiased: bool,

    /// Stop when a province-quarter appears more than once.
    #[arg(long = "fail-on-duplicates", requires = "estimate")]
    pub fail_on_duplicates: bool,

    /// Print the cost summary as JSON instead of text.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct PlotArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Province to chart (repeatable; default Beijing, Guangdong, Hubei, Xinjiang).
    #[arg(long = "province", value_name = "NAME")]
    pub provinces: Vec<String>,

    /// SVG file to write.
    #[arg(long = "output", value_name = "PATH", default_value = "grp_trends.svg")]
    pub output: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cost_accepts_negative_beta() {
        let cli = Cli::try_parse_from(["covcost", "cost", "--beta", "-0.001"]).unwrap();
        let Command::Cost(args) = cli.command else {
            panic!("expected cost command");
        };
        assert_eq!(args.beta, Some(-0.001));
        assert!(!args.estimate);
    }

    #[test]
    fn beta_and_estimate_conflict() {
        assert!(Cli::try_parse_from(["covcost", "cost", "--beta", "-0.001", "--estimate"]).is_err());
    }

    #[test]
    fn provinces_repeat() {
        let cli = Cli::try_parse_from([
            "covcost", "plot", "--province", "Hubei", "--province", "Tibet",
        ])
        .unwrap();
        let Command::Plot(args) = cli.command else {
            panic!("expected plot command");
        };
        assert_eq!(args.provinces, vec!["Hubei", "Tibet"]);
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "covcost", "twfe", "--data-dir", "data", "--log-format", "json", "--json",
        ])
        .unwrap();
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        let Command::Twfe(args) = cli.command else {
            panic!("expected twfe command");
        };
        assert!(args.json);
        assert_eq!(args.data.data_dir, PathBuf::from("data"));
    }
}

//! Provincial stringency cost CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use covcost_cli::logging::{LogConfig, LogFormat, init_logging};
use covcost_model::ModelSpec;
use covcost_report::Styling;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_cost_estimate, run_plot, run_regression};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let styling = match cli.color.color {
        ColorChoice::Always => Styling::Always,
        ColorChoice::Never => Styling::Never,
        ColorChoice::Auto => Styling::Auto,
    };
    let outcome = match &cli.command {
        Command::Twfe(args) => run_regression(ModelSpec::Baseline, args, styling),
        Command::Lagged(args) => run_regression(ModelSpec::Lagged, args, styling),
        Command::Interaction(args) => run_regression(ModelSpec::Interaction, args, styling),
        Command::Combined(args) => run_regression(ModelSpec::Combined, args, styling),
        Command::Cost(args) => run_cost_estimate(args),
        Command::Plot(args) => run_plot(args),
    };
    let exit_code = match outcome {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}

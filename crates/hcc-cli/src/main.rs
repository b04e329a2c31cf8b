//! CMS-HCC RAF calculator CLI.

use clap::{ColorChoice, Parser};
use hcc_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    load_engine, run_batch, run_categories, run_clean, run_combine, run_describe, run_diff,
    run_doctor, run_gap, run_increment, run_info, run_raf, run_score,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let engine = || load_engine(cli);
    let succeeded = match &cli.command {
        Command::Score(args) => {
            run_score(&engine()?, args)?;
            true
        }
        Command::Categories(args) => {
            run_categories(&engine()?, args)?;
            true
        }
        Command::Raf(args) => {
            run_raf(&engine()?, args)?;
            true
        }
        Command::Combine(args) => {
            run_combine(&engine()?, args)?;
            true
        }
        Command::Diff(args) => {
            run_diff(&engine()?, args)?;
            true
        }
        Command::Gap(args) => {
            run_gap(&engine()?, args)?;
            true
        }
        Command::Increment(args) => {
            run_increment(&engine()?, args)?;
            true
        }
        Command::Describe(args) => {
            run_describe(&engine()?, args)?;
            true
        }
        Command::Info(args) => run_info(&engine()?, args)?,
        Command::Clean(args) => {
            run_clean(&engine()?, args)?;
            true
        }
        Command::Batch(args) => run_batch(&engine()?, args)?.failed_count() == 0,
        Command::Doctor(args) => !run_doctor(cli, args)?.has_violations(),
    };
    Ok(if succeeded { 0 } else { 1 })
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    let mut config = LogConfig::default()
        .with_level_filter(level_filter)
        .with_format(format)
        .with_ansi(with_ansi)
        .with_log_file(cli.log_file.clone());
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config
}

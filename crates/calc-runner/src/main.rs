use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

mod commands;
mod config;
mod suites;
mod testing;

use config::Config;
use testing::OutputFormat;

/// Runs a calculator application test suite and reports the outcome.
///
/// With no arguments the default suite, MathApplicationTesterWithInjectMocks,
/// is run. Each failure is printed on its own line, followed by `true` when
/// every test passed or `false` otherwise.
///
/// EXAMPLES:
///     calc-runner                                    Run the default suite
///     calc-runner --suite MathApplicationTesterWithMock
///     calc-runner --format verbose                   Show every test
///     calc-runner --list                             List available suites
///
/// ENVIRONMENT VARIABLES:
///     CALC_RUNNER_SUITE      Suite to run
///     CALC_RUNNER_FORMAT     plain, verbose or json
///     CALC_RUNNER_PARALLEL   Set to '1' to run tests in parallel
///     NO_COLOR               Set to disable colored output
///     RUST_LOG               Log filter for diagnostics on stderr (default: warn)
#[derive(Parser)]
#[command(name = "calc-runner")]
#[command(version)]
struct Cli {
    /// Name of the suite to run
    #[arg(long, short = 's')]
    suite: Option<String>,

    /// List registered suites and exit
    #[arg(long)]
    list: bool,

    /// Output format
    #[arg(long, short = 'f', value_enum)]
    format: Option<OutputFormat>,

    /// Run tests in parallel (failures are still reported in declaration order)
    #[arg(long)]
    parallel: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Path to a configuration file (default: ./calc-runner.toml if present)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Diagnostics go to stderr so stdout carries only the report
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let registry = suites::builtin_registry()?;

    // --list does not read configuration
    if cli.list {
        return commands::list::run(&registry);
    }

    let working_dir = std::env::current_dir().context("failed to read working directory")?;
    let mut config = Config::load(cli.config.as_deref(), &working_dir)
        .context("failed to load configuration")?;

    if let Some(suite) = cli.suite {
        config.suite = suite;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    config.parallel |= cli.parallel;
    config.no_color |= cli.no_color;

    tracing::debug!(?config, "effective configuration");

    commands::run::run(&config, &registry)?;
    Ok(())
}

//! Vitrina CLI: run the catalog filter-validation scenario.
//!
//! ## Usage
//!
//! ```bash
//! vitrina run                        # Run with tests.toml / defaults
//! vitrina run --config laptops.toml  # Run with an explicit profile
//! vitrina run --headed               # Watch the browser work
//! vitrina config                     # Print the active configuration
//! ```

use clap::{Args, Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use thiserror::Error;
use vitrina::browser::{BrowserOptions, CdpDriver};
use vitrina::reporter::{MemoryRecorder, ScenarioReport, ScenarioStatus, StepRecorder};
use vitrina::{FilterScenario, ScenarioConfig, VitrinaError};

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Vitrina(#[from] VitrinaError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Report(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Parser)]
#[command(name = "vitrina", version, about = "Catalog filter-validation runner")]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the filter-validation scenario against a real browser
    Run(RunArgs),
    /// Print the active configuration
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Profile file (default: $VITRINA_PROFILE, then tests.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run the browser with a visible window
    #[arg(long)]
    headed: bool,

    /// Disable the browser sandbox (containers/CI)
    #[arg(long)]
    no_sandbox: bool,

    /// Write a JSON report of the run
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Write a PNG screenshot when the scenario fails
    #[arg(long, value_name = "FILE")]
    failure_screenshot: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ConfigArgs {
    /// Profile file (default: $VITRINA_PROFILE, then tests.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "vitrina=info",
        1 => "vitrina=debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> CliResult<ScenarioConfig> {
    match path {
        Some(path) => Ok(ScenarioConfig::load(path)?),
        None => Ok(ScenarioConfig::load_active()?),
    }
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Run(args) => run_scenario(&args),
        Commands::Config(args) => show_config(&args),
    }
}

fn show_config(args: &ConfigArgs) -> CliResult<()> {
    let config = load_config(args.config.as_ref())?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Recorder printing steps as they happen while keeping them for the report
#[derive(Debug, Default)]
struct ConsoleRecorder {
    memory: MemoryRecorder,
}

impl StepRecorder for ConsoleRecorder {
    fn step(&self, message: &str) {
        println!("  {} {message}", style("›").cyan());
        self.memory.step(message);
    }
}

fn run_scenario(args: &RunArgs) -> CliResult<()> {
    let config = load_config(args.config.as_ref())?;
    println!(
        "{} {} / {} ({})",
        style("validating").bold(),
        config.category,
        config.subcategory,
        config.base_url
    );

    let options = BrowserOptions::default()
        .with_headless(!args.headed)
        .with_viewport(1280, 900);
    let options = if args.no_sandbox {
        options.with_no_sandbox()
    } else {
        options
    };

    let driver = CdpDriver::launch(&options, config.explicit_wait(), config.implicit_wait())?;
    let recorder = ConsoleRecorder::default();
    let scenario = FilterScenario::new(config);

    let started = Instant::now();
    let outcome = scenario.run(&driver, &recorder);
    let duration = started.elapsed();

    let (status, error) = match &outcome {
        Ok(()) => (ScenarioStatus::Passed, None),
        Err(VitrinaError::AssertionFailed { message }) => {
            (ScenarioStatus::Failed, Some(message.clone()))
        }
        Err(e) => (ScenarioStatus::Aborted, Some(e.to_string())),
    };

    if outcome.is_err() {
        capture_failure_screenshot(&driver, args.failure_screenshot.as_ref());
    }

    if let Some(path) = &args.report {
        let report = ScenarioReport::new(status, error, duration, recorder.memory.entries());
        std::fs::write(path, report.to_json()?)?;
        println!("report written to {}", path.display());
    }

    driver.shutdown();

    match outcome {
        Ok(()) => {
            println!(
                "{} in {:.1}s",
                style("scenario passed").green().bold(),
                duration.as_secs_f64()
            );
            Ok(())
        }
        Err(e) => {
            println!("{}", style("scenario failed").red().bold());
            Err(e.into())
        }
    }
}

fn capture_failure_screenshot(driver: &CdpDriver, path: Option<&PathBuf>) {
    let Some(path) = path else { return };
    match driver.screenshot() {
        Ok(bytes) => {
            if let Err(e) = std::fs::write(path, bytes) {
                tracing::warn!(error = %e, "could not write failure screenshot");
            } else {
                println!("failure screenshot written to {}", path.display());
            }
        }
        Err(e) => tracing::warn!(error = %e, "could not capture failure screenshot"),
    }
}

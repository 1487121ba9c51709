//! Carousel CLI
//!
//! Runs headless carousel scenarios against TOML fixtures and prints or
//! writes the JSON report. Also writes a starter fixture.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use carousel_headless::{run_scenario, CarouselFixture, HeadlessRunConfig, HeadlessScenario};
use clap::{Parser, Subcommand};

/// Headless runner for the infinite carousel engine
#[derive(Parser, Debug)]
#[command(name = "carousel")]
#[command(about = "Headless runner for the infinite carousel engine")]
#[command(version)]
struct Args {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scenario against a fixture
    Run {
        /// Fixture TOML file
        #[arg(short, long)]
        fixture: PathBuf,

        /// Scenario JSON file
        #[arg(short, long)]
        scenario: PathBuf,

        /// Write the report to this relative path instead of stdout
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Virtual frame length in milliseconds
        #[arg(long, default_value = "16")]
        tick_ms: u64,
    },
    /// Write a starter fixture
    Init {
        /// Destination file
        #[arg(default_value = "carousel.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(fixture_path: &Path, scenario_path: &Path, report_path: Option<&Path>, tick_ms: u64) -> Result<bool> {
    let fixture = CarouselFixture::load(fixture_path)?;
    let scenario = HeadlessScenario::from_path(scenario_path)?;
    tracing::info!(
        fixture = %fixture_path.display(),
        scenario = %scenario_path.display(),
        steps = scenario.steps.len(),
        "running scenario"
    );

    let outcome = run_scenario(&fixture, &scenario, HeadlessRunConfig { tick_ms });
    let report = outcome.report();
    match report_path {
        Some(path) => {
            report.write_to_path(path)?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => report.write_to_writer(&mut std::io::stdout().lock())?,
    }

    if outcome.is_failed() {
        tracing::error!(
            step = ?report.failed_step_index,
            assertion = report.assertion.as_deref().unwrap_or_default(),
            "{}",
            report.message.as_deref().unwrap_or("scenario failed")
        );
    } else {
        tracing::info!(frames = report.elapsed_frames, ms = report.elapsed_ms, "scenario passed");
    }
    Ok(!outcome.is_failed())
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let content = CarouselFixture::default().to_toml()?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "fixture written");
    Ok(())
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Run {
            fixture,
            scenario,
            report,
            tick_ms,
        } => {
            if tick_ms == 0 {
                bail!("--tick-ms must be positive");
            }
            let passed = run(&fixture, &scenario, report.as_deref(), tick_ms)?;
            Ok(if passed { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Init { path, force } => {
            init(&path, force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_run_command() {
        let args = Args::try_parse_from([
            "carousel",
            "run",
            "--fixture",
            "carousel.toml",
            "--scenario",
            "fling.json",
            "-v",
        ])
        .unwrap();
        assert!(args.verbose);
        match args.command {
            Command::Run {
                fixture,
                report,
                tick_ms,
                ..
            } => {
                assert_eq!(fixture, PathBuf::from("carousel.toml"));
                assert_eq!(report, None);
                assert_eq!(tick_ms, 16);
            }
            Command::Init { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn test_init_defaults_path() {
        let args = Args::try_parse_from(["carousel", "init"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Init { path, force: false } if path == Path::new("carousel.toml")
        ));
    }
}

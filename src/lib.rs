//! colonyfuse - drone and acoustic detection fusion for heronry surveys.
//!
//! Correlates drone detections with acoustic recorder detections in space
//! and time, groups recorders into stations, and apportions drone color
//! classes (`white_birds`) to the species the recorders heard.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod correlate;
pub mod counts;
pub mod detection;
pub mod error;
pub mod fusion;
pub mod geo;
pub mod output;
pub mod station;

use clap::Parser;
use cli::Cli;
use cli::commands::{Context, handle_command};
use config::{config_file_path, load_config_file};
use output::render_json_error;
use tracing::debug;

pub use correlate::{Correlation, CorrelationWindow, correlate};
pub use error::{Error, Result};
pub use fusion::{FusionReport, build_fusion_report};
pub use station::{Station, group_into_stations};

/// Main entry point for the colonyfuse CLI.
///
/// With `--output json`, a failure is also reported as an error envelope on
/// stdout before being returned.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet);

    let output = cli.global.output;
    let result = execute(cli);
    if let Err(e) = &result
        && output.is_structured()
        && let Ok(json) = render_json_error(e)
    {
        println!("{json}");
    }
    result
}

fn execute(cli: Cli) -> Result<()> {
    let config_path = match cli.global.config {
        Some(path) => path,
        None => config_file_path()?,
    };
    debug!("Using configuration file {}", config_path.display());
    let config = load_config_file(&config_path)?;

    let ctx = Context {
        config_path,
        config,
        output: cli.global.output,
    };
    handle_command(cli.command, &ctx)
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    // stdout carries results; keep logs off it
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

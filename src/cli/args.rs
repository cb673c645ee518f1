//! CLI argument definitions.

use crate::config::OutputMode;
use crate::detection::Modality;
use crate::fusion::Color;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::validators::{parse_color, parse_positive_float};

/// Correlate drone and acoustic detections from a heronry survey.
#[derive(Debug, Parser)]
#[command(name = "colonyfuse")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Configuration file (default: platform config directory).
    #[arg(long, global = true, env = "COLONYFUSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output mode.
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputMode::Human,
        env = "COLONYFUSE_OUTPUT"
    )]
    pub output: OutputMode,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Detection snapshot files.
#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Drone detections (`.json` or `.csv`).
    #[arg(long)]
    pub visual: PathBuf,

    /// Recorder detections (`.json` or `.csv`).
    #[arg(long)]
    pub acoustic: PathBuf,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List detections of the other modality close in space and time.
    Correlate {
        /// Snapshot files.
        #[command(flatten)]
        snapshot: SnapshotArgs,

        /// Id of the anchor detection.
        #[arg(long)]
        anchor: String,

        /// Look the anchor up in one snapshot only (default: visual first).
        #[arg(long, value_enum)]
        anchor_modality: Option<Modality>,

        /// Maximum distance in meters (overrides config).
        #[arg(long, value_parser = parse_positive_float)]
        max_distance: Option<f64>,

        /// Maximum time difference in minutes (overrides config).
        #[arg(long, value_parser = parse_positive_float)]
        max_minutes: Option<f64>,
    },
    /// Group recorder detections into stations.
    Stations {
        /// Recorder detections (`.json` or `.csv`).
        #[arg(long)]
        acoustic: PathBuf,

        /// Keep only stations inside this drone snapshot's footprint.
        #[arg(long)]
        visual: Option<PathBuf>,
    },
    /// Attribute drone color classes to recorded species.
    Report {
        /// Snapshot files.
        #[command(flatten)]
        snapshot: SnapshotArgs,

        /// Restrict drone counts to one survey.
        #[arg(long)]
        visual_survey: Option<String>,

        /// Restrict recorder counts to one survey.
        #[arg(long, conflicts_with = "aru")]
        acoustic_survey: Option<String>,

        /// Restrict recorder counts to one station.
        #[arg(long)]
        aru: Option<u32>,
    },
    /// Manage the color to species mapping.
    Colors {
        /// Mapping action to perform.
        #[command(subcommand)]
        action: ColorsAction,
    },
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Colors subcommand actions.
#[derive(Debug, Subcommand)]
pub enum ColorsAction {
    /// Display the configured mapping.
    Show,
    /// Write the colony default mapping.
    Init {
        /// Replace an existing mapping.
        #[arg(long)]
        force: bool,
    },
    /// Set the candidate species for one color.
    Set {
        /// Color class (white, black, brown, grey).
        #[arg(value_parser = parse_color)]
        color: Color,
        /// Species names, in priority order.
        #[arg(required = true)]
        species: Vec<String>,
    },
    /// Remove one color from the mapping.
    Clear {
        /// Color class (white, black, brown, grey).
        #[arg(value_parser = parse_color)]
        color: Color,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

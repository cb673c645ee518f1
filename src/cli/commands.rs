//! Subcommand handlers.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use super::{ColorsAction, Command, ConfigAction, SnapshotArgs};
use crate::config::{
    Config, OutputMode, load_color_mapping, load_config_file, save_color_mapping, save_config,
    validate_window,
};
use crate::correlate::{CorrelationWindow, correlate_in_snapshot};
use crate::counts::{at_station, count_labels, in_survey};
use crate::detection::{Modality, Snapshot, load_acoustic_detections, load_visual_detections};
use crate::error::{Error, Result};
use crate::fusion::{
    AcousticScope, ColorSpeciesMapping, ReportScope, build_fusion_report, mapping_or_empty,
};
use crate::output::{
    ColorMappingPayload, ConfigPayload, CorrelationPayload, ReportPayload, ResultType,
    StationEntry, StationsPayload, StatusPayload, human, render_json_result,
};
use crate::station::{Station, SurveyBounds, group_into_stations, stations_within_bounds};

/// Resolved state every handler needs.
#[derive(Debug)]
pub struct Context {
    /// Config file in use.
    pub config_path: PathBuf,
    /// Configuration loaded from `config_path`.
    pub config: Config,
    /// How to print results.
    pub output: OutputMode,
}

/// Dispatch a parsed subcommand.
pub fn handle_command(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Correlate {
            snapshot,
            anchor,
            anchor_modality,
            max_distance,
            max_minutes,
        } => {
            let window = resolve_window(&ctx.config, max_distance, max_minutes)?;
            handle_correlate(&snapshot, &anchor, anchor_modality, &window, ctx)
        }
        Command::Stations { acoustic, visual } => {
            handle_stations(&acoustic, visual.as_deref(), ctx)
        }
        Command::Report {
            snapshot,
            visual_survey,
            acoustic_survey,
            aru,
        } => {
            let acoustic = match (acoustic_survey, aru) {
                (Some(survey), _) => AcousticScope::Survey(survey),
                (None, Some(id)) => AcousticScope::Station(id),
                (None, None) => AcousticScope::All,
            };
            let scope = ReportScope {
                visual_survey_id: visual_survey,
                acoustic,
            };
            handle_report(&snapshot, &scope, ctx)
        }
        Command::Colors { action } => handle_colors_command(action, ctx),
        Command::Config { action } => handle_config_command(action, ctx),
    }
}

fn emit<T: Serialize>(mode: OutputMode, payload: &T, text: impl FnOnce() -> String) -> Result<()> {
    if mode.is_structured() {
        println!("{}", render_json_result(payload)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

fn load_snapshot(args: &SnapshotArgs) -> Result<Snapshot> {
    let visual = load_visual_detections(&args.visual)?;
    let acoustic = load_acoustic_detections(&args.acoustic)?;
    info!(
        "Loaded {} visual and {} acoustic detection(s)",
        visual.len(),
        acoustic.len()
    );
    Ok(Snapshot::new(visual, acoustic))
}

/// Config window with per-call overrides applied.
fn resolve_window(
    config: &Config,
    max_distance: Option<f64>,
    max_minutes: Option<f64>,
) -> Result<CorrelationWindow> {
    let window = CorrelationWindow {
        max_distance_m: max_distance.unwrap_or(config.correlation.max_distance_m),
        max_time_delta_min: max_minutes.unwrap_or(config.correlation.max_time_delta_min),
    };
    validate_window(&window)?;
    Ok(window)
}

fn handle_correlate(
    args: &SnapshotArgs,
    anchor_id: &str,
    anchor_modality: Option<Modality>,
    window: &CorrelationWindow,
    ctx: &Context,
) -> Result<()> {
    let snapshot = load_snapshot(args)?;

    let anchor = match anchor_modality {
        Some(modality) => snapshot.find_in(modality, anchor_id),
        None => snapshot.find(anchor_id),
    }
    .ok_or_else(|| Error::DetectionNotFound {
        id: anchor_id.to_string(),
    })?;

    let matches = correlate_in_snapshot(anchor, &snapshot, window)?;
    info!(
        "{} match(es) for {} detection '{anchor_id}'",
        matches.len(),
        anchor.modality()
    );

    let payload = CorrelationPayload {
        result_type: ResultType::Correlation,
        anchor,
        window: *window,
        matches: &matches,
    };
    emit(ctx.output, &payload, || human::format_correlations(anchor, window, &matches))
}

fn handle_stations(acoustic_path: &Path, visual_path: Option<&Path>, ctx: &Context) -> Result<()> {
    let acoustic = load_acoustic_detections(acoustic_path)?;
    let all = group_into_stations(&acoustic);

    let stations: Vec<&Station<'_>> = match visual_path {
        None => all.iter().collect(),
        Some(path) => {
            let visual = load_visual_detections(path)?;
            if let Some(bounds) = SurveyBounds::from_detections(&visual) {
                stations_within_bounds(&all, &bounds)
            } else {
                warn!(
                    "No drone detection in '{}' has a valid position; no footprint to match",
                    path.display()
                );
                Vec::new()
            }
        }
    };
    info!("{} station(s)", stations.len());

    let payload = StationsPayload {
        result_type: ResultType::Stations,
        stations: stations.iter().map(|s| StationEntry::from(*s)).collect(),
    };
    emit(ctx.output, &payload, || human::format_stations(&stations))
}

fn handle_report(args: &SnapshotArgs, scope: &ReportScope, ctx: &Context) -> Result<()> {
    let snapshot = load_snapshot(args)?;

    let visual_counts = match &scope.visual_survey_id {
        Some(survey) => count_labels(in_survey(&snapshot.visual, survey)),
        None => count_labels(&snapshot.visual),
    };
    let acoustic_counts = match &scope.acoustic {
        AcousticScope::All => count_labels(&snapshot.acoustic),
        AcousticScope::Survey(survey) => count_labels(in_survey(&snapshot.acoustic, survey)),
        AcousticScope::Station(id) => count_labels(at_station(&snapshot.acoustic, *id)),
    };

    let mapping = mapping_or_empty(ctx.config.color_mapping())?;
    let report = build_fusion_report(scope, &visual_counts, &acoustic_counts, &mapping);

    let payload = ReportPayload {
        result_type: ResultType::FusionReport,
        report: &report,
    };
    emit(ctx.output, &payload, || human::format_report(&report))
}

fn handle_colors_command(action: ColorsAction, ctx: &Context) -> Result<()> {
    match action {
        ColorsAction::Show => {
            let mapping = match load_color_mapping(&ctx.config_path) {
                Ok(mapping) => Some(mapping),
                Err(Error::MissingConfiguration { reason }) => {
                    warn!("Species color mapping is not configured ({reason})");
                    None
                }
                Err(e) => return Err(e),
            };
            let payload = ColorMappingPayload {
                result_type: ResultType::ColorMapping,
                species_color_mapping: mapping.as_ref(),
            };
            emit(ctx.output, &payload, || {
                mapping.as_ref().map_or_else(
                    || "No color mapping configured. Run 'colonyfuse colors init'.\n".to_string(),
                    human::format_mapping,
                )
            })
        }
        ColorsAction::Init { force } => {
            if ctx.config.colors.is_some() && !force {
                return emit_status(
                    ctx,
                    false,
                    "Color mapping already configured; use --force to replace it.".to_string(),
                );
            }
            let mapping = ColorSpeciesMapping::colony_default();
            save_color_mapping(&mapping, &ctx.config_path)?;
            info!("Wrote colony default mapping to {}", ctx.config_path.display());
            print_saved_mapping(&mapping, ctx)
        }
        ColorsAction::Set { color, species } => {
            let mut mapping = ctx.config.colors.clone().unwrap_or_default();
            mapping.set(color, species)?;
            save_color_mapping(&mapping, &ctx.config_path)?;
            info!("Updated '{color}' in {}", ctx.config_path.display());
            print_saved_mapping(&mapping, ctx)
        }
        ColorsAction::Clear { color } => {
            let mut mapping = ctx.config.colors.clone().unwrap_or_default();
            if !mapping.remove(color) {
                warn!("Color '{color}' is not mapped");
            }
            save_color_mapping(&mapping, &ctx.config_path)?;
            print_saved_mapping(&mapping, ctx)
        }
    }
}

fn print_saved_mapping(mapping: &ColorSpeciesMapping, ctx: &Context) -> Result<()> {
    let payload = ColorMappingPayload {
        result_type: ResultType::ColorMapping,
        species_color_mapping: Some(mapping),
    };
    emit(ctx.output, &payload, || human::format_mapping(mapping))
}

fn emit_status(ctx: &Context, changed: bool, message: String) -> Result<()> {
    let payload = StatusPayload {
        result_type: ResultType::Status,
        changed,
        message,
        path: &ctx.config_path,
    };
    emit(ctx.output, &payload, || {
        format!("{}\n  {}\n", payload.message, ctx.config_path.display())
    })
}

fn handle_config_command(action: ConfigAction, ctx: &Context) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = &ctx.config_path;
            if path.exists() {
                emit_status(ctx, false, "Configuration file already exists.".to_string())
            } else {
                save_config(&Config::default(), path)?;
                emit_status(
                    ctx,
                    true,
                    "Created configuration file. Next step: colonyfuse colors init".to_string(),
                )
            }
        }
        ConfigAction::Show => {
            let config = load_config_file(&ctx.config_path)?;
            let payload = ConfigPayload {
                result_type: ResultType::Config,
                path: &ctx.config_path,
                config: &config,
            };
            if ctx.output.is_structured() {
                println!("{}", render_json_result(&payload)?);
            } else {
                let text = toml::to_string_pretty(&config)
                    .map_err(|e| Error::ConfigSerialize { source: e })?;
                println!("# {}", ctx.config_path.display());
                print!("{text}");
            }
            Ok(())
        }
        ConfigAction::Path => {
            if ctx.output.is_structured() {
                emit_status(ctx, false, "Configuration file path.".to_string())
            } else {
                println!("{}", ctx.config_path.display());
                Ok(())
            }
        }
    }
}

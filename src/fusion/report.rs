//! Fusion report assembly for one visual survey and one acoustic source.

use serde::Serialize;
use tracing::{debug, warn};

use super::{ColorSpeciesMapping, Inference, infer_color_class};
use crate::counts::LabelCounts;
use crate::error::{Error, Result};

/// Where the acoustic counts were taken from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AcousticScope {
    /// Every acoustic detection in the snapshot.
    #[default]
    All,
    /// One acoustic survey.
    Survey(String),
    /// One recording station.
    Station(u32),
}

/// Survey pair a report covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportScope {
    /// Visual survey, or `None` for the full visual snapshot.
    pub visual_survey_id: Option<String>,
    /// Acoustic source.
    pub acoustic: AcousticScope,
}

/// Aggregate color-class attribution for a survey pair.
///
/// Recomputed per request; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FusionReport {
    /// Visual survey the counts came from.
    pub visual_survey_id: Option<String>,
    /// Acoustic survey the counts came from.
    pub acoustic_survey_id: Option<String>,
    /// Station the counts came from.
    pub aru_id: Option<u32>,
    /// Visual class label to count, as supplied.
    pub visual_counts: LabelCounts,
    /// Acoustic species to count, as supplied.
    pub acoustic_counts: LabelCounts,
    /// One entry per mapped color the drone observed, in mapping order.
    pub inferences: Vec<Inference>,
    /// Mapping the inferences were computed with.
    pub species_color_mapping: ColorSpeciesMapping,
}

/// Build the fusion report for a survey pair.
///
/// Colors are visited in the mapping's insertion order; colors with no
/// drone detections are skipped. An empty mapping yields no inferences.
pub fn build_fusion_report(
    scope: &ReportScope,
    visual_counts: &LabelCounts,
    acoustic_counts: &LabelCounts,
    mapping: &ColorSpeciesMapping,
) -> FusionReport {
    let inferences: Vec<Inference> = mapping
        .iter()
        .filter_map(|(color, species)| {
            let drone_count = visual_counts
                .get(&color.drone_class())
                .copied()
                .unwrap_or(0);
            infer_color_class(color, drone_count, species, acoustic_counts)
        })
        .collect();

    debug!(
        "Fusion report: {} visual label(s), {} acoustic species, {} inference(s)",
        visual_counts.len(),
        acoustic_counts.len(),
        inferences.len()
    );

    let (acoustic_survey_id, aru_id) = match &scope.acoustic {
        AcousticScope::All => (None, None),
        AcousticScope::Survey(id) => (Some(id.clone()), None),
        AcousticScope::Station(id) => (None, Some(*id)),
    };

    FusionReport {
        visual_survey_id: scope.visual_survey_id.clone(),
        acoustic_survey_id,
        aru_id,
        visual_counts: visual_counts.clone(),
        acoustic_counts: acoustic_counts.clone(),
        inferences,
        species_color_mapping: mapping.clone(),
    }
}

/// Degrade a missing mapping to an empty one.
///
/// Raw counts stay useful without a mapping, so [`Error::MissingConfiguration`]
/// becomes an empty mapping. Other errors (a malformed config) propagate.
pub fn mapping_or_empty(loaded: Result<ColorSpeciesMapping>) -> Result<ColorSpeciesMapping> {
    match loaded {
        Err(Error::MissingConfiguration { reason }) => {
            warn!("No color inference: species color mapping is not configured ({reason})");
            Ok(ColorSpeciesMapping::new())
        }
        other => other,
    }
}

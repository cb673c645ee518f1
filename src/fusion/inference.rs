//! Color-class species attribution.
//!
//! Apportions drone detections of one color class to acoustically
//! identified species in proportion to audio detection volume. This is a
//! heuristic allocation, not a calibrated model: every acoustic detection of
//! a candidate species counts as a plausible explanation for one drone
//! detection.

use serde::Serialize;

use super::Color;
use crate::constants::fusion::MAX_PERCENT;
use crate::counts::LabelCounts;

/// One species' share of a color class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeciesShare {
    /// Species name.
    pub species: String,
    /// Acoustic detections of this species.
    pub audio_count: u64,
    /// Share of the color's audio detections, rounded percent.
    pub probability: u64,
}

/// Attribution result for one color class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inference {
    /// Color class.
    pub color: Color,
    /// Drone label, e.g. `white_birds`.
    pub drone_class: String,
    /// Drone detections of this class.
    pub drone_count: u64,
    /// Candidate species heard at least once, highest probability first.
    pub species_breakdown: Vec<SpeciesShare>,
    /// Sum of `audio_count` over the breakdown.
    pub audio_total: u64,
    /// Drone detections with a plausible acoustic explanation.
    pub explained_count: u64,
    /// Drone detections left unexplained.
    pub unidentified: u64,
    /// Fraction of drone detections with a plausible audio explanation,
    /// rounded percent, capped at 100. Not a statistical confidence.
    pub confidence_score: u64,
}

/// `round(part / whole * 100)` with halves rounded up; `0` when `whole == 0`.
///
/// Integer arithmetic, so exact halves are never lost to float error.
pub fn rounded_percent(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    (part * 2 * MAX_PERCENT + whole) / (2 * whole)
}

/// Attribute one color class to its candidate species.
///
/// Returns `None` when `drone_count == 0`: a class the drone never saw
/// contributes nothing. Species probabilities are rounded independently and
/// are not renormalized, so a breakdown may sum to 99 or 101.
pub fn infer_color_class(
    color: Color,
    drone_count: u64,
    candidate_species: &[String],
    acoustic_counts: &LabelCounts,
) -> Option<Inference> {
    if drone_count == 0 {
        return None;
    }

    let heard: Vec<(&String, u64)> = candidate_species
        .iter()
        .filter_map(|species| {
            acoustic_counts
                .get(species)
                .copied()
                .filter(|&count| count > 0)
                .map(|count| (species, count))
        })
        .collect();

    let audio_total: u64 = heard.iter().map(|(_, count)| count).sum();

    let mut species_breakdown: Vec<SpeciesShare> = heard
        .into_iter()
        .map(|(species, audio_count)| SpeciesShare {
            species: species.clone(),
            audio_count,
            probability: rounded_percent(audio_count, audio_total),
        })
        .collect();
    // stable: equal probabilities keep mapping order
    species_breakdown.sort_by(|a, b| b.probability.cmp(&a.probability));

    let explained_count = drone_count.min(audio_total);

    Some(Inference {
        color,
        drone_class: color.drone_class(),
        drone_count,
        species_breakdown,
        audio_total,
        explained_count,
        unidentified: drone_count - explained_count,
        confidence_score: rounded_percent(audio_total, drone_count).min(MAX_PERCENT),
    })
}

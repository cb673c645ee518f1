//! Pairwise cross-modal correlation.
//!
//! Given one anchor detection, scan the opposite modality for detections
//! inside the correlation window (distance and time, both exclusive).

use crate::constants::correlation::{MAX_DISTANCE_METERS, MAX_TIME_DELTA_MINUTES};
use crate::detection::{DetectionRef, Modality, Sensed, Snapshot};
use crate::error::{Error, Result};
use crate::geo::{distance_meters, time_delta_minutes};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Joint spatial and temporal threshold for a plausible match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationWindow {
    /// Matches must be strictly closer than this, in meters.
    pub max_distance_m: f64,
    /// Matches must be strictly closer in time than this, in minutes.
    pub max_time_delta_min: f64,
}

impl Default for CorrelationWindow {
    fn default() -> Self {
        Self {
            max_distance_m: MAX_DISTANCE_METERS,
            max_time_delta_min: MAX_TIME_DELTA_MINUTES,
        }
    }
}

impl CorrelationWindow {
    /// True if a pair at this distance and time delta falls inside the window.
    pub fn contains(&self, distance_m: f64, delta_min: f64) -> bool {
        distance_m < self.max_distance_m && delta_min < self.max_time_delta_min
    }
}

/// One candidate match for an anchor detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlation<'a> {
    /// The matched detection.
    pub detection: DetectionRef<'a>,
    /// Great-circle distance from the anchor.
    pub distance_meters: f64,
    /// Absolute time difference from the anchor.
    pub time_delta_minutes: f64,
    /// Modality of the matched detection.
    pub modality: Modality,
}

/// Correlate an anchor against a collection of the opposite modality.
///
/// Results are sorted by ascending distance, then ascending time delta.
/// Candidates without a usable position or timestamp are skipped.
///
/// # Errors
///
/// Returns [`Error::InvalidDetection`] if the anchor lacks coordinates or a
/// timestamp, and [`Error::ModalityMismatch`] if both sides share a modality.
pub fn correlate<'a, A: Sensed, C: Sensed>(
    anchor: &A,
    candidates: &'a [C],
    window: &CorrelationWindow,
) -> Result<Vec<Correlation<'a>>> {
    if A::MODALITY == C::MODALITY {
        return Err(Error::ModalityMismatch {
            modality: A::MODALITY,
        });
    }

    let origin = anchor.core().fix()?;

    let mut matches: Vec<Correlation<'a>> = Vec::new();
    let mut skipped = 0usize;

    for candidate in candidates {
        let fix = match candidate.core().fix() {
            Ok(fix) => fix,
            Err(e) => {
                warn!("Skipping candidate: {e}");
                skipped += 1;
                continue;
            }
        };

        let distance = distance_meters(origin.lat, origin.lon, fix.lat, fix.lon);
        let delta = time_delta_minutes(origin.timestamp, fix.timestamp);

        if window.contains(distance, delta) {
            matches.push(Correlation {
                detection: candidate.as_detection(),
                distance_meters: distance,
                time_delta_minutes: delta,
                modality: C::MODALITY,
            });
        }
    }

    matches.sort_by(|a, b| {
        a.distance_meters
            .total_cmp(&b.distance_meters)
            .then(a.time_delta_minutes.total_cmp(&b.time_delta_minutes))
    });

    debug!(
        "Correlated {} '{}': {} match(es) among {} candidate(s), {} skipped",
        A::MODALITY,
        anchor.core().id,
        matches.len(),
        candidates.len(),
        skipped
    );

    Ok(matches)
}

/// Correlate a detection from a snapshot against the snapshot's other modality.
pub fn correlate_in_snapshot<'a>(
    anchor: DetectionRef<'_>,
    snapshot: &'a Snapshot,
    window: &CorrelationWindow,
) -> Result<Vec<Correlation<'a>>> {
    match anchor {
        DetectionRef::Visual(v) => correlate(v, &snapshot.acoustic, window),
        DetectionRef::Acoustic(a) => correlate(a, &snapshot.visual, window),
    }
}

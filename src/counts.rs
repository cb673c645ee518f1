//! Per-label detection counts.
//!
//! The fusion report consumes counts, not detections. This is the
//! `GROUP BY class_name` step, using the reviewed class when present.

use std::collections::BTreeMap;

use crate::detection::{AcousticDetection, Sensed};

/// Label to detection count.
pub type LabelCounts = BTreeMap<String, u64>;

/// Count detections by effective label.
pub fn count_labels<'a, T, I>(detections: I) -> LabelCounts
where
    T: Sensed + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut counts = LabelCounts::new();
    for det in detections {
        *counts
            .entry(det.core().effective_label().to_string())
            .or_insert(0) += 1;
    }
    counts
}

/// Detections belonging to one survey.
pub fn in_survey<'a, T: Sensed>(
    detections: &'a [T],
    survey_id: &'a str,
) -> impl Iterator<Item = &'a T> + 'a {
    detections
        .iter()
        .filter(move |d| d.core().survey_id.as_deref() == Some(survey_id))
}

/// Acoustic detections recorded by one station.
pub fn at_station(
    detections: &[AcousticDetection],
    aru_id: u32,
) -> impl Iterator<Item = &AcousticDetection> {
    detections.iter().filter(move |d| d.aru_id == Some(aru_id))
}

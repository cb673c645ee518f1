//! Plain-text rendering for terminal output.

use std::fmt::Write;

use crate::constants::confidence::DECIMAL_PLACES;
use crate::correlate::{Correlation, CorrelationWindow};
use crate::counts::LabelCounts;
use crate::detection::DetectionRef;
use crate::fusion::{ColorSpeciesMapping, FusionReport, Inference};
use crate::station::Station;

/// Render correlation matches for one anchor.
pub fn format_correlations(
    anchor: DetectionRef<'_>,
    window: &CorrelationWindow,
    matches: &[Correlation<'_>],
) -> String {
    let mut out = String::new();
    let core = anchor.core();
    let _ = writeln!(
        out,
        "{} detection '{}' ({}), window < {} m and < {} min",
        anchor.modality(),
        core.id,
        core.effective_label(),
        window.max_distance_m,
        window.max_time_delta_min
    );

    if matches.is_empty() {
        let _ = writeln!(out, "No {} matches.", anchor.modality().opposite());
        return out;
    }

    let _ = writeln!(
        out,
        "{:<12} {:<28} {:>10} {:>10} {:>6}",
        "ID", "LABEL", "DIST (m)", "DT (min)", "CONF"
    );
    for m in matches {
        let c = m.detection.core();
        let _ = writeln!(
            out,
            "{:<12} {:<28} {:>10.1} {:>10.2} {:>6.prec$}",
            c.id,
            c.effective_label(),
            m.distance_meters,
            m.time_delta_minutes,
            c.confidence,
            prec = DECIMAL_PLACES
        );
    }
    let _ = writeln!(out, "{} match(es)", matches.len());
    out
}

/// Render a station list.
pub fn format_stations(stations: &[&Station<'_>]) -> String {
    let mut out = String::new();
    if stations.is_empty() {
        let _ = writeln!(out, "No stations.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<14} {:>11} {:>12} {:>10}",
        "STATION", "LAT", "LON", "DETECTIONS"
    );
    for station in stations {
        let _ = writeln!(
            out,
            "{:<14} {:>11.5} {:>12.5} {:>10}",
            station.label,
            station.lat,
            station.lon,
            station.detections.len()
        );
    }
    out
}

fn format_counts(out: &mut String, title: &str, counts: &LabelCounts) {
    let total: u64 = counts.values().sum();
    let _ = writeln!(out, "{title} ({total} total)");
    if counts.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (label, count) in counts {
        let _ = writeln!(out, "  {label:<32} {count:>6}");
    }
}

fn format_inference(out: &mut String, inference: &Inference) {
    let _ = writeln!(
        out,
        "{}: {} drone detection(s), {} explained, {} unidentified, confidence {}%",
        inference.drone_class,
        inference.drone_count,
        inference.explained_count,
        inference.unidentified,
        inference.confidence_score
    );
    if inference.species_breakdown.is_empty() {
        let _ = writeln!(out, "  no candidate species heard");
    }
    for share in &inference.species_breakdown {
        let _ = writeln!(
            out,
            "  {:<32} {:>6} {:>4}%",
            share.species, share.audio_count, share.probability
        );
    }
}

/// Render a fusion report.
pub fn format_report(report: &FusionReport) -> String {
    let mut out = String::new();

    let visual_scope = report.visual_survey_id.as_deref().unwrap_or("all");
    let acoustic_scope = match (&report.acoustic_survey_id, report.aru_id) {
        (Some(survey), _) => format!("survey {survey}"),
        (None, Some(aru)) => format!("ARU {aru}"),
        (None, None) => "all".to_string(),
    };
    let _ = writeln!(
        out,
        "Fusion report: visual {visual_scope}, acoustic {acoustic_scope}"
    );
    let _ = writeln!(out);

    format_counts(&mut out, "Visual counts", &report.visual_counts);
    let _ = writeln!(out);
    format_counts(&mut out, "Acoustic counts", &report.acoustic_counts);
    let _ = writeln!(out);

    if report.species_color_mapping.is_empty() {
        let _ = writeln!(out, "No color mapping configured; no inferences.");
    } else if report.inferences.is_empty() {
        let _ = writeln!(out, "No mapped color class was observed by the drone.");
    }
    for inference in &report.inferences {
        format_inference(&mut out, inference);
    }
    out
}

/// Render a color mapping, one color per line.
pub fn format_mapping(mapping: &ColorSpeciesMapping) -> String {
    let mut out = String::new();
    if mapping.is_empty() {
        let _ = writeln!(out, "No colors mapped.");
    }
    for (color, species) in mapping.iter() {
        let _ = writeln!(out, "{:<6} {}", color.as_str(), species.join(", "));
    }
    out
}

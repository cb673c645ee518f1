//! JSON envelope types for CLI output.
//!
//! Structured results let the dashboard backend drive colonyfuse as a
//! subprocess and read the same records it would get from the library.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::correlate::{Correlation, CorrelationWindow};
use crate::detection::DetectionRef;
use crate::error::{Error, Result};
use crate::fusion::{ColorSpeciesMapping, FusionReport};
use crate::station::Station;

/// Current spec version for JSON envelope.
pub const SPEC_VERSION: &str = "1.0";

/// JSON envelope wrapping all CLI output events.
#[derive(Debug, Serialize)]
pub struct JsonEnvelope<T> {
    /// API specification version.
    pub spec_version: String,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
    /// Event type.
    pub event: EventType,
    /// Event-specific payload.
    pub payload: T,
}

impl<T: Serialize> JsonEnvelope<T> {
    /// Create a new envelope with the current timestamp.
    pub fn new(event: EventType, payload: T) -> Self {
        Self {
            spec_version: SPEC_VERSION.to_string(),
            timestamp: Utc::now(),
            event,
            payload,
        }
    }
}

/// Event types for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Final result.
    Result,
    /// Error occurred.
    Error,
}

/// Result type discriminator for result payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// Cross-modal matches for one detection.
    Correlation,
    /// Station grouping.
    Stations,
    /// Color-class fusion report.
    FusionReport,
    /// Color to species mapping.
    ColorMapping,
    /// Effective configuration.
    Config,
    /// Outcome of a command that changes nothing worth returning.
    Status,
}

/// Payload for `correlate`.
#[derive(Debug, Serialize)]
pub struct CorrelationPayload<'a> {
    /// Result discriminator.
    pub result_type: ResultType,
    /// The anchor detection.
    pub anchor: DetectionRef<'a>,
    /// Window used for matching.
    pub window: CorrelationWindow,
    /// Matches, closest first.
    pub matches: &'a [Correlation<'a>],
}

/// Summary of one station for `stations`.
#[derive(Debug, Serialize)]
pub struct StationEntry<'a> {
    /// Display label.
    pub label: &'a str,
    /// Recorder id, if keyed by one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aru_id: Option<u32>,
    /// Representative latitude.
    pub lat: f64,
    /// Representative longitude.
    pub lon: f64,
    /// Member detection count.
    pub detection_count: usize,
    /// Member detection ids.
    pub detection_ids: Vec<&'a str>,
}

impl<'a> From<&'a Station<'a>> for StationEntry<'a> {
    fn from(station: &'a Station<'a>) -> Self {
        Self {
            label: &station.label,
            aru_id: station.aru_id(),
            lat: station.lat,
            lon: station.lon,
            detection_count: station.detections.len(),
            detection_ids: station
                .detections
                .iter()
                .map(|d| d.core.id.as_str())
                .collect(),
        }
    }
}

/// Payload for `stations`.
#[derive(Debug, Serialize)]
pub struct StationsPayload<'a> {
    /// Result discriminator.
    pub result_type: ResultType,
    /// Stations in first-seen order.
    pub stations: Vec<StationEntry<'a>>,
}

/// Payload for `report`.
#[derive(Debug, Serialize)]
pub struct ReportPayload<'a> {
    /// Result discriminator.
    pub result_type: ResultType,
    /// The report.
    #[serde(flatten)]
    pub report: &'a FusionReport,
}

/// Payload for `colors`.
#[derive(Debug, Serialize)]
pub struct ColorMappingPayload<'a> {
    /// Result discriminator.
    pub result_type: ResultType,
    /// Current mapping; `null` when not configured.
    pub species_color_mapping: Option<&'a ColorSpeciesMapping>,
}

/// Payload for `config show`.
#[derive(Debug, Serialize)]
pub struct ConfigPayload<'a> {
    /// Result discriminator.
    pub result_type: ResultType,
    /// Path the configuration was read from.
    pub path: &'a std::path::Path,
    /// The loaded configuration.
    pub config: &'a Config,
}

/// Payload for commands that only report an outcome.
#[derive(Debug, Serialize)]
pub struct StatusPayload<'a> {
    /// Result discriminator.
    pub result_type: ResultType,
    /// Whether the command changed the file at `path`.
    pub changed: bool,
    /// What happened.
    pub message: String,
    /// File the command acted on.
    pub path: &'a std::path::Path,
}

/// Error payload for error events.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    /// Error code (`snake_case` identifier).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl From<&Error> for ErrorPayload {
    fn from(e: &Error) -> Self {
        let code = match e {
            Error::InvalidDetection { .. } => "invalid_detection",
            Error::DetectionNotFound { .. } => "detection_not_found",
            Error::MissingConfiguration { .. } => "missing_configuration",
            Error::ConfigParse { .. } | Error::ConfigValidation { .. } => "invalid_configuration",
            Error::DetectionParseFailed { .. }
            | Error::InvalidDetectionFormat { .. }
            | Error::UnsupportedDetectionFile { .. } => "invalid_input",
            _ => "internal",
        };
        Self {
            code: code.to_string(),
            message: e.to_string(),
        }
    }
}

/// Serialize a payload inside a result envelope.
pub fn render_json_result<T: Serialize>(payload: &T) -> Result<String> {
    let envelope = JsonEnvelope::new(EventType::Result, payload);
    serde_json::to_string(&envelope).map_err(|e| Error::JsonSerialize { source: e })
}

/// Serialize an error inside an error envelope.
pub fn render_json_error(error: &Error) -> Result<String> {
    let envelope = JsonEnvelope::new(EventType::Error, ErrorPayload::from(error));
    serde_json::to_string(&envelope).map_err(|e| Error::JsonSerialize { source: e })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::counts::LabelCounts;
    use crate::fusion::{ReportScope, build_fusion_report};

    #[test]
    fn test_result_envelope_shape() {
        let mapping = ColorSpeciesMapping::colony_default();
        let payload = ColorMappingPayload {
            result_type: ResultType::ColorMapping,
            species_color_mapping: Some(&mapping),
        };
        let json = render_json_result(&payload).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["spec_version"], SPEC_VERSION);
        assert_eq!(value["event"], "result");
        assert_eq!(value["payload"]["result_type"], "color_mapping");
        assert_eq!(
            value["payload"]["species_color_mapping"]["grey"][0],
            "Grey Heron"
        );
    }

    #[test]
    fn test_report_payload_is_flattened() {
        let report = build_fusion_report(
            &ReportScope::default(),
            &LabelCounts::new(),
            &LabelCounts::new(),
            &ColorSpeciesMapping::new(),
        );
        let payload = ReportPayload {
            result_type: ResultType::FusionReport,
            report: &report,
        };
        let value: serde_json::Value =
            serde_json::from_str(&render_json_result(&payload).unwrap()).unwrap();
        assert_eq!(value["payload"]["result_type"], "fusion_report");
        assert!(value["payload"]["inferences"].as_array().unwrap().is_empty());
        assert!(value["payload"]["visual_counts"].is_object());
    }

    #[test]
    fn test_status_payload_shape() {
        let payload = StatusPayload {
            result_type: ResultType::Status,
            changed: false,
            message: "already configured".to_string(),
            path: std::path::Path::new("/tmp/colonyfuse/config.toml"),
        };
        let value: serde_json::Value =
            serde_json::from_str(&render_json_result(&payload).unwrap()).unwrap();
        assert_eq!(value["payload"]["result_type"], "status");
        assert_eq!(value["payload"]["changed"], false);
        assert_eq!(value["payload"]["path"], "/tmp/colonyfuse/config.toml");
    }

    #[test]
    fn test_error_envelope_code() {
        let err = Error::MissingConfiguration {
            reason: "x".to_string(),
        };
        let value: serde_json::Value =
            serde_json::from_str(&render_json_error(&err).unwrap()).unwrap();
        assert_eq!(value["event"], "error");
        assert_eq!(value["payload"]["code"], "missing_configuration");
    }
}

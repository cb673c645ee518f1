//! Result rendering for the CLI.

pub mod human;
pub mod json_envelope;

pub use json_envelope::{
    ColorMappingPayload, ConfigPayload, CorrelationPayload, EventType, JsonEnvelope,
    ReportPayload, ResultType, SPEC_VERSION, StationEntry, StationsPayload, StatusPayload,
    render_json_error, render_json_result,
};

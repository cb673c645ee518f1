//! Error types for colonyfuse.

/// Result type alias for colonyfuse operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for colonyfuse.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// The color to species mapping is not configured.
    #[error("species color mapping is not configured: {reason}")]
    MissingConfiguration {
        /// Why the mapping could not be loaded.
        reason: String,
    },

    /// Unknown color token.
    #[error("unknown color '{value}' (expected one of: white, black, brown, grey)")]
    UnknownColor {
        /// The rejected token.
        value: String,
    },

    /// A detection lacks the geospatial or temporal fields needed for correlation.
    #[error("invalid detection '{id}': {reason}")]
    InvalidDetection {
        /// Identifier of the rejected detection.
        id: String,
        /// What is missing or out of range.
        reason: String,
    },

    /// Anchor and candidates share a modality.
    #[error("cannot correlate {modality} detections against {modality} detections")]
    ModalityMismatch {
        /// The shared modality.
        modality: crate::detection::Modality,
    },

    /// Anchor detection id not present in the loaded snapshots.
    #[error("detection '{id}' not found in the loaded snapshots")]
    DetectionNotFound {
        /// Requested detection id.
        id: String,
    },

    /// Failed to parse a detection snapshot file.
    #[error("failed to parse detection file '{path}'")]
    DetectionParseFailed {
        /// Path to the detection file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Detection snapshot content is malformed.
    #[error("invalid detection file format: {message}")]
    InvalidDetectionFormat {
        /// Description of the format error.
        message: String,
    },

    /// Detection snapshot file has an extension we cannot read.
    #[error("unsupported detection file '{path}' (expected .json or .csv)")]
    UnsupportedDetectionFile {
        /// Path to the detection file.
        path: std::path::PathBuf,
    },

    /// Failed to serialize JSON output.
    #[error("failed to serialize JSON output")]
    JsonSerialize {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}

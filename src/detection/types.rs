//! Detection record definitions.

use super::DetectionRef;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Sensor modality a detection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// Drone imagery (YOLO).
    Visual,
    /// Acoustic recorder (`BirdNET`).
    Acoustic,
}

impl Modality {
    /// The modality a detection of this kind is correlated against.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Visual => Self::Acoustic,
            Self::Acoustic => Self::Visual,
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Visual => write!(f, "visual"),
            Self::Acoustic => write!(f, "acoustic"),
        }
    }
}

/// Fields shared by both detection variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionCore {
    /// Opaque identifier. Numeric ids in input files are kept as strings.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Model label: a species name or a `<color>_birds` class token.
    #[serde(rename = "species_or_class", alias = "class_name")]
    pub label: String,
    /// Human-reviewed label, overriding `label` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrected_class: Option<String>,
    /// Detection confidence (0.0 - 1.0).
    pub confidence: f32,
    /// Latitude in WGS-84 degrees.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude in WGS-84 degrees.
    #[serde(default)]
    pub lon: Option<f64>,
    /// Detection instant (UTC).
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Survey the detection belongs to.
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub survey_id: Option<String>,
    /// Survey display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_name: Option<String>,
}

/// Validated position and time of a detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Detection instant.
    pub timestamp: DateTime<Utc>,
}

impl DetectionCore {
    /// Label used for counting and display: the corrected class if reviewed.
    pub fn effective_label(&self) -> &str {
        self.corrected_class.as_deref().unwrap_or(&self.label)
    }

    /// Coordinates, rejecting missing or out-of-range values.
    pub fn position(&self) -> Result<(f64, f64)> {
        let (Some(lat), Some(lon)) = (self.lat, self.lon) else {
            return Err(self.invalid("missing lat/lon"));
        };

        if !(-90.0..=90.0).contains(&lat) {
            return Err(self.invalid(format!("latitude {lat} outside -90.0 to 90.0")));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(self.invalid(format!("longitude {lon} outside -180.0 to 180.0")));
        }

        Ok((lat, lon))
    }

    /// Position and timestamp together, as needed by the correlator.
    pub fn fix(&self) -> Result<Fix> {
        let (lat, lon) = self.position()?;
        let timestamp = self
            .timestamp
            .ok_or_else(|| self.invalid("missing timestamp"))?;
        Ok(Fix {
            lat,
            lon,
            timestamp,
        })
    }

    fn invalid(&self, reason: impl Into<String>) -> Error {
        Error::InvalidDetection {
            id: self.id.clone(),
            reason: reason.into(),
        }
    }
}

/// Normalized YOLO bounding box, serialized as `[x_center, y_center, width, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    /// Box center, fraction of image width.
    pub x_center: f64,
    /// Box center, fraction of image height.
    pub y_center: f64,
    /// Box width, fraction of image width.
    pub width: f64,
    /// Box height, fraction of image height.
    pub height: f64,
}

impl BoundingBox {
    /// True if every component lies in `[0, 1]`.
    pub fn is_normalized(&self) -> bool {
        [self.x_center, self.y_center, self.width, self.height]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([x_center, y_center, width, height]: [f64; 4]) -> Self {
        Self {
            x_center,
            y_center,
            width,
            height,
        }
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x_center, b.y_center, b.width, b.height]
    }
}

/// A drone imagery detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualDetection {
    /// Shared detection fields.
    #[serde(flatten)]
    pub core: DetectionCore,
    /// Normalized bounding box within the source tile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    /// Source image tile.
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub asset_id: Option<String>,
    /// Tile URL for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// An acoustic recorder detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcousticDetection {
    /// Shared detection fields.
    #[serde(flatten)]
    pub core: DetectionCore,
    /// Audio clip URL for playback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// Recording station identifier, absent in legacy data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aru_id: Option<u32>,
    /// Nominal detection range in meters (display only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

/// Access to the shared fields of either detection variant.
pub trait Sensed {
    /// Modality of this detection type.
    const MODALITY: Modality;

    /// Shared detection fields.
    fn core(&self) -> &DetectionCore;

    /// Borrow as a modality-tagged reference.
    fn as_detection(&self) -> DetectionRef<'_>;
}

impl Sensed for VisualDetection {
    const MODALITY: Modality = Modality::Visual;

    fn core(&self) -> &DetectionCore {
        &self.core
    }

    fn as_detection(&self) -> DetectionRef<'_> {
        DetectionRef::Visual(self)
    }
}

impl Sensed for AcousticDetection {
    const MODALITY: Modality = Modality::Acoustic;

    fn core(&self) -> &DetectionCore {
        &self.core
    }

    fn as_detection(&self) -> DetectionRef<'_> {
        DetectionRef::Acoustic(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn deserialize_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn deserialize_opt_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

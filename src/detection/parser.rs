//! Detection snapshot loading.
//!
//! Reads detection exports from the detection store. JSON files hold an
//! array of records with the wire field names; CSV files hold one record per
//! row with a header line. Uses the `csv` crate for robust parsing.
//!
//! A malformed record is logged and skipped; only a file that cannot be read
//! as a whole (missing, not a JSON array, broken CSV header) fails the load.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use tracing::warn;

use super::{AcousticDetection, BoundingBox, DetectionCore, Sensed, VisualDetection};
use crate::Error;
use crate::constants::confidence;

/// Internal record for visual CSV rows. The box is split over four columns.
///
/// CSV rows are deserialized field by field (no `flatten`) so that empty
/// cells map to `None`.
#[derive(Debug, Deserialize)]
struct VisualRecord {
    id: String,
    #[serde(alias = "class_name")]
    species_or_class: String,
    corrected_class: Option<String>,
    confidence: f32,
    lat: Option<f64>,
    lon: Option<f64>,
    timestamp: Option<DateTime<Utc>>,
    survey_id: Option<String>,
    survey_name: Option<String>,
    x_center: Option<f64>,
    y_center: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    asset_id: Option<String>,
    image_url: Option<String>,
}

/// Internal record for acoustic CSV rows.
#[derive(Debug, Deserialize)]
struct AcousticRecord {
    id: String,
    #[serde(alias = "class_name")]
    species_or_class: String,
    corrected_class: Option<String>,
    confidence: f32,
    lat: Option<f64>,
    lon: Option<f64>,
    timestamp: Option<DateTime<Utc>>,
    survey_id: Option<String>,
    survey_name: Option<String>,
    audio_url: Option<String>,
    aru_id: Option<u32>,
    radius: Option<f64>,
}

impl From<AcousticRecord> for AcousticDetection {
    fn from(r: AcousticRecord) -> Self {
        Self {
            core: DetectionCore {
                id: r.id,
                label: r.species_or_class,
                corrected_class: r.corrected_class,
                confidence: r.confidence,
                lat: r.lat,
                lon: r.lon,
                timestamp: r.timestamp,
                survey_id: r.survey_id,
                survey_name: r.survey_name,
            },
            audio_url: r.audio_url,
            aru_id: r.aru_id,
            radius: r.radius,
        }
    }
}

/// Load visual detections from a `.json` or `.csv` export.
///
/// Records that fail to parse, have an out-of-range confidence, or carry a
/// partial or unnormalized bounding box are skipped with a warning. Missing
/// coordinates are not rejected here; the correlator and station aggregator
/// decide per record.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a record list.
pub fn load_visual_detections(path: &Path) -> Result<Vec<VisualDetection>, Error> {
    let parsed: Vec<(usize, VisualDetection)> = match FileKind::of(path)? {
        FileKind::Json => read_json::<VisualDetection>(path)?,
        FileKind::Csv => read_csv::<VisualRecord>(path)?
            .into_iter()
            .filter_map(|(pos, r)| match visual_from_record(r) {
                Ok(det) => Some((pos, det)),
                Err(reason) => {
                    skip(path, pos, &reason);
                    None
                }
            })
            .collect(),
    };

    Ok(keep_valid(path, parsed, |det: &VisualDetection| {
        check_confidence(det)?;
        match det.bbox {
            Some(bbox) if !bbox.is_normalized() => Err(format!(
                "bbox {:?} is not normalized to [0, 1]",
                <[f64; 4]>::from(bbox)
            )),
            _ => Ok(()),
        }
    }))
}

/// Load acoustic detections from a `.json` or `.csv` export.
///
/// Records that fail to parse or have an out-of-range confidence are skipped
/// with a warning.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a record list.
pub fn load_acoustic_detections(path: &Path) -> Result<Vec<AcousticDetection>, Error> {
    let parsed: Vec<(usize, AcousticDetection)> = match FileKind::of(path)? {
        FileKind::Json => read_json::<AcousticDetection>(path)?,
        FileKind::Csv => read_csv::<AcousticRecord>(path)?
            .into_iter()
            .map(|(pos, r)| (pos, AcousticDetection::from(r)))
            .collect(),
    };

    Ok(keep_valid(path, parsed, check_confidence::<AcousticDetection>))
}

enum FileKind {
    Json,
    Csv,
}

impl FileKind {
    fn of(path: &Path) -> Result<Self, Error> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(Error::UnsupportedDetectionFile {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Where a skipped record sat: JSON array index or CSV line, 1-based.
fn skip(path: &Path, pos: usize, reason: &str) {
    warn!("Skipping record {pos} in '{}': {reason}", path.display());
}

fn keep_valid<T: Sensed>(
    path: &Path,
    parsed: Vec<(usize, T)>,
    check: impl Fn(&T) -> Result<(), String>,
) -> Vec<T> {
    parsed
        .into_iter()
        .filter_map(|(pos, det)| match check(&det) {
            Ok(()) => Some(det),
            Err(reason) => {
                skip(path, pos, &format!("'{}': {reason}", det.core().id));
                None
            }
        })
        .collect()
}

/// Read a JSON array, deserializing each element on its own.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<(usize, T)>, Error> {
    let file = File::open(path).map_err(|e| Error::DetectionParseFailed {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let values: Vec<serde_json::Value> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| Error::DetectionParseFailed {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match serde_json::from_value::<T>(value) {
            Ok(record) => Some((idx + 1, record)),
            Err(e) => {
                skip(path, idx + 1, &e.to_string());
                None
            }
        })
        .collect())
}

/// Read CSV rows, tagging each with its line number.
fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<(usize, T)>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::DetectionParseFailed {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    // a header that cannot be read makes every row meaningless
    reader
        .headers()
        .map_err(|e| Error::InvalidDetectionFormat {
            message: format!("'{}': unreadable header: {e}", path.display()),
        })?;

    let mut records = Vec::new();
    for (line_num, result) in reader.deserialize::<T>().enumerate() {
        let line = line_num + 2;
        match result {
            Ok(record) => records.push((line, record)),
            Err(e) => skip(path, line, &e.to_string()),
        }
    }

    Ok(records)
}

fn visual_from_record(r: VisualRecord) -> Result<VisualDetection, String> {
    let bbox = match (r.x_center, r.y_center, r.width, r.height) {
        (Some(x_center), Some(y_center), Some(width), Some(height)) => Some(BoundingBox {
            x_center,
            y_center,
            width,
            height,
        }),
        (None, None, None, None) => None,
        _ => {
            return Err(format!(
                "'{}': bbox needs all of x_center, y_center, width, height",
                r.id
            ));
        }
    };

    Ok(VisualDetection {
        core: DetectionCore {
            id: r.id,
            label: r.species_or_class,
            corrected_class: r.corrected_class,
            confidence: r.confidence,
            lat: r.lat,
            lon: r.lon,
            timestamp: r.timestamp,
            survey_id: r.survey_id,
            survey_name: r.survey_name,
        },
        bbox,
        asset_id: r.asset_id,
        image_url: r.image_url,
    })
}

fn check_confidence<T: Sensed>(det: &T) -> Result<(), String> {
    let value = det.core().confidence;
    if (confidence::MIN..=confidence::MAX).contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "confidence must be between {} and {}, got {value}",
            confidence::MIN,
            confidence::MAX
        ))
    }
}

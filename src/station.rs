//! Acoustic recording station (ARU) aggregation.
//!
//! Groups recorder detections into logical stations for correlation and map
//! display. Detections carrying an `aru_id` group by id; legacy detections
//! without one group by coordinates rounded to four decimals, so distinct
//! recorders within ~11 m collapse into one station.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::constants::station::{BOUNDS_BUFFER_DEGREES, COORD_DECIMALS};
use crate::detection::{AcousticDetection, Sensed};
use crate::error::Result;

/// Grouping key for a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StationKey {
    /// Recorder identifier from the detection store.
    ById(u32),
    /// Coordinates scaled by 10^4 and rounded.
    ByRoundedCoord(i64, i64),
}

impl StationKey {
    /// Key for a detection together with its validated position.
    ///
    /// Coordinates are validated even for id-keyed detections, since the
    /// station needs a representative position.
    pub fn for_detection(detection: &AcousticDetection) -> Result<(Self, f64, f64)> {
        let (lat, lon) = detection.core().position()?;
        Ok((Self::new(detection.aru_id, lat, lon), lat, lon))
    }

    /// Key from an optional recorder id and a validated position.
    pub fn new(aru_id: Option<u32>, lat: f64, lon: f64) -> Self {
        aru_id.map_or_else(
            || Self::ByRoundedCoord(round_coord(lat), round_coord(lon)),
            Self::ById,
        )
    }
}

/// Scale to fixed decimals and round half away from zero.
#[allow(clippy::cast_possible_truncation)]
fn round_coord(value: f64) -> i64 {
    (value * 10f64.powi(COORD_DECIMALS)).round() as i64
}

/// A derived group of detections from one physical recorder.
#[derive(Debug, Clone, Serialize)]
pub struct Station<'a> {
    /// Grouping key.
    pub key: StationKey,
    /// Display label: `ARU {id}` or `Station {n}`.
    pub label: String,
    /// Representative latitude (first member's).
    pub lat: f64,
    /// Representative longitude (first member's).
    pub lon: f64,
    /// Member detections in input order.
    pub detections: Vec<&'a AcousticDetection>,
}

impl Station<'_> {
    /// Recorder id, if the station is keyed by one.
    pub const fn aru_id(&self) -> Option<u32> {
        match self.key {
            StationKey::ById(id) => Some(id),
            StationKey::ByRoundedCoord(..) => None,
        }
    }
}

/// Group acoustic detections into stations in first-seen order.
///
/// `Station {n}` labels use the station's 1-based position in the result.
/// Detections without valid coordinates are logged and skipped.
pub fn group_into_stations(detections: &[AcousticDetection]) -> Vec<Station<'_>> {
    let mut stations: Vec<Station<'_>> = Vec::new();
    let mut index: HashMap<StationKey, usize> = HashMap::new();

    for detection in detections {
        let (key, lat, lon) = match StationKey::for_detection(detection) {
            Ok(keyed) => keyed,
            Err(e) => {
                warn!("Skipping station member: {e}");
                continue;
            }
        };

        if let Some(&idx) = index.get(&key) {
            stations[idx].detections.push(detection);
            continue;
        }

        let label = match key {
            StationKey::ById(id) => format!("ARU {id}"),
            StationKey::ByRoundedCoord(..) => format!("Station {}", stations.len() + 1),
        };

        index.insert(key, stations.len());
        stations.push(Station {
            key,
            label,
            lat,
            lon,
            detections: vec![detection],
        });
    }

    debug!(
        "Grouped {} acoustic detection(s) into {} station(s)",
        detections.len(),
        stations.len()
    );

    stations
}

/// Axis-aligned coordinate bounds of a survey footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurveyBounds {
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Western edge.
    pub min_lon: f64,
    /// Eastern edge.
    pub max_lon: f64,
}

impl SurveyBounds {
    /// Bounds of every detection with a valid position, or `None` if none do.
    pub fn from_detections<T: Sensed>(detections: &[T]) -> Option<Self> {
        detections
            .iter()
            .filter_map(|d| d.core().position().ok())
            .fold(None, |acc: Option<Self>, (lat, lon)| {
                Some(acc.map_or(
                    Self {
                        min_lat: lat,
                        max_lat: lat,
                        min_lon: lon,
                        max_lon: lon,
                    },
                    |b| Self {
                        min_lat: b.min_lat.min(lat),
                        max_lat: b.max_lat.max(lat),
                        min_lon: b.min_lon.min(lon),
                        max_lon: b.max_lon.max(lon),
                    },
                ))
            })
    }

    /// True if the point lies inside the bounds grown by `buffer` degrees.
    pub fn contains(&self, lat: f64, lon: f64, buffer: f64) -> bool {
        (self.min_lat - buffer..=self.max_lat + buffer).contains(&lat)
            && (self.min_lon - buffer..=self.max_lon + buffer).contains(&lon)
    }
}

/// Stations whose representative position overlaps a survey footprint.
///
/// Uses the default ~100 m buffer around the bounds.
pub fn stations_within_bounds<'s, 'a>(
    stations: &'s [Station<'a>],
    bounds: &SurveyBounds,
) -> Vec<&'s Station<'a>> {
    stations
        .iter()
        .filter(|s| bounds.contains(s.lat, s.lon, BOUNDS_BUFFER_DEGREES))
        .collect()
}

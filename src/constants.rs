//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "colonyfuse";

/// Mean Earth radius in meters used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Default correlation window.
pub mod correlation {
    /// Maximum distance between two correlated detections (exclusive).
    pub const MAX_DISTANCE_METERS: f64 = 500.0;

    /// Maximum time delta between two correlated detections (exclusive).
    pub const MAX_TIME_DELTA_MINUTES: f64 = 30.0;
}

/// Station grouping constants.
pub mod station {
    /// Decimal places kept when keying stations by coordinates (~11 m).
    pub const COORD_DECIMALS: i32 = 4;

    /// Buffer added around a survey bounding box when looking for nearby
    /// stations, in degrees (~100 m).
    pub const BOUNDS_BUFFER_DEGREES: f64 = 0.001;
}

/// Color-class inference constants.
pub mod fusion {
    /// Suffix appended to a color token to form the drone class label.
    pub const DRONE_CLASS_SUFFIX: &str = "_birds";

    /// Upper bound of a confidence score or probability, in percent.
    pub const MAX_PERCENT: u64 = 100;
}

/// Confidence value bounds.
pub mod confidence {
    /// Minimum valid confidence value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid confidence value.
    pub const MAX: f32 = 1.0;
    /// Decimal places for confidence formatting.
    pub const DECIMAL_PLACES: usize = 2;
}

/// Colony default color to species mapping, written by `colors init`.
pub const DEFAULT_COLOR_SPECIES: &[(&str, &[&str])] = &[
    (
        "white",
        &[
            "Great Egret",
            "Intermediate Egret",
            "Little Egret",
            "Painted Stork",
            "Cattle Egret",
        ],
    ),
    (
        "black",
        &["Oriental Darter", "Little Cormorant", "Indian Cormorant"],
    ),
    ("brown", &["Purple Heron", "Cinnamon Bittern"]),
    ("grey", &["Grey Heron", "Black-crowned Night Heron"]),
];

//! Great-circle distance and timestamp deltas.

use crate::constants::EARTH_RADIUS_METERS;
use chrono::{DateTime, Utc};

/// Haversine distance between two WGS-84 points, in meters.
///
/// Uses a spherical Earth; correlation thresholds are far coarser than the
/// error this introduces.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let lat1r = lat1.to_radians();
    let lat2r = lat2.to_radians();

    let a = (lat1r.cos() * lat2r.cos())
        .mul_add((dlon / 2.0).sin().powi(2), (dlat / 2.0).sin().powi(2))
        .min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Absolute difference between two instants, in fractional minutes.
pub fn time_delta_minutes(t1: DateTime<Utc>, t2: DateTime<Utc>) -> f64 {
    let delta = (t1 - t2).abs();

    #[allow(clippy::cast_precision_loss)]
    let seconds = delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1e9;

    seconds / 60.0
}

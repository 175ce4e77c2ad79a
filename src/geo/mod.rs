//! Geographic distance and geofence verification.
//!
//! Pure computation: no I/O and no stored state. The check-in flow calls
//! [`verify_within_geofence`] against the registered branch position before
//! any record is written.

mod parse;

pub use parse::parse_coordinates;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// How far from a branch a check-in is still accepted, in meters.
///
/// Deliberately loose: consumer GPS is good to 5-50 m outdoors and much worse
/// indoors, so the fence only has to rule out check-ins from another site
/// entirely. Tunable via configuration without touching the distance math.
pub const DEFAULT_GEOFENCE_RADIUS_METERS: f64 = 2000.0;

/// A latitude/longitude pair in signed decimal degrees.
///
/// No range validation beyond both values being finite; a pair that fails to
/// parse is absent, not invalid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Outcome of a geofence check.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GeofenceCheck {
    /// Whether the reported position is inside the allowed radius
    pub within_range: bool,

    /// Great-circle distance between reported and registered positions
    pub distance_meters: f64,
}

/// Great-circle distance between two points in meters (haversine formula).
pub fn haversine_distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Classify a reported position against a branch position.
///
/// The boundary is inclusive: a point exactly `max_meters` away is in range.
pub fn verify_within_geofence(
    reported: Coordinate,
    branch: Coordinate,
    max_meters: f64,
) -> GeofenceCheck {
    let distance_meters = haversine_distance_meters(reported, branch);
    GeofenceCheck {
        within_range: distance_meters <= max_meters,
        distance_meters,
    }
}

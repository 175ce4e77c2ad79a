//! Coordinate extraction from free-form location input.
//!
//! Accepts a bare "lat,lng" pair or any of the map-link shapes users paste
//! when registering a branch. Absence, not error: input that matches nothing
//! yields `None`.

use regex::Regex;

use super::Coordinate;

/// Extract a coordinate pair from a raw string or map link.
///
/// Patterns are tried in order and the first match wins:
/// 1. bare "lat,lng" pair;
/// 2. `@lat,lng` embedded-map marker;
/// 3. `q=` / `ll=` query parameter;
/// 4. `/search/lat,lng` path segment.
///
/// The bare pair is tried first so a pasted coordinate string never falls
/// into the URL patterns. The URL patterns require a decimal point; only the
/// bare-pair path tolerates integer degrees, since it uses plain float
/// parsing.
pub fn parse_coordinates(input: &str) -> Option<Coordinate> {
    if let Some(coord) = parse_raw_pair(input) {
        return Some(coord);
    }

    let re_at = Regex::new(r"@(-?\d+\.\d+),(-?\d+\.\d+)").unwrap();
    // Anchored on ? or & so unrelated parameters ending in q/ll cannot match
    let re_query = Regex::new(r"[?&](?:q|ll)=(-?\d+\.\d+),(-?\d+\.\d+)").unwrap();
    let re_search = Regex::new(r"/search/(-?\d+\.\d+),(-?\d+\.\d+)").unwrap();

    for re in [&re_at, &re_query, &re_search] {
        if let Some(caps) = re.captures(input) {
            let lat: f64 = caps[1].parse().ok()?;
            let lng: f64 = caps[2].parse().ok()?;
            return Some(Coordinate::new(lat, lng));
        }
    }

    None
}

/// Parse "lat,lng" with exactly two comma-separated float tokens.
fn parse_raw_pair(input: &str) -> Option<Coordinate> {
    let mut parts = input.split(',');
    let lat_str = parts.next()?;
    let lng_str = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let lat: f64 = lat_str.trim().parse().ok()?;
    let lng: f64 = lng_str.trim().parse().ok()?;
    if !lat.is_finite() || !lng.is_finite() {
        return None;
    }

    Some(Coordinate::new(lat, lng))
}

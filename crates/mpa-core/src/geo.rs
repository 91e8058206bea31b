//! Great-circle distance on a spherical Earth.
//!
//! Markets are compared by haversine distance. There is no ellipsoid
//! correction; at market-to-market scale the spherical error is well under
//! one percent.

/// Mean Earth radius used by the haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Fixed kilometre-to-mile factor. Not derived from a unit library so that
/// reported mileages stay identical across releases.
pub const KM_TO_MILES: f64 = 0.621_371;

/// Decimal places coordinates are rounded to on load (about 0.11 m).
pub const COORDINATE_DECIMALS: i32 = 6;

/// Haversine distance between two points given in degrees, in kilometres.
///
/// Symmetric in its arguments and zero for identical points.
#[must_use]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1.0 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine distance in statute miles.
#[must_use]
pub fn distance_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    distance_km(lat1, lon1, lat2, lon2) * KM_TO_MILES
}

/// Round a coordinate to [`COORDINATE_DECIMALS`] places.
#[must_use]
pub fn round_coordinate(value: f64) -> f64 {
    let scale = 10_f64.powi(COORDINATE_DECIMALS);
    (value * scale).round() / scale
}

#[must_use]
pub fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat)
}

#[must_use]
pub fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon)
}

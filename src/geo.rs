//! Spherical geometry primitives.
//!
//! Distances use the haversine formula on a spherical earth. Segment
//! tests and projections use a local equirectangular approximation:
//! longitudes are scaled by the cosine of the segment's mean latitude
//! and the result is treated as a flat plane. This is accurate enough
//! for the short legs of a routed path and much cheaper than an exact
//! geodesic projection.

use serde::{Deserialize, Serialize};

/// Earth radius in meters (spherical model).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Haversine distance between two points in meters.
pub fn haversine(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let sin_dlat = ((b.lat - a.lat).to_radians() / 2.0).sin();
    let sin_dlon = ((b.lon - a.lon).to_radians() / 2.0).sin();

    let h = sin_dlat * sin_dlat
        + sin_dlon * sin_dlon * a.lat.to_radians().cos() * b.lat.to_radians().cos();

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Total length of a polyline in meters.
pub fn path_length(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine(&w[0], &w[1]))
        .sum()
}

/// Longitude scale for the segment a-b.
fn shrink_factor(a: &GeoPoint, b: &GeoPoint) -> f64 {
    ((a.lat + b.lat) / 2.0).to_radians().cos()
}

/// Check whether the perpendicular projection of `r` onto the line
/// through `a` and `b` lands strictly between the two endpoints.
///
/// Both angles (r-a, b-a) and (b-r, b-a) must be acute; a projection
/// exactly on an endpoint does not count.
pub fn projection_is_on_segment(r: &GeoPoint, a: &GeoPoint, b: &GeoPoint) -> bool {
    let shrink = shrink_factor(a, b);

    let a_lon = a.lon * shrink;
    let b_lon = b.lon * shrink;
    let r_lon = r.lon * shrink;

    let ab_x = b_lon - a_lon;
    let ab_y = b.lat - a.lat;

    let ar_x = r_lon - a_lon;
    let ar_y = r.lat - a.lat;
    let ab_ar = ar_x * ab_x + ar_y * ab_y;

    let rb_x = b_lon - r_lon;
    let rb_y = b.lat - r.lat;
    let ab_rb = rb_x * ab_x + rb_y * ab_y;

    ab_ar > 0.0 && ab_rb > 0.0
}

/// Project `r` onto the line through `a` and `b`.
///
/// The projection factor is not clamped: callers check
/// [`projection_is_on_segment`] first, so the result lies on the segment.
pub fn project_onto_segment(r: &GeoPoint, a: &GeoPoint, b: &GeoPoint) -> GeoPoint {
    let shrink = shrink_factor(a, b);

    let a_lon = a.lon * shrink;
    let b_lon = b.lon * shrink;
    let r_lon = r.lon * shrink;

    let delta_lon = b_lon - a_lon;
    let delta_lat = b.lat - a.lat;

    if delta_lat == 0.0 {
        // horizontal edge
        return GeoPoint::new(a.lat, r.lon);
    }

    if delta_lon == 0.0 {
        // vertical edge
        return GeoPoint::new(r.lat, a.lon);
    }

    let norm = delta_lon * delta_lon + delta_lat * delta_lat;
    let t = ((r_lon - a_lon) * delta_lon + (r.lat - a.lat) * delta_lat) / norm;

    let c_lon = a_lon + t * delta_lon;
    let c_lat = a.lat + t * delta_lat;

    GeoPoint::new(c_lat, c_lon / shrink)
}

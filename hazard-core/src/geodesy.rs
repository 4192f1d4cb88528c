//! Great-circle distance and Web Mercator projection primitives.
//!
//! Distances use a spherical Earth of radius [`EARTH_RADIUS_KM`]. The
//! projection uses the spherical Web Mercator radius [`WEB_MERCATOR_RADIUS_M`]
//! and is only meant for planar kernel arithmetic in the density estimator.

use std::f64::consts::{FRAC_PI_4, PI};

use geo::Coord;
use thiserror::Error;

use crate::LatLon;

/// Mean Earth radius used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Sphere radius of the Web Mercator projection (EPSG:3857).
pub const WEB_MERCATOR_RADIUS_M: f64 = 6_378_137.0;

/// Latitude at which Web Mercator tiles are conventionally cut off.
pub const WEB_MERCATOR_MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Error raised when a position cannot be projected.
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum ProjectionError {
    /// Web Mercator is undefined at and beyond the poles.
    #[error("latitude {lat} cannot be projected to Web Mercator")]
    PolarLatitude {
        /// Offending latitude in degrees.
        lat: f64,
    },
}

/// Great-circle distance in kilometres between two positions.
///
/// The haversine term is clamped to `[0, 1]` so rounding on antipodal or
/// identical inputs never yields NaN.
///
/// # Examples
/// ```
/// use hazard_core::{LatLon, haversine_km};
///
/// let a = LatLon::new(19.50, 72.76);
/// let b = LatLon::new(19.27, 72.79);
/// let d = haversine_km(a, b);
/// assert!(d > 25.0 && d < 26.0);
/// assert_eq!(haversine_km(a, a), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "great-circle distance is inherently floating-point"
)]
pub fn haversine_km(a: LatLon, b: LatLon) -> f64 {
    let h = haversine_term(a, b);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// `sin²(θ / 2)` for the central angle `θ` between two positions.
#[expect(
    clippy::float_arithmetic,
    reason = "haversine term combines trigonometric products"
)]
fn haversine_term(a: LatLon, b: LatLon) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let half_dlat = (b.lat - a.lat).to_radians() / 2.0;
    let half_dlon = (b.lon - a.lon).to_radians() / 2.0;
    let h = half_dlat.sin().powi(2) + lat_a.cos() * lat_b.cos() * half_dlon.sin().powi(2);
    h.clamp(0.0, 1.0)
}

/// Project a position onto spherical Web Mercator, in metres.
///
/// # Errors
/// Returns [`ProjectionError::PolarLatitude`] when `|lat| >= 90`, where the
/// projection diverges.
///
/// # Examples
/// ```
/// use hazard_core::{LatLon, to_web_mercator_meters};
///
/// let origin = to_web_mercator_meters(LatLon::new(0.0, 0.0)).expect("projectable");
/// assert!(origin.x.abs() < 1e-9 && origin.y.abs() < 1e-9);
/// assert!(to_web_mercator_meters(LatLon::new(90.0, 0.0)).is_err());
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "projection formulas are floating-point"
)]
pub fn to_web_mercator_meters(location: LatLon) -> Result<Coord<f64>, ProjectionError> {
    if !(location.lat.abs() < 90.0) {
        return Err(ProjectionError::PolarLatitude { lat: location.lat });
    }
    let x = WEB_MERCATOR_RADIUS_M * location.lon.to_radians();
    let y = WEB_MERCATOR_RADIUS_M * (FRAC_PI_4 + location.lat.to_radians() / 2.0).tan().ln();
    Ok(Coord { x, y })
}

/// Position on the unit sphere.
///
/// The squared Euclidean distance between two unit vectors equals four times
/// the haversine term, so chord length orders points exactly as great-circle
/// distance does.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "spherical to Cartesian conversion"
)]
pub fn unit_vector(location: LatLon) -> [f64; 3] {
    let lat = location.lat.to_radians();
    let lon = location.lon.to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

/// Squared unit-sphere chord matching a great-circle distance in kilometres.
///
/// Distances at or beyond half the circumference map to the sphere diameter.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "angle to chord conversion"
)]
pub fn chord_squared_for_km(distance_km: f64) -> f64 {
    let angle = distance_km / EARTH_RADIUS_KM;
    if angle >= PI {
        return 4.0;
    }
    let half_chord = (angle / 2.0).sin();
    4.0 * half_chord * half_chord
}

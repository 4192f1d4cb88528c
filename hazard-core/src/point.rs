//! Geotagged hazard reports as seen by the analysis engine.

use geo::Coord;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque identifier carried through from the ingestion collaborator.
pub type PointId = u64;

/// A WGS84 position in degrees.
///
/// Conversions to and from [`geo::Coord`] use `x = longitude` and
/// `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use hazard_core::LatLon;
///
/// let mumbai = LatLon::new(19.07, 72.88);
/// let coord: Coord<f64> = mumbai.into();
/// assert_eq!(coord.x, 72.88);
/// assert_eq!(LatLon::from(coord), mumbai);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LatLon {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl LatLon {
    /// Construct a position without validation.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<LatLon> for Coord<f64> {
    fn from(value: LatLon) -> Self {
        Self {
            x: value.lon,
            y: value.lat,
        }
    }
}

impl From<Coord<f64>> for LatLon {
    fn from(value: Coord<f64>) -> Self {
        Self {
            lat: value.y,
            lon: value.x,
        }
    }
}

/// Errors returned by [`HazardPoint::new`].
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum HazardPointError {
    /// Latitude was NaN, infinite or outside `[-90, 90]`.
    #[error("latitude {value} must be finite and within [-90, 90]")]
    Latitude {
        /// Rejected latitude.
        value: f64,
    },
    /// Longitude was NaN, infinite or outside `[-180, 180]`.
    #[error("longitude {value} must be finite and within [-180, 180]")]
    Longitude {
        /// Rejected longitude.
        value: f64,
    },
    /// Weight was NaN, infinite or negative.
    #[error("weight {value} must be finite and non-negative")]
    Weight {
        /// Rejected weight.
        value: f64,
    },
}

/// A validated, weighted hazard report.
///
/// The weight is a report count or another non-negative severity proxy.
/// Fields are private so every instance has passed validation; the analysis
/// stages rely on that instead of re-checking coordinates.
///
/// # Examples
/// ```
/// use hazard_core::{HazardPoint, HazardPointError};
///
/// # fn main() -> Result<(), HazardPointError> {
/// let point = HazardPoint::new(7, 19.5, 72.76, 4.0)?;
/// assert_eq!(point.id(), 7);
/// assert!(HazardPoint::new(8, 91.0, 0.0, 1.0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawHazardPoint", into = "RawHazardPoint"))]
pub struct HazardPoint {
    id: PointId,
    location: LatLon,
    weight: f64,
}

impl HazardPoint {
    /// Validates and constructs a [`HazardPoint`].
    ///
    /// # Errors
    /// Returns [`HazardPointError`] when a coordinate is out of range or not
    /// finite, or when the weight is negative or not finite.
    pub fn new(id: PointId, lat: f64, lon: f64, weight: f64) -> Result<Self, HazardPointError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(HazardPointError::Latitude { value: lat });
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(HazardPointError::Longitude { value: lon });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(HazardPointError::Weight { value: weight });
        }
        Ok(Self {
            id,
            location: LatLon::new(lat, lon),
            weight,
        })
    }

    /// Identifier supplied by the ingestion collaborator.
    #[must_use]
    pub const fn id(&self) -> PointId {
        self.id
    }

    /// Position of the report.
    #[must_use]
    pub const fn location(&self) -> LatLon {
        self.location
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.location.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.location.lon
    }

    /// Non-negative report weight.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }
}

/// Wire shape of a hazard point; validated on the way in.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct RawHazardPoint {
    id: PointId,
    lat: f64,
    lon: f64,
    weight: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawHazardPoint> for HazardPoint {
    type Error = HazardPointError;

    fn try_from(raw: RawHazardPoint) -> Result<Self, Self::Error> {
        Self::new(raw.id, raw.lat, raw.lon, raw.weight)
    }
}

#[cfg(feature = "serde")]
impl From<HazardPoint> for RawHazardPoint {
    fn from(point: HazardPoint) -> Self {
        Self {
            id: point.id,
            lat: point.location.lat,
            lon: point.location.lon,
            weight: point.weight,
        }
    }
}

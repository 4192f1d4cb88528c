//! Core domain types for the coastal hazard analysis engine.
//!
//! These models keep downstream analysis honest: hazard points are validated
//! at construction, so the clustering, density and hotspot stages can assume
//! finite, in-range coordinates and non-negative weights.
//!
//! The crate also hosts the shared geodesy primitives, the R\*-tree backed
//! [`NeighbourIndex`] and the [`SeverityBand`] classifier used to annotate
//! analysis output.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod geodesy;
mod index;
mod point;
mod severity;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use geodesy::{
    EARTH_RADIUS_KM, ProjectionError, WEB_MERCATOR_MAX_LATITUDE, WEB_MERCATOR_RADIUS_M,
    haversine_km, to_web_mercator_meters,
};
pub use index::NeighbourIndex;
pub use point::{HazardPoint, HazardPointError, LatLon, PointId};
pub use severity::{BandThresholds, BandThresholdsError, SeverityBand};

//! Facade crate for the coastal hazard analysis engine.
//!
//! This crate re-exports the validated point model from `hazard-core` and the
//! clustering, density and hotspot stages from `hazard-analytics`, so callers
//! can depend on a single crate.
//!
//! ```
//! use hazard_engine::{AnalysisParams, HazardPoint, analyze};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let points = [
//!     HazardPoint::new(1, 19.50, 72.76, 3.0)?,
//!     HazardPoint::new(2, 19.27, 72.79, 4.0)?,
//!     HazardPoint::new(3, 19.29, 72.91, 2.0)?,
//! ];
//! let analysis = analyze(&points, &AnalysisParams::default())?;
//! assert_eq!(analysis.summary.num_clusters, 1);
//!
//! let json = serde_json::to_string(&analysis)?;
//! assert!(json.contains("\"num_clusters\":1"));
//! let reloaded: HazardPoint =
//!     serde_json::from_str(r#"{ "id": 4, "lat": 19.1, "lon": 72.9, "weight": 1.0 }"#)?;
//! assert_eq!(reloaded.id(), 4);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub use hazard_core::{
    BandThresholds, BandThresholdsError, EARTH_RADIUS_KM, HazardPoint, HazardPointError, LatLon,
    NeighbourIndex, PointId, ProjectionError, SeverityBand, WEB_MERCATOR_MAX_LATITUDE,
    WEB_MERCATOR_RADIUS_M, haversine_km, to_web_mercator_meters,
};

pub use hazard_analytics::{
    Analysis, AnalysisParams, Assignment, Cluster, ClusterId, ClusterLabel, Clustering,
    DensityField, DensityOptions, DensityValue, HotspotScore, Hull, MAX_BANDWIDTH_M,
    MIN_BANDWIDTH_M, NeighbourhoodRule, ParameterError, Significance, Stages, Summary, analyze,
    build_hulls, cluster, cluster_with_bands, convex_hull, density_field, estimate_bandwidth,
    hotspot_scores,
};

#[cfg(feature = "test-support")]
pub use hazard_core::test_support;

//! Spatial analysis of coastal hazard reports.
//!
//! The crate turns a batch of validated [`HazardPoint`](hazard_core::HazardPoint)
//! values into density-based clusters with convex hull footprints, a kernel
//! density field for heat maps, and local z-score hotspot flags. Each output
//! carries a [`SeverityBand`](hazard_core::SeverityBand) relative to the rest
//! of the batch.
//!
//! [`analyze`] runs the whole pipeline; the individual stages are exposed for
//! callers that only need one of them.
//!
//! Enable the `parallel` feature to run independent stages on the rayon
//! thread pool.

#![forbid(unsafe_code)]

mod analyze;
mod dbscan;
mod density;
mod error;
mod hotspot;
mod hull;
mod params;
mod stats;

pub use analyze::{Analysis, Summary, analyze};
pub use dbscan::{
    Assignment, Cluster, ClusterId, ClusterLabel, Clustering, cluster, cluster_with_bands,
};
pub use density::{
    DensityField, DensityOptions, DensityValue, MAX_BANDWIDTH_M, MIN_BANDWIDTH_M, density_field,
    estimate_bandwidth,
};
pub use error::ParameterError;
pub use hotspot::{HotspotScore, Significance, hotspot_scores};
pub use hull::{Hull, build_hulls, convex_hull};
pub use params::{AnalysisParams, NeighbourhoodRule, Stages};

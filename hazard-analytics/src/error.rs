//! Error types raised while validating analysis parameters.

use thiserror::Error;

/// Invalid analysis parameters.
///
/// Any of these aborts the whole [`analyze`](crate::analyze) call before work
/// starts; no partial results are produced.
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum ParameterError {
    /// The DBSCAN neighbourhood radius was zero, negative or not finite.
    #[error("eps_km must be finite and positive, got {value}")]
    NonPositiveEps {
        /// Rejected radius in kilometres.
        value: f64,
    },
    /// DBSCAN needs at least one point per neighbourhood.
    #[error("min_pts must be at least 1")]
    ZeroMinPts,
    /// The fixed hotspot radius was zero, negative or not finite.
    #[error("hotspot radius_km must be finite and positive, got {value}")]
    NonPositiveRadius {
        /// Rejected radius in kilometres.
        value: f64,
    },
    /// A threshold or blend constant was NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NonFinite {
        /// Parameter name as it appears in [`AnalysisParams`](crate::AnalysisParams).
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
}

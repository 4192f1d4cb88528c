//! Tunable parameters and named profiles for the analysis pipeline.

use hazard_core::BandThresholds;
use serde::{Deserialize, Serialize};

use crate::ParameterError;

/// How the hotspot statistic picks each point's neighbourhood.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum NeighbourhoodRule {
    /// The `k` nearest other points, capped at `n - 1`.
    KNearest {
        /// Requested neighbour count.
        k: usize,
    },
    /// Every other point within a fixed great-circle radius.
    WithinRadius {
        /// Radius in kilometres.
        radius_km: f64,
    },
}

impl Default for NeighbourhoodRule {
    fn default() -> Self {
        Self::KNearest { k: 6 }
    }
}

/// Which sub-analyses [`analyze`](crate::analyze) runs.
///
/// Disabled stages produce empty output rather than being omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stages {
    /// DBSCAN clustering and hull footprints.
    pub clustering: bool,
    /// Kernel density field for heat maps.
    pub density: bool,
    /// Local z-score hotspot flags.
    pub hotspots: bool,
}

impl Default for Stages {
    fn default() -> Self {
        Self {
            clustering: true,
            density: true,
            hotspots: true,
        }
    }
}

/// Parameters for one analysis run.
///
/// The default is the coastal profile: 35 km DBSCAN radius with three points
/// per core neighbourhood, six nearest neighbours for the hotspot statistic,
/// significance at `z >= 1.5` for reports weighing at least six, a 120 point
/// bandwidth sample, and heat blending of `1.5 * weight + 0.8 * density`.
///
/// # Examples
/// ```
/// use hazard_analytics::{AnalysisParams, NeighbourhoodRule};
///
/// let params = AnalysisParams {
///     eps_km: 60.0,
///     min_pts: 2,
///     ..AnalysisParams::default()
/// };
/// assert!(params.validate().is_ok());
/// assert_eq!(params.neighbourhood, NeighbourhoodRule::KNearest { k: 6 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// DBSCAN neighbourhood radius in kilometres.
    pub eps_km: f64,
    /// Minimum neighbourhood size, the point included, for a core point.
    pub min_pts: usize,
    /// Neighbourhood used by the hotspot statistic.
    pub neighbourhood: NeighbourhoodRule,
    /// Minimum z-score for a significant hotspot.
    pub z_threshold: f64,
    /// Minimum report weight for a significant hotspot.
    pub min_weight_threshold: f64,
    /// Number of leading points sampled for bandwidth estimation.
    pub kde_sample_cap: usize,
    /// Heat intensity multiplier for the raw report weight.
    pub blend_alpha: f64,
    /// Heat intensity multiplier for the normalised density.
    pub blend_beta: f64,
    /// Scale each kernel by the neighbour's weight.
    pub weighted_kernel: bool,
    /// Ratio thresholds for severity bands.
    pub bands: BandThresholds,
    /// Sub-analyses to run.
    pub stages: Stages,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            eps_km: 35.0,
            min_pts: 3,
            neighbourhood: NeighbourhoodRule::default(),
            z_threshold: 1.5,
            min_weight_threshold: 6.0,
            kde_sample_cap: 120,
            blend_alpha: 1.5,
            blend_beta: 0.8,
            weighted_kernel: false,
            bands: BandThresholds::default(),
            stages: Stages::default(),
        }
    }
}

impl AnalysisParams {
    /// Coastal profile with hotspots scored over a fixed radius.
    #[must_use]
    pub fn fixed_radius(radius_km: f64) -> Self {
        Self {
            neighbourhood: NeighbourhoodRule::WithinRadius { radius_km },
            ..Self::default()
        }
    }

    /// Density field only; clustering and hotspot stages are skipped.
    #[must_use]
    pub fn heat_only() -> Self {
        Self {
            stages: Stages {
                clustering: false,
                density: true,
                hotspots: false,
            },
            ..Self::default()
        }
    }

    /// Check every parameter.
    ///
    /// # Errors
    /// Returns the first [`ParameterError`] found: a non-positive or
    /// non-finite `eps_km` or hotspot radius, `min_pts == 0`, or a NaN or
    /// infinite threshold or blend constant.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(self.eps_km.is_finite() && self.eps_km > 0.0) {
            return Err(ParameterError::NonPositiveEps { value: self.eps_km });
        }
        if self.min_pts == 0 {
            return Err(ParameterError::ZeroMinPts);
        }
        if let NeighbourhoodRule::WithinRadius { radius_km } = self.neighbourhood
            && !(radius_km.is_finite() && radius_km > 0.0)
        {
            return Err(ParameterError::NonPositiveRadius { value: radius_km });
        }
        for (name, value) in [
            ("z_threshold", self.z_threshold),
            ("min_weight_threshold", self.min_weight_threshold),
            ("blend_alpha", self.blend_alpha),
            ("blend_beta", self.blend_beta),
        ] {
            if !value.is_finite() {
                return Err(ParameterError::NonFinite { name, value });
            }
        }
        Ok(())
    }
}

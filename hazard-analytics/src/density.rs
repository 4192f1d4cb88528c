//! Gaussian kernel density field for heat-map intensity.
//!
//! Points are projected to Web Mercator metres and every pair contributes an
//! unnormalised Gaussian kernel. The bandwidth comes from a strided sample of
//! pairwise distances, scaled by `n^(-1/5)` and clamped to 10–40 km.

use geo::Coord;
use hazard_core::{
    BandThresholds, HazardPoint, LatLon, PointId, SeverityBand, WEB_MERCATOR_MAX_LATITUDE,
    to_web_mercator_meters,
};
use serde::{Deserialize, Serialize};

use crate::stats::{Denominator, count_as_f64, moments};

/// Narrowest kernel bandwidth in metres.
pub const MIN_BANDWIDTH_M: f64 = 10_000.0;

/// Widest kernel bandwidth in metres.
pub const MAX_BANDWIDTH_M: f64 = 40_000.0;

/// Distance spread assumed when no pair could be sampled.
const FALLBACK_SPREAD_M: f64 = 20_000.0;

/// Keeps normalisation finite when every raw density is equal.
const NORMALISATION_EPSILON: f64 = 1.0e-12;

const OUTER_STRIDE: usize = 3;
const INNER_STRIDE: usize = 7;

/// Density and blended heat intensity at one point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityValue {
    /// Identifier of the point.
    pub point_id: PointId,
    /// Unnormalised kernel sum over every other point.
    pub raw: f64,
    /// `raw` rescaled to `[0, 1]` across the batch.
    pub normalized: f64,
    /// Report weight blended with normalised density.
    pub intensity: f64,
    /// Band of `intensity` against the most intense point.
    pub band: SeverityBand,
}

/// Density values in input order together with the bandwidth used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DensityField {
    /// Gaussian kernel bandwidth in metres; zero for empty input.
    pub bandwidth_m: f64,
    /// One value per input point.
    pub values: Vec<DensityValue>,
}

/// Settings for [`density_field`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityOptions {
    /// Number of leading points sampled for bandwidth estimation.
    pub sample_cap: usize,
    /// Multiplier for the raw report weight.
    pub blend_alpha: f64,
    /// Multiplier for normalised density, scaled by the batch maximum weight.
    pub blend_beta: f64,
    /// Scale each kernel by the contributing point's weight.
    pub weighted_kernel: bool,
    /// Thresholds used to band intensities.
    pub bands: BandThresholds,
}

impl Default for DensityOptions {
    fn default() -> Self {
        Self {
            sample_cap: 120,
            blend_alpha: 1.5,
            blend_beta: 0.8,
            weighted_kernel: false,
            bands: BandThresholds::default(),
        }
    }
}

/// Project a location to Web Mercator metres.
///
/// Latitudes beyond the Web Mercator limit are clamped first, so polar points
/// land on the map edge instead of at infinity.
fn project(location: LatLon) -> Coord<f64> {
    let clamped = LatLon::new(
        location
            .lat
            .clamp(-WEB_MERCATOR_MAX_LATITUDE, WEB_MERCATOR_MAX_LATITUDE),
        location.lon,
    );
    to_web_mercator_meters(clamped).unwrap_or_else(|err| {
        log::warn!("projection failed after clamping: {err}");
        Coord { x: 0.0, y: 0.0 }
    })
}

#[expect(
    clippy::float_arithmetic,
    reason = "planar distance between projected coordinates"
)]
fn planar_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Estimate the kernel bandwidth for `projected` points.
///
/// Pairs are drawn from the first `min(n, sample_cap)` points: row `i` steps
/// by three and column `j` starts after `i`, stepping by seven. The population
/// standard deviation of the sampled distances, scaled by `n^(-1/5)`, is
/// clamped to [`MIN_BANDWIDTH_M`]..=[`MAX_BANDWIDTH_M`]. With fewer than two
/// points nothing is sampled and a 20 km spread is assumed.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use hazard_analytics::{MIN_BANDWIDTH_M, estimate_bandwidth};
///
/// assert_eq!(estimate_bandwidth(&[Coord { x: 0.0, y: 0.0 }], 120), 20_000.0);
/// let tight = [Coord { x: 0.0, y: 0.0 }, Coord { x: 10.0, y: 0.0 }];
/// assert_eq!(estimate_bandwidth(&tight, 120), MIN_BANDWIDTH_M);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "bandwidth follows a power-law rule of thumb"
)]
pub fn estimate_bandwidth(projected: &[Coord<f64>], sample_cap: usize) -> f64 {
    let sampled = projected.get(..projected.len().min(sample_cap)).unwrap_or_default();
    let distances: Vec<f64> = sampled
        .iter()
        .enumerate()
        .step_by(OUTER_STRIDE)
        .flat_map(|(i, origin)| {
            sampled
                .iter()
                .skip(i.saturating_add(1))
                .step_by(INNER_STRIDE)
                .map(move |other| planar_distance(*origin, *other))
        })
        .collect();
    let spread = moments(&distances, Denominator::Population)
        .map_or(FALLBACK_SPREAD_M, |(_, std)| std);
    let n = count_as_f64(projected.len()).max(1.0);
    (spread * n.powf(-0.2)).clamp(MIN_BANDWIDTH_M, MAX_BANDWIDTH_M)
}

/// Compute the density field for `points`.
///
/// Each point's raw density sums `exp(-0.5 * (d / bw)^2)` over every other
/// point, multiplied by that point's weight when `weighted_kernel` is set.
/// Raw values are min-max normalised into `[0, 1]` and blended with report
/// weights into `intensity = weight * alpha + normalized * max_weight * beta`.
/// Empty input gives an empty field; a single point has raw and normalised
/// density zero.
///
/// # Examples
/// ```
/// use hazard_analytics::{DensityOptions, density_field};
/// use hazard_core::HazardPoint;
///
/// # fn main() -> Result<(), hazard_core::HazardPointError> {
/// let points = [
///     HazardPoint::new(1, 13.00, 80.30, 2.0)?,
///     HazardPoint::new(2, 13.05, 80.28, 2.0)?,
///     HazardPoint::new(3, 15.50, 80.00, 2.0)?,
/// ];
/// let field = density_field(&points, &DensityOptions::default());
/// assert_eq!(field.values.len(), 3);
/// assert!(field.values.iter().all(|v| (0.0..=1.0).contains(&v.normalized)));
/// # Ok(())
/// # }
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "kernel sums, normalisation and blending are floating-point"
)]
pub fn density_field(points: &[HazardPoint], options: &DensityOptions) -> DensityField {
    if points.is_empty() {
        return DensityField::default();
    }
    let projected: Vec<Coord<f64>> = points.iter().map(|p| project(p.location())).collect();
    let bandwidth_m = estimate_bandwidth(&projected, options.sample_cap);

    let raw: Vec<f64> = projected
        .iter()
        .enumerate()
        .map(|(i, origin)| {
            projected
                .iter()
                .zip(points)
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, (other, point))| {
                    let scaled = planar_distance(*origin, *other) / bandwidth_m;
                    let kernel = (-0.5 * scaled * scaled).exp();
                    if options.weighted_kernel {
                        kernel * point.weight()
                    } else {
                        kernel
                    }
                })
                .sum()
        })
        .collect();

    let (low, high) = raw
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
            (lo.min(*value), hi.max(*value))
        });
    let span = high - low + NORMALISATION_EPSILON;
    let max_weight = points.iter().map(HazardPoint::weight).fold(0.0, f64::max);

    let blended: Vec<(f64, f64, f64)> = raw
        .into_iter()
        .zip(points)
        .map(|(value, point)| {
            let normalized = ((value - low) / span).clamp(0.0, 1.0);
            let intensity =
                point.weight() * options.blend_alpha + normalized * max_weight * options.blend_beta;
            (value, normalized, intensity)
        })
        .collect();
    let max_intensity = blended
        .iter()
        .map(|(_, _, intensity)| *intensity)
        .fold(0.0, f64::max);

    let values = blended
        .into_iter()
        .zip(points)
        .map(|((raw_value, normalized, intensity), point)| DensityValue {
            point_id: point.id(),
            raw: raw_value,
            normalized,
            intensity,
            band: SeverityBand::classify(intensity, max_intensity, &options.bands),
        })
        .collect();
    DensityField {
        bandwidth_m,
        values,
    }
}

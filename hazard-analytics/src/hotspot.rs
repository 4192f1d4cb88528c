//! Local z-score hotspot statistic.
//!
//! Each point's local mean averages its own weight with the weights of its
//! neighbourhood, and the z-score compares that mean with the global mean in
//! units of the global sample standard deviation. This approximates a
//! Getis-Ord Gi* statistic without a full spatial weights matrix; it is not
//! the exact Gi* formula.

use hazard_core::{BandThresholds, HazardPoint, NeighbourIndex, PointId, SeverityBand};
use serde::Serialize;

use crate::NeighbourhoodRule;
use crate::stats::{Denominator, count_as_f64, moments};

/// Thresholds a point must meet to be flagged as a hotspot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Significance {
    /// Minimum z-score.
    pub z_threshold: f64,
    /// Minimum report weight.
    pub min_weight: f64,
}

impl Default for Significance {
    fn default() -> Self {
        Self {
            z_threshold: 1.5,
            min_weight: 6.0,
        }
    }
}

impl Significance {
    /// Report whether a score with `z_score` and `weight` is significant.
    #[must_use]
    pub const fn admits(&self, z_score: f64, weight: f64) -> bool {
        z_score >= self.z_threshold && weight >= self.min_weight
    }
}

/// Hotspot statistic for one point.
///
/// Fields are read-only: `is_significant` is derived once from the
/// thresholds passed to [`HotspotScore::new`] and always agrees with them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HotspotScore {
    point_id: PointId,
    weight: f64,
    local_mean: f64,
    z_score: f64,
    is_significant: bool,
    band: SeverityBand,
}

impl HotspotScore {
    /// Build a score, deriving significance from `significance`.
    #[must_use]
    pub fn new(
        point_id: PointId,
        weight: f64,
        local_mean: f64,
        z_score: f64,
        band: SeverityBand,
        significance: &Significance,
    ) -> Self {
        Self {
            point_id,
            weight,
            local_mean,
            z_score,
            is_significant: significance.admits(z_score, weight),
            band,
        }
    }

    /// Identifier of the scored point.
    #[must_use]
    pub const fn point_id(&self) -> PointId {
        self.point_id
    }

    /// Report weight of the scored point.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Mean weight of the point and its neighbourhood.
    #[must_use]
    pub const fn local_mean(&self) -> f64 {
        self.local_mean
    }

    /// Standardised local mean.
    #[must_use]
    pub const fn z_score(&self) -> f64 {
        self.z_score
    }

    /// Whether the point passed both significance thresholds.
    #[must_use]
    pub const fn is_significant(&self) -> bool {
        self.is_significant
    }

    /// Band of the point weight against the heaviest point.
    #[must_use]
    pub const fn band(&self) -> SeverityBand {
        self.band
    }
}

/// Score every point in `points`, in input order.
///
/// With [`NeighbourhoodRule::KNearest`] each point averages with its `k`
/// nearest others (fewer when the batch is smaller); with
/// [`NeighbourhoodRule::WithinRadius`] it averages with every other point in
/// range. The global deviation uses an `n - 1` denominator floored at one, and
/// the z-score is zero when every weight is equal.
///
/// # Examples
/// ```
/// use hazard_analytics::{NeighbourhoodRule, Significance, hotspot_scores};
/// use hazard_core::{BandThresholds, HazardPoint};
///
/// # fn main() -> Result<(), hazard_core::HazardPointError> {
/// let points: Vec<HazardPoint> = (0_u32..10)
///     .map(|i| HazardPoint::new(u64::from(i), 19.0, 72.8 + f64::from(i) * 0.01, 5.0))
///     .collect::<Result<_, _>>()?;
/// let scores = hotspot_scores(
///     &points,
///     NeighbourhoodRule::KNearest { k: 6 },
///     &Significance::default(),
///     &BandThresholds::default(),
/// );
/// assert!(scores.iter().all(|s| s.z_score() == 0.0 && !s.is_significant()));
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn hotspot_scores(
    points: &[HazardPoint],
    rule: NeighbourhoodRule,
    significance: &Significance,
    bands: &BandThresholds,
) -> Vec<HotspotScore> {
    let index = NeighbourIndex::from_points(points);
    hotspot_scores_indexed(points, &index, rule, significance, bands)
}

/// Score points against a prebuilt index over the same slice.
#[expect(
    clippy::float_arithmetic,
    reason = "local means and z-scores are floating-point statistics"
)]
pub(crate) fn hotspot_scores_indexed(
    points: &[HazardPoint],
    index: &NeighbourIndex,
    rule: NeighbourhoodRule,
    significance: &Significance,
    bands: &BandThresholds,
) -> Vec<HotspotScore> {
    let weights: Vec<f64> = points.iter().map(HazardPoint::weight).collect();
    let Some((global_mean, global_std)) = moments(&weights, Denominator::Sample) else {
        return Vec::new();
    };
    let spread = usable_spread(&weights, global_mean, global_std);
    let max_weight = weights.iter().copied().fold(0.0, f64::max);

    points
        .iter()
        .enumerate()
        .map(|(idx, point)| {
            let neighbours = neighbourhood(index, idx, rule);
            let neighbour_sum: f64 = neighbours
                .iter()
                .filter_map(|&n| weights.get(n))
                .sum();
            let members = count_as_f64(neighbours.len()) + 1.0;
            let local_mean = (point.weight() + neighbour_sum) / members;
            let z_score = spread.map_or(0.0, |std| (local_mean - global_mean) / std);
            HotspotScore::new(
                point.id(),
                point.weight(),
                local_mean,
                z_score,
                SeverityBand::classify(point.weight(), max_weight, bands),
                significance,
            )
        })
        .collect()
}

/// Global deviation to standardise against, or `None` when the weights are
/// uniform.
///
/// Summation rounding leaves a residual deviation for equal weights that are
/// not exact binary fractions, so anything within a few ulps of the mean
/// counts as no spread.
#[expect(
    clippy::float_arithmetic,
    reason = "the rounding tolerance scales with the mean and batch size"
)]
fn usable_spread(weights: &[f64], mean: f64, std: f64) -> Option<f64> {
    let first = weights.first()?;
    let uniform = weights.iter().all(|weight| weight.total_cmp(first).is_eq());
    let tolerance = f64::EPSILON * mean.abs().max(1.0) * count_as_f64(weights.len());
    (!uniform && std > tolerance).then_some(std)
}

fn neighbourhood(index: &NeighbourIndex, idx: usize, rule: NeighbourhoodRule) -> Vec<usize> {
    match rule {
        NeighbourhoodRule::KNearest { k } => index.nearest(idx, k),
        NeighbourhoodRule::WithinRadius { radius_km } => index
            .within_km(idx, radius_km)
            .into_iter()
            .filter(|&n| n != idx)
            .collect(),
    }
}

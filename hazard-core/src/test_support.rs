//! Deterministic synthetic hazard data for tests, benchmarks and demos.
//!
//! Every generator takes an explicit seed and builds its own `ChaCha8Rng`, so
//! there is no shared random state and repeated calls return identical points.
//! Gated behind the `test-support` feature (and `cfg(test)`).

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::{HazardPoint, LatLon, PointId};

/// Seed used by the bundled coastal scenario when callers have no preference.
pub const DEFAULT_SEED: u64 = 42;

/// Standard deviation, in degrees, of points around each coastal centre.
const GROUP_SPREAD_DEG: f64 = 0.45;

/// Share of coastal groups drawn from the high-risk weight range.
const HIGH_RISK_PROBABILITY: f64 = 0.25;

/// Multiplier separating per-group seed streams.
const GROUP_SEED_STRIDE: u64 = 9973;

/// Monitoring centres along the western and eastern Indian coastline.
pub const COASTAL_CENTRES: [LatLon; 20] = [
    LatLon::new(23.5, 68.5),
    LatLon::new(20.0, 72.8),
    LatLon::new(13.0, 74.8),
    LatLon::new(10.0, 76.2),
    LatLon::new(8.4, 77.0),
    LatLon::new(12.8, 80.3),
    LatLon::new(15.5, 80.0),
    LatLon::new(17.7, 83.3),
    LatLon::new(19.8, 85.8),
    LatLon::new(21.6, 87.5),
    LatLon::new(22.2, 88.1),
    LatLon::new(15.0, 73.8),
    LatLon::new(9.3, 79.0),
    LatLon::new(16.7, 82.2),
    LatLon::new(18.5, 84.0),
    LatLon::new(11.0, 75.8),
    LatLon::new(21.0, 69.1),
    LatLon::new(20.7, 70.9),
    LatLon::new(22.0, 72.5),
    LatLon::new(22.6, 88.3),
];

/// Construct a [`HazardPoint`] from literal fixture values.
///
/// # Panics
/// Panics when the values fail [`HazardPoint::new`] validation; fixtures are
/// expected to be valid by construction.
///
/// # Examples
/// ```rust
/// use hazard_core::test_support::point;
///
/// let p = point(1, 19.5, 72.76, 3.0);
/// assert_eq!(p.weight(), 3.0);
/// ```
#[must_use]
pub fn point(id: PointId, lat: f64, lon: f64, weight: f64) -> HazardPoint {
    HazardPoint::new(id, lat, lon, weight)
        .unwrap_or_else(|err| panic!("fixture point {id} is invalid: {err}"))
}

/// Generate the seeded coastal hazard scenario.
///
/// Each of the [`COASTAL_CENTRES`] receives 10 to 20 normally scattered
/// reports. A quarter of the groups are high risk with a base weight in
/// `12..=24`; the rest draw from `1..=11`. Each report varies the group base
/// by up to three in either direction, floored at one. Identifiers run from 1
/// in generation order.
///
/// # Examples
/// ```rust
/// use hazard_core::test_support::{DEFAULT_SEED, coastal_scenario};
///
/// let points = coastal_scenario(DEFAULT_SEED);
/// assert!(points.len() >= 200 && points.len() <= 400);
/// assert_eq!(points, coastal_scenario(DEFAULT_SEED));
/// ```
#[must_use]
pub fn coastal_scenario(seed: u64) -> Vec<HazardPoint> {
    let mut points = Vec::new();
    let mut next_id: PointId = 1;
    for (group, centre) in (0_u64..).zip(COASTAL_CENTRES) {
        let group_seed = seed ^ group.wrapping_add(1).wrapping_mul(GROUP_SEED_STRIDE);
        let mut rng = ChaCha8Rng::seed_from_u64(group_seed);
        let count = rng.gen_range(10_usize..=20);
        let base: i32 = if rng.gen_bool(HIGH_RISK_PROBABILITY) {
            rng.gen_range(12..=24)
        } else {
            rng.gen_range(1..=11)
        };
        for location in scatter(&mut rng, centre, GROUP_SPREAD_DEG, count) {
            let variation: i32 = rng.gen_range(-3..=3);
            let weight = f64::from(base.saturating_add(variation).max(1));
            if let Ok(hazard) = HazardPoint::new(next_id, location.lat, location.lon, weight) {
                points.push(hazard);
                next_id = next_id.saturating_add(1);
            }
        }
    }
    points
}

/// Scatter `count` equally weighted points around `centre`.
///
/// Offsets follow a normal distribution with standard deviation `spread_deg`
/// on each axis. Identifiers run from 1.
///
/// # Examples
/// ```rust
/// use hazard_core::LatLon;
/// use hazard_core::test_support::scatter_points;
///
/// let points = scatter_points(25, LatLon::new(13.0, 80.3), 0.05, 2.0, 7);
/// assert_eq!(points.len(), 25);
/// assert!(points.iter().all(|p| p.weight() == 2.0));
/// ```
#[must_use]
pub fn scatter_points(
    count: usize,
    centre: LatLon,
    spread_deg: f64,
    weight: f64,
    seed: u64,
) -> Vec<HazardPoint> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (1..)
        .zip(scatter(&mut rng, centre, spread_deg, count))
        .filter_map(|(id, location)| HazardPoint::new(id, location.lat, location.lon, weight).ok())
        .collect()
}

#[expect(
    clippy::float_arithmetic,
    reason = "offsets are added to the centre coordinates"
)]
fn scatter(rng: &mut ChaCha8Rng, centre: LatLon, spread_deg: f64, count: usize) -> Vec<LatLon> {
    let Ok(normal) = Normal::new(0.0, spread_deg.abs()) else {
        return vec![centre; count];
    };
    (0..count)
        .map(|_| {
            let lat = (centre.lat + normal.sample(rng)).clamp(-89.0, 89.0);
            let lon = (centre.lon + normal.sample(rng)).clamp(-180.0, 180.0);
            LatLon::new(lat, lon)
        })
        .collect()
}

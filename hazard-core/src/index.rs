//! R\*-tree neighbour lookups over great-circle distance.
//!
//! Points are stored as unit-sphere vectors. Chord length is monotonic in
//! great-circle distance, so the tree narrows candidates in three dimensions
//! and every candidate is confirmed with [`haversine_km`]. Results match an
//! all-pairs scan, including on the antimeridian and near the poles.

use std::cmp::Ordering;

use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::geodesy::{chord_squared_for_km, haversine_km, unit_vector};
use crate::{HazardPoint, LatLon};

/// Relative slack applied to chord radii before exact confirmation.
const CHORD_SLACK: f64 = 1.0e-9;

type IndexedPosition = GeomWithData<[f64; 3], usize>;

/// Spatial index over a fixed slice of hazard point positions.
///
/// Indices returned by the queries refer to positions in the slice the index
/// was built from.
///
/// # Examples
/// ```
/// use hazard_core::{HazardPoint, NeighbourIndex};
///
/// # fn main() -> Result<(), hazard_core::HazardPointError> {
/// let points = [
///     HazardPoint::new(1, 19.50, 72.76, 1.0)?,
///     HazardPoint::new(2, 19.27, 72.79, 1.0)?,
///     HazardPoint::new(3, 28.60, 77.20, 1.0)?,
/// ];
/// let index = NeighbourIndex::from_points(&points);
/// assert_eq!(index.within_km(0, 60.0), vec![0, 1]);
/// assert_eq!(index.nearest(2, 1), vec![0]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NeighbourIndex {
    locations: Vec<LatLon>,
    tree: RTree<IndexedPosition>,
}

impl NeighbourIndex {
    /// Build an index over the locations of `points`.
    #[must_use]
    pub fn from_points(points: &[HazardPoint]) -> Self {
        Self::from_locations(points.iter().map(HazardPoint::location).collect())
    }

    /// Build an index over raw locations.
    #[must_use]
    pub fn from_locations(locations: Vec<LatLon>) -> Self {
        let entries = locations
            .iter()
            .enumerate()
            .map(|(idx, location)| IndexedPosition::new(unit_vector(*location), idx))
            .collect();
        Self {
            locations,
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Report whether the index holds no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// All positions within `radius_km` of position `idx`, itself included.
    ///
    /// The result is sorted by ascending index. An out-of-range `idx` yields
    /// an empty result.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "query radius is widened by a relative tolerance"
    )]
    pub fn within_km(&self, idx: usize, radius_km: f64) -> Vec<usize> {
        let Some(origin) = self.locations.get(idx).copied() else {
            return Vec::new();
        };
        let chord2 = chord_squared_for_km(radius_km);
        let search = chord2 * (1.0 + CHORD_SLACK) + CHORD_SLACK;
        let mut hits: Vec<usize> = self
            .tree
            .locate_within_distance(unit_vector(origin), search)
            .map(|entry| entry.data)
            .filter(|candidate| {
                self.locations
                    .get(*candidate)
                    .is_some_and(|location| haversine_km(origin, *location) <= radius_km)
            })
            .collect();
        hits.sort_unstable();
        hits
    }

    /// The `k` nearest other positions to position `idx`.
    ///
    /// Neighbours are ordered by ascending great-circle distance, ties broken
    /// by ascending index. The query position itself is never returned, while
    /// coincident positions are. `k` is capped at `len() - 1`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "tie tolerance on squared chord distances"
    )]
    pub fn nearest(&self, idx: usize, k: usize) -> Vec<usize> {
        let Some(origin) = self.locations.get(idx).copied() else {
            return Vec::new();
        };
        let wanted = k.min(self.len().saturating_sub(1));
        if wanted == 0 {
            return Vec::new();
        }

        let mut candidates: Vec<usize> = Vec::with_capacity(wanted);
        let mut cutoff: Option<f64> = None;
        for (entry, chord2) in self
            .tree
            .nearest_neighbor_iter_with_distance_2(&unit_vector(origin))
        {
            if entry.data == idx {
                continue;
            }
            if let Some(limit) = cutoff {
                if chord2 > limit {
                    break;
                }
            }
            candidates.push(entry.data);
            if cutoff.is_none() && candidates.len() == wanted {
                // Keep collecting near-ties so the exact ordering below can
                // settle them by distance and index.
                cutoff = Some(chord2 * (1.0 + CHORD_SLACK) + CHORD_SLACK);
            }
        }

        let mut ranked: Vec<(f64, usize)> = candidates
            .into_iter()
            .filter_map(|candidate| {
                self.locations
                    .get(candidate)
                    .map(|location| (haversine_km(origin, *location), candidate))
            })
            .collect();
        ranked.sort_by(|a, b| compare_ranked(*a, *b));
        ranked.truncate(wanted);
        ranked.into_iter().map(|(_, candidate)| candidate).collect()
    }
}

fn compare_ranked(a: (f64, usize), b: (f64, usize)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

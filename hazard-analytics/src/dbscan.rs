//! Density-based clustering (DBSCAN) over great-circle distance.
//!
//! Points are visited in input order and each cluster grows from a LIFO
//! frontier. A border point reachable from several clusters stays with the
//! cluster that reached it first. Textbook DBSCAN leaves that choice open;
//! here it is fixed so repeated runs agree.

use std::fmt;

use hazard_core::{BandThresholds, HazardPoint, NeighbourIndex, PointId, SeverityBand};
use serde::{Deserialize, Serialize};

use crate::ParameterError;

/// Dense cluster identifier assigned in discovery order from zero.
pub type ClusterId = usize;

/// Cluster membership of a single point.
///
/// Serialises as the cluster id, or `-1` for noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum ClusterLabel {
    /// Member (core or border) of the identified cluster.
    Cluster(ClusterId),
    /// Not density-reachable from any core point.
    Noise,
}

impl ClusterLabel {
    /// Cluster id, or `None` for noise.
    #[must_use]
    pub const fn cluster_id(self) -> Option<ClusterId> {
        match self {
            Self::Cluster(id) => Some(id),
            Self::Noise => None,
        }
    }

    /// Report whether the point is noise.
    #[must_use]
    pub const fn is_noise(self) -> bool {
        matches!(self, Self::Noise)
    }
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cluster(id) => write!(f, "cluster {id}"),
            Self::Noise => f.write_str("noise"),
        }
    }
}

impl From<ClusterLabel> for i64 {
    fn from(label: ClusterLabel) -> Self {
        match label {
            ClusterLabel::Cluster(id) => Self::try_from(id).unwrap_or(Self::MAX),
            ClusterLabel::Noise => -1,
        }
    }
}

impl TryFrom<i64> for ClusterLabel {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value == -1 {
            return Ok(Self::Noise);
        }
        ClusterId::try_from(value)
            .map(Self::Cluster)
            .map_err(|_| format!("cluster label {value} must be -1 or a non-negative id"))
    }
}

/// Label given to one input point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Identifier of the labelled point.
    pub point_id: PointId,
    /// Cluster membership.
    pub label: ClusterLabel,
}

/// Aggregate view of one discovered cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Dense identifier in discovery order.
    pub id: ClusterId,
    /// Member point identifiers in the order the expansion reached them.
    pub member_ids: Vec<PointId>,
    /// Number of members.
    pub size: usize,
    /// Sum of member weights.
    pub total_weight: f64,
    /// Band of `total_weight` against the heaviest cluster in the batch.
    pub band: SeverityBand,
}

/// Result of one clustering pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clustering {
    /// One entry per input point, in input order.
    pub assignments: Vec<Assignment>,
    /// Clusters in id order.
    pub clusters: Vec<Cluster>,
}

impl Clustering {
    /// Number of points labelled as noise.
    #[must_use]
    pub fn noise_count(&self) -> usize {
        self.assignments
            .iter()
            .filter(|assignment| assignment.label.is_noise())
            .count()
    }
}

/// Cluster `points` with the default severity thresholds.
///
/// # Errors
/// Returns [`ParameterError::NonPositiveEps`] when `eps_km` is not a finite
/// positive number and [`ParameterError::ZeroMinPts`] when `min_pts == 0`.
///
/// # Examples
/// ```
/// use hazard_analytics::{ClusterLabel, cluster};
/// use hazard_core::HazardPoint;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let points = [
///     HazardPoint::new(1, 19.50, 72.76, 2.0)?,
///     HazardPoint::new(2, 19.27, 72.79, 3.0)?,
///     HazardPoint::new(3, 28.60, 77.20, 1.0)?,
/// ];
/// let clustering = cluster(&points, 60.0, 2)?;
/// assert_eq!(clustering.clusters.len(), 1);
/// assert_eq!(clustering.assignments[2].label, ClusterLabel::Noise);
/// # Ok(())
/// # }
/// ```
pub fn cluster(
    points: &[HazardPoint],
    eps_km: f64,
    min_pts: usize,
) -> Result<Clustering, ParameterError> {
    cluster_with_bands(points, eps_km, min_pts, &BandThresholds::default())
}

/// Cluster `points`, banding cluster weights with `bands`.
///
/// # Errors
/// Same as [`cluster`].
pub fn cluster_with_bands(
    points: &[HazardPoint],
    eps_km: f64,
    min_pts: usize,
    bands: &BandThresholds,
) -> Result<Clustering, ParameterError> {
    if !(eps_km.is_finite() && eps_km > 0.0) {
        return Err(ParameterError::NonPositiveEps { value: eps_km });
    }
    if min_pts == 0 {
        return Err(ParameterError::ZeroMinPts);
    }

    let index = NeighbourIndex::from_points(points);
    Ok(cluster_indexed(points, &index, eps_km, min_pts, bands))
}

/// Cluster against a prebuilt index over the same slice.
///
/// Parameters are assumed to be validated.
pub(crate) fn cluster_indexed(
    points: &[HazardPoint],
    index: &NeighbourIndex,
    eps_km: f64,
    min_pts: usize,
    bands: &BandThresholds,
) -> Clustering {
    let members = expand_clusters(index, eps_km, min_pts);
    let mut labels = vec![ClusterLabel::Noise; points.len()];
    for (id, cluster_members) in members.iter().enumerate() {
        for &member in cluster_members {
            if let Some(slot) = labels.get_mut(member) {
                *slot = ClusterLabel::Cluster(id);
            }
        }
    }

    let assignments = points
        .iter()
        .zip(labels)
        .map(|(point, label)| Assignment {
            point_id: point.id(),
            label,
        })
        .collect();
    Clustering {
        assignments,
        clusters: summarise(points, &members, bands),
    }
}

/// Run the expansion and return member positions per cluster.
fn expand_clusters(index: &NeighbourIndex, eps_km: f64, min_pts: usize) -> Vec<Vec<usize>> {
    let mut visited = vec![Visit::Unseen; index.len()];
    let mut clusters: Vec<Vec<usize>> = Vec::new();

    for seed in 0..index.len() {
        if visited.get(seed) != Some(&Visit::Unseen) {
            continue;
        }
        let neighbours = index.within_km(seed, eps_km);
        if neighbours.len() < min_pts {
            mark(&mut visited, seed, Visit::Noise);
            continue;
        }

        mark(&mut visited, seed, Visit::Member);
        let mut members = vec![seed];
        let mut frontier: Vec<usize> = neighbours.into_iter().filter(|&n| n != seed).collect();

        while let Some(next) = frontier.pop() {
            match visited.get(next).copied() {
                Some(Visit::Noise) => {
                    // Border point: joins the cluster but is not expanded.
                    mark(&mut visited, next, Visit::Member);
                    members.push(next);
                }
                Some(Visit::Unseen) => {
                    mark(&mut visited, next, Visit::Member);
                    members.push(next);
                    let reach = index.within_km(next, eps_km);
                    if reach.len() >= min_pts {
                        // Earlier noise within reach of a core point becomes a border point.
                        frontier.extend(reach.into_iter().filter(|&n| {
                            matches!(visited.get(n), Some(Visit::Unseen | Visit::Noise))
                        }));
                    }
                }
                Some(Visit::Member) | None => {}
            }
        }
        clusters.push(members);
    }
    clusters
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unseen,
    Noise,
    Member,
}

fn mark(visited: &mut [Visit], idx: usize, state: Visit) {
    if let Some(slot) = visited.get_mut(idx) {
        *slot = state;
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "cluster totals sum member weights"
)]
fn summarise(points: &[HazardPoint], members: &[Vec<usize>], bands: &BandThresholds) -> Vec<Cluster> {
    let totals: Vec<(Vec<PointId>, f64)> = members
        .iter()
        .map(|positions| {
            positions
                .iter()
                .filter_map(|&pos| points.get(pos))
                .fold((Vec::with_capacity(positions.len()), 0.0), |(mut ids, total), point| {
                    ids.push(point.id());
                    (ids, total + point.weight())
                })
        })
        .collect();
    let heaviest = totals.iter().map(|(_, total)| *total).fold(0.0, f64::max);

    totals
        .into_iter()
        .enumerate()
        .map(|(id, (member_ids, total_weight))| Cluster {
            id,
            size: member_ids.len(),
            member_ids,
            total_weight,
            band: SeverityBand::classify(total_weight, heaviest, bands),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hazard_core::test_support::point;
    use rstest::{fixture, rstest};

    #[fixture]
    fn mumbai_triple() -> Vec<HazardPoint> {
        vec![
            point(1, 19.50, 72.76, 4.0),
            point(2, 19.27, 72.79, 2.0),
            point(3, 19.29, 72.91, 6.0),
        ]
    }

    fn labels(clustering: &Clustering) -> Vec<ClusterLabel> {
        clustering.assignments.iter().map(|a| a.label).collect()
    }

    #[rstest]
    fn nearby_points_share_a_cluster(mumbai_triple: Vec<HazardPoint>) {
        let clustering = cluster(&mumbai_triple, 60.0, 2).expect("valid parameters");
        assert_eq!(labels(&clustering), vec![ClusterLabel::Cluster(0); 3]);
        let only = clustering.clusters.first().expect("one cluster");
        assert_eq!(only.size, 3);
        assert_eq!(only.total_weight, 12.0);
        assert_eq!(only.band, SeverityBand::Severe);
    }

    #[rstest]
    fn isolated_point_is_noise(mut mumbai_triple: Vec<HazardPoint>) {
        mumbai_triple.push(point(4, 28.6, 77.2, 9.0));
        let clustering = cluster(&mumbai_triple, 60.0, 2).expect("valid parameters");
        assert_eq!(
            clustering.assignments.last().map(|a| a.label),
            Some(ClusterLabel::Noise)
        );
        assert_eq!(clustering.noise_count(), 1);
        assert_eq!(clustering.clusters.len(), 1);
    }

    #[rstest]
    fn members_follow_lifo_discovery(mumbai_triple: Vec<HazardPoint>) {
        let clustering = cluster(&mumbai_triple, 60.0, 2).expect("valid parameters");
        let only = clustering.clusters.first().expect("one cluster");
        assert_eq!(only.member_ids, vec![1, 3, 2]);
    }

    #[rstest]
    fn noise_seen_earlier_becomes_border() {
        // Point 1 has only one neighbour within 20 km, so it is tentatively
        // noise; point 2 is core with three neighbours and later claims it.
        let points = vec![
            point(1, 0.0, 0.0, 1.0),
            point(2, 0.0, 0.15, 1.0),
            point(3, 0.0, 0.30, 1.0),
            point(4, 0.1, 0.15, 1.0),
        ];
        let clustering = cluster(&points, 20.0, 4).expect("valid parameters");
        assert_eq!(labels(&clustering), vec![ClusterLabel::Cluster(0); 4]);
        let only = clustering.clusters.first().expect("one cluster");
        assert_eq!(only.member_ids.first(), Some(&2));
    }

    #[rstest]
    fn noise_reached_through_an_expanded_core_becomes_border() {
        // Point 1 is noise when seeded and is only within reach of point 3,
        // which turns out to be core while cluster 0 grows from point 2.
        let points = vec![
            point(1, 0.0, 0.0, 1.0),
            point(2, 0.0, 0.2, 1.0),
            point(3, 0.0, 0.1, 1.0),
            point(4, 0.0, 0.3, 1.0),
        ];
        let clustering = cluster(&points, 12.0, 3).expect("valid parameters");
        assert_eq!(labels(&clustering), vec![ClusterLabel::Cluster(0); 4]);
        assert_eq!(clustering.noise_count(), 0);
        let only = clustering.clusters.first().expect("one cluster");
        assert_eq!(only.member_ids, vec![2, 4, 3, 1]);
    }

    #[rstest]
    fn border_point_stays_with_first_cluster() {
        // Point 4 is within reach of a core point in each group but is not
        // core itself.
        let points = vec![
            point(1, 0.0, 0.00, 1.0),
            point(2, 0.0, 0.05, 1.0),
            point(3, 0.0, 0.10, 1.0),
            point(4, 0.0, 0.25, 1.0),
            point(5, 0.0, 0.40, 1.0),
            point(6, 0.0, 0.45, 1.0),
            point(7, 0.0, 0.50, 1.0),
        ];
        let clustering = cluster(&points, 17.0, 4).expect("valid parameters");
        let mut expected = vec![ClusterLabel::Cluster(0); 4];
        expected.extend([ClusterLabel::Cluster(1); 3]);
        assert_eq!(labels(&clustering), expected);
        let first = clustering.clusters.first().expect("first cluster");
        assert_eq!(first.member_ids, vec![3, 4, 2, 1]);
    }

    #[rstest]
    fn min_pts_one_leaves_no_noise() {
        let points = vec![point(1, 10.0, 70.0, 1.0), point(2, -30.0, 150.0, 1.0)];
        let clustering = cluster(&points, 1.0, 1).expect("valid parameters");
        assert_eq!(clustering.noise_count(), 0);
        assert_eq!(clustering.clusters.len(), 2);
    }

    #[rstest]
    fn empty_input_gives_empty_clustering() {
        let clustering = cluster(&[], 35.0, 3).expect("valid parameters");
        assert_eq!(clustering, Clustering::default());
    }

    #[rstest]
    #[case(0.0, 3, ParameterError::NonPositiveEps { value: 0.0 })]
    #[case(-1.0, 3, ParameterError::NonPositiveEps { value: -1.0 })]
    #[case(35.0, 0, ParameterError::ZeroMinPts)]
    fn rejects_invalid_parameters(
        mumbai_triple: Vec<HazardPoint>,
        #[case] eps_km: f64,
        #[case] min_pts: usize,
        #[case] expected: ParameterError,
    ) {
        assert_eq!(cluster(&mumbai_triple, eps_km, min_pts), Err(expected));
    }

    #[rstest]
    fn labels_serialise_as_integers() {
        let json = serde_json::to_string(&[ClusterLabel::Cluster(2), ClusterLabel::Noise])
            .expect("serialise labels");
        assert_eq!(json, "[2,-1]");
        let back: Vec<ClusterLabel> = serde_json::from_str(&json).expect("parse labels");
        assert_eq!(back, vec![ClusterLabel::Cluster(2), ClusterLabel::Noise]);
        assert!(serde_json::from_str::<ClusterLabel>("-2").is_err());
    }
}

//! Convex hull footprints for clusters.
//!
//! Longitude and latitude are treated as planar `x` and `y`. Coastal clusters
//! span tens of kilometres, where the distortion is negligible, so this is a
//! documented approximation rather than a geodesic hull.

use geo::{Coord, LineString, Polygon};
use hazard_core::{HazardPoint, LatLon};
use serde::{Deserialize, Serialize};

use crate::{ClusterId, Clustering};

/// Footprint of a cluster with at least two members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hull {
    /// Cluster the hull outlines.
    pub cluster_id: ClusterId,
    /// Closed counter-clockwise ring; the first vertex is repeated last.
    pub ring: Vec<LatLon>,
}

impl Hull {
    /// Convert the ring into a `geo` polygon with `x = lon`, `y = lat`.
    #[must_use]
    pub fn to_polygon(&self) -> Polygon<f64> {
        let exterior: LineString<f64> = self.ring.iter().copied().map(Coord::from).collect();
        Polygon::new(exterior, Vec::new())
    }
}

/// Convex hull of `locations` as a closed counter-clockwise ring.
///
/// Uses Andrew's monotone chain. Repeated coordinates collapse to one vertex.
/// Collinear input yields the degenerate ring `[a, b, a]` between the two
/// extreme points and fully coincident input yields `[a, a]`; empty input
/// yields an empty ring.
///
/// # Examples
/// ```
/// use hazard_analytics::convex_hull;
/// use hazard_core::LatLon;
///
/// let ring = convex_hull(&[
///     LatLon::new(0.0, 0.0),
///     LatLon::new(0.0, 1.0),
///     LatLon::new(1.0, 1.0),
///     LatLon::new(0.4, 0.5),
/// ]);
/// assert_eq!(ring.len(), 4);
/// assert_eq!(ring.first(), ring.last());
/// ```
#[must_use]
pub fn convex_hull(locations: &[LatLon]) -> Vec<LatLon> {
    let mut sorted: Vec<Coord<f64>> = locations.iter().copied().map(Coord::from).collect();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup();

    let Some(&first) = sorted.first() else {
        return Vec::new();
    };
    if sorted.len() == 1 {
        return vec![first.into(), first.into()];
    }

    let lower = half_chain(sorted.iter().copied());
    let upper = half_chain(sorted.iter().rev().copied());

    // Each chain ends on the other's first vertex.
    let mut ring: Vec<LatLon> = lower
        .iter()
        .take(lower.len().saturating_sub(1))
        .chain(upper.iter().take(upper.len().saturating_sub(1)))
        .copied()
        .map(LatLon::from)
        .collect();
    ring.push(first.into());
    ring
}

fn half_chain(ordered: impl Iterator<Item = Coord<f64>>) -> Vec<Coord<f64>> {
    let mut chain: Vec<Coord<f64>> = Vec::new();
    for coord in ordered {
        while let [.., a, b] = chain.as_slice() {
            if cross(*a, *b, coord) > 0.0 {
                break;
            }
            chain.pop();
        }
        chain.push(coord);
    }
    chain
}

#[expect(
    clippy::float_arithmetic,
    reason = "orientation test is a 2D cross product"
)]
fn cross(o: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Hulls for every cluster with at least two members, in cluster id order.
///
/// Single-member clusters have no hull; render the point itself instead.
/// `points` must be the slice that produced `clustering`.
#[must_use]
pub fn build_hulls(points: &[HazardPoint], clustering: &Clustering) -> Vec<Hull> {
    let mut members: Vec<Vec<LatLon>> = vec![Vec::new(); clustering.clusters.len()];
    for (point, assignment) in points.iter().zip(&clustering.assignments) {
        if let Some(bucket) = assignment
            .label
            .cluster_id()
            .and_then(|id| members.get_mut(id))
        {
            bucket.push(point.location());
        }
    }
    members
        .into_iter()
        .enumerate()
        .filter(|(_, locations)| locations.len() >= 2)
        .map(|(cluster_id, locations)| Hull {
            cluster_id,
            ring: convex_hull(&locations),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster;
    use geo::{Area, Contains, Intersects, Point};
    use hazard_core::test_support::{point, scatter_points};
    use rstest::rstest;

    #[rstest]
    fn square_with_interior_point_is_ccw_and_closed() {
        let ring = convex_hull(&[
            LatLon::new(1.0, 1.0),
            LatLon::new(0.5, 0.5),
            LatLon::new(0.0, 0.0),
            LatLon::new(1.0, 0.0),
            LatLon::new(0.0, 1.0),
        ]);
        assert_eq!(
            ring,
            vec![
                LatLon::new(0.0, 0.0),
                LatLon::new(0.0, 1.0),
                LatLon::new(1.0, 1.0),
                LatLon::new(1.0, 0.0),
                LatLon::new(0.0, 0.0),
            ]
        );
        let polygon = Hull { cluster_id: 0, ring }.to_polygon();
        assert!(polygon.signed_area() > 0.0);
    }

    #[rstest]
    fn two_points_form_a_line_ring() {
        let a = LatLon::new(19.0, 72.80);
        let b = LatLon::new(19.0, 72.81);
        assert_eq!(convex_hull(&[b, a]), vec![a, b, a]);
    }

    #[rstest]
    fn collinear_points_keep_only_extremes() {
        let ring = convex_hull(&[
            LatLon::new(0.0, 0.0),
            LatLon::new(1.0, 1.0),
            LatLon::new(2.0, 2.0),
            LatLon::new(3.0, 3.0),
        ]);
        assert_eq!(
            ring,
            vec![LatLon::new(0.0, 0.0), LatLon::new(3.0, 3.0), LatLon::new(0.0, 0.0)]
        );
    }

    #[rstest]
    fn coincident_points_collapse() {
        let a = LatLon::new(8.4, 77.0);
        assert_eq!(convex_hull(&[a, a, a]), vec![a, a]);
        assert!(convex_hull(&[]).is_empty());
    }

    #[rstest]
    fn build_hulls_skips_singletons_and_noise() {
        let points = vec![
            point(1, 19.50, 72.76, 1.0),
            point(2, 19.27, 72.79, 1.0),
            point(3, 19.29, 72.91, 1.0),
            point(4, 28.60, 77.20, 1.0),
        ];
        let clustering = cluster(&points, 60.0, 1).expect("valid parameters");
        assert_eq!(clustering.clusters.len(), 2);
        let hulls = build_hulls(&points, &clustering);
        assert_eq!(hulls.len(), 1);
        let hull = hulls.first().expect("one hull");
        assert_eq!(hull.cluster_id, 0);
        assert_eq!(hull.ring.len(), 4);
    }

    #[rstest]
    fn members_lie_on_or_inside_their_hull() {
        let points = scatter_points(60, LatLon::new(13.0, 80.3), 0.2, 1.0, 5);
        let locations: Vec<LatLon> = points.iter().map(HazardPoint::location).collect();
        let polygon = Hull {
            cluster_id: 0,
            ring: convex_hull(&locations),
        }
        .to_polygon();
        for location in locations {
            let candidate = Point::from(Coord::from(location));
            assert!(polygon.contains(&candidate) || polygon.exterior().intersects(&candidate));
        }
    }
}

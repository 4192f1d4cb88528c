#![expect(
    clippy::expect_used,
    reason = "property tests use expect for readable failures"
)]

//! Property-based tests for the analysis pipeline.
//!
//! # Invariants tested
//!
//! - **Total assignment:** every point receives exactly one label and cluster
//!   ids are dense from zero.
//! - **No noise at `min_pts = 1`:** every point is its own core point.
//! - **Hull containment:** members lie on or inside their cluster's hull.
//! - **Density bounds:** normalised density stays within `[0, 1]`.
//! - **Hotspot consistency:** significance always matches the thresholds.
//! - **Determinism:** repeated runs produce identical output.

use std::collections::BTreeSet;

use geo::{Contains, Coord, Intersects, Point};
use hazard_analytics::{AnalysisParams, ClusterLabel, analyze, cluster};
use hazard_core::{HazardPoint, LatLon};
use proptest::prelude::*;

/// Points scattered over a small coastal window so clusters actually form.
fn coastal_points(max_len: usize) -> impl Strategy<Value = Vec<HazardPoint>> {
    prop::collection::vec((12.0_f64..14.0, 79.5_f64..81.5, 0.0_f64..25.0), 0..max_len).prop_map(
        |raw| {
            (1..)
                .zip(raw)
                .filter_map(|(id, (lat, lon, weight))| HazardPoint::new(id, lat, lon, weight).ok())
                .collect()
        },
    )
}

fn on_or_inside(polygon: &geo::Polygon<f64>, location: LatLon) -> bool {
    let candidate = Point::from(Coord::from(location));
    polygon.contains(&candidate) || polygon.exterior().intersects(&candidate)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: every point is labelled once and cluster ids have no gaps.
    #[test]
    fn assignment_is_total_and_dense(
        points in coastal_points(60),
        eps_km in 1.0_f64..80.0,
        min_pts in 1_usize..6,
    ) {
        let clustering = cluster(&points, eps_km, min_pts).expect("valid parameters");
        prop_assert_eq!(clustering.assignments.len(), points.len());
        for (assignment, point) in clustering.assignments.iter().zip(&points) {
            prop_assert_eq!(assignment.point_id, point.id());
        }
        let used: BTreeSet<usize> = clustering
            .assignments
            .iter()
            .filter_map(|a| a.label.cluster_id())
            .collect();
        let expected: BTreeSet<usize> = (0..clustering.clusters.len()).collect();
        prop_assert_eq!(used, expected);
        let members: usize = clustering.clusters.iter().map(|c| c.size).sum();
        prop_assert_eq!(members + clustering.noise_count(), points.len());
    }

    /// Property: with `min_pts = 1` nothing is noise.
    #[test]
    fn min_pts_one_never_yields_noise(points in coastal_points(60), eps_km in 0.5_f64..50.0) {
        let clustering = cluster(&points, eps_km, 1).expect("valid parameters");
        prop_assert!(clustering.assignments.iter().all(|a| a.label != ClusterLabel::Noise));
    }

    /// Property: every member lies on or inside its cluster hull.
    #[test]
    fn members_are_contained_by_hulls(points in coastal_points(60)) {
        let params = AnalysisParams {
            eps_km: 40.0,
            min_pts: 2,
            ..AnalysisParams::default()
        };
        let analysis = analyze(&points, &params).expect("valid parameters");
        for hull in &analysis.hulls {
            let polygon = hull.to_polygon();
            let cluster = analysis
                .clusters
                .get(hull.cluster_id)
                .expect("hull refers to a cluster");
            for id in &cluster.member_ids {
                let member = points.iter().find(|p| p.id() == *id).expect("member exists");
                prop_assert!(
                    on_or_inside(&polygon, member.location()),
                    "point {} escapes hull of cluster {}",
                    id,
                    hull.cluster_id
                );
            }
        }
    }

    /// Property: normalised density is bounded and follows input order.
    #[test]
    fn density_is_normalised(points in coastal_points(80), weighted in any::<bool>()) {
        let params = AnalysisParams {
            weighted_kernel: weighted,
            ..AnalysisParams::heat_only()
        };
        let analysis = analyze(&points, &params).expect("valid parameters");
        prop_assert_eq!(analysis.density.values.len(), points.len());
        for (value, point) in analysis.density.values.iter().zip(&points) {
            prop_assert_eq!(value.point_id, point.id());
            prop_assert!((0.0..=1.0).contains(&value.normalized));
            prop_assert!(value.raw >= 0.0);
        }
    }

    /// Property: significance is exactly the conjunction of both thresholds.
    #[test]
    fn hotspot_flags_match_thresholds(
        points in coastal_points(60),
        z_threshold in -1.0_f64..3.0,
        min_weight in 0.0_f64..20.0,
    ) {
        let params = AnalysisParams {
            z_threshold,
            min_weight_threshold: min_weight,
            ..AnalysisParams::default()
        };
        let analysis = analyze(&points, &params).expect("valid parameters");
        for score in &analysis.hotspots {
            prop_assert_eq!(
                score.is_significant(),
                score.z_score() >= z_threshold && score.weight() >= min_weight
            );
        }
    }

    /// Property: identical input produces identical output.
    #[test]
    fn analysis_is_deterministic(points in coastal_points(50)) {
        let params = AnalysisParams::default();
        let first = analyze(&points, &params).expect("valid parameters");
        let second = analyze(&points, &params).expect("valid parameters");
        prop_assert_eq!(first, second);
    }
}

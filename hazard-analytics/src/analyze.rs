//! The batch analysis pipeline.

use hazard_core::{HazardPoint, NeighbourIndex};
use log::debug;
use serde::Serialize;

use crate::dbscan::cluster_indexed;
use crate::hotspot::hotspot_scores_indexed;
use crate::stats::count_as_f64;
use crate::{
    AnalysisParams, Assignment, Cluster, Clustering, DensityField, DensityOptions, HotspotScore,
    Hull, ParameterError, Significance, build_hulls, density_field,
};

/// Batch-level counts and weight statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    /// Number of input points.
    pub num_points: usize,
    /// Number of clusters discovered.
    pub num_clusters: usize,
    /// Number of points labelled as noise.
    pub num_noise: usize,
    /// Number of significant hotspots.
    pub num_hotspots: usize,
    /// Mean point weight; zero for empty input.
    pub mean_weight: f64,
    /// Largest point weight; zero for empty input.
    pub max_weight: f64,
}

/// Everything derived from one batch of points.
///
/// Per-point collections follow input order. Stages disabled in
/// [`AnalysisParams::stages`] leave their collections empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Analysis {
    /// Cluster label per point.
    pub assignments: Vec<Assignment>,
    /// Discovered clusters in id order.
    pub clusters: Vec<Cluster>,
    /// Footprints of clusters with two or more members.
    pub hulls: Vec<Hull>,
    /// Density field for heat maps.
    pub density: DensityField,
    /// Hotspot statistic per point.
    pub hotspots: Vec<HotspotScore>,
    /// Batch statistics.
    pub summary: Summary,
}

/// Run every enabled stage over `points`.
///
/// Parameters are validated before any work starts. Density and hotspot
/// scoring do not depend on clustering; with the `parallel` feature they run
/// alongside it on the rayon pool and produce identical output.
///
/// # Errors
/// Returns [`ParameterError`] when `params` fails
/// [`AnalysisParams::validate`]. No partial result is produced.
///
/// # Examples
/// ```
/// use hazard_analytics::{AnalysisParams, analyze};
///
/// let analysis = analyze(&[], &AnalysisParams::default()).expect("valid parameters");
/// assert!(analysis.assignments.is_empty());
/// assert!(analysis.density.values.is_empty());
/// assert_eq!(analysis.summary.num_points, 0);
/// ```
pub fn analyze(points: &[HazardPoint], params: &AnalysisParams) -> Result<Analysis, ParameterError> {
    params.validate()?;
    debug!(
        "analysing {} points (eps {} km, min_pts {}, stages {:?})",
        points.len(),
        params.eps_km,
        params.min_pts,
        params.stages
    );
    let index = NeighbourIndex::from_points(points);

    let ((clustering, hulls), (density, hotspots)) = run_stages(
        || clustering_stage(points, &index, params),
        || density_stage(points, params),
        || hotspot_stage(points, &index, params),
    );

    let summary = summarise(points, &clustering, &hotspots);
    debug!(
        "analysis complete: {} clusters, {} noise, {} hotspots",
        summary.num_clusters, summary.num_noise, summary.num_hotspots
    );
    Ok(Analysis {
        assignments: clustering.assignments,
        clusters: clustering.clusters,
        hulls,
        density,
        hotspots,
        summary,
    })
}

#[cfg(feature = "parallel")]
fn run_stages<C, D, H, FC, FD, FH>(clustering: FC, density: FD, hotspots: FH) -> (C, (D, H))
where
    FC: FnOnce() -> C + Send,
    FD: FnOnce() -> D + Send,
    FH: FnOnce() -> H + Send,
    C: Send,
    D: Send,
    H: Send,
{
    rayon::join(clustering, || rayon::join(density, hotspots))
}

#[cfg(not(feature = "parallel"))]
fn run_stages<C, D, H, FC, FD, FH>(clustering: FC, density: FD, hotspots: FH) -> (C, (D, H))
where
    FC: FnOnce() -> C,
    FD: FnOnce() -> D,
    FH: FnOnce() -> H,
{
    (clustering(), (density(), hotspots()))
}

fn clustering_stage(
    points: &[HazardPoint],
    index: &NeighbourIndex,
    params: &AnalysisParams,
) -> (Clustering, Vec<Hull>) {
    if !params.stages.clustering {
        return (Clustering::default(), Vec::new());
    }
    let clustering = cluster_indexed(points, index, params.eps_km, params.min_pts, &params.bands);
    let hulls = build_hulls(points, &clustering);
    debug!(
        "clustering: {} clusters, {} hulls",
        clustering.clusters.len(),
        hulls.len()
    );
    (clustering, hulls)
}

fn density_stage(points: &[HazardPoint], params: &AnalysisParams) -> DensityField {
    if !params.stages.density {
        return DensityField::default();
    }
    let field = density_field(
        points,
        &DensityOptions {
            sample_cap: params.kde_sample_cap,
            blend_alpha: params.blend_alpha,
            blend_beta: params.blend_beta,
            weighted_kernel: params.weighted_kernel,
            bands: params.bands,
        },
    );
    debug!(
        "density: {} values, bandwidth {:.0} m",
        field.values.len(),
        field.bandwidth_m
    );
    field
}

fn hotspot_stage(
    points: &[HazardPoint],
    index: &NeighbourIndex,
    params: &AnalysisParams,
) -> Vec<HotspotScore> {
    if !params.stages.hotspots {
        return Vec::new();
    }
    let significance = Significance {
        z_threshold: params.z_threshold,
        min_weight: params.min_weight_threshold,
    };
    let scores =
        hotspot_scores_indexed(points, index, params.neighbourhood, &significance, &params.bands);
    debug!(
        "hotspots: {} scored with {:?}",
        scores.len(),
        params.neighbourhood
    );
    scores
}

#[expect(
    clippy::float_arithmetic,
    reason = "mean weight divides the weight sum by the point count"
)]
fn summarise(points: &[HazardPoint], clustering: &Clustering, hotspots: &[HotspotScore]) -> Summary {
    let total: f64 = points.iter().map(HazardPoint::weight).sum();
    let mean_weight = if points.is_empty() {
        0.0
    } else {
        total / count_as_f64(points.len())
    };
    Summary {
        num_points: points.len(),
        num_clusters: clustering.clusters.len(),
        num_noise: clustering.noise_count(),
        num_hotspots: hotspots.iter().filter(|s| s.is_significant()).count(),
        mean_weight,
        max_weight: points.iter().map(HazardPoint::weight).fold(0.0, f64::max),
    }
}

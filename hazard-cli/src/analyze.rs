//! Analyze command implementation for the hazard CLI.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use hazard_analytics::{Analysis, AnalysisParams, NeighbourhoodRule, analyze};
use hazard_core::{HazardPoint, PointId};
use log::{debug, info};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::{file_is_file, open_utf8_file, write_utf8_file};
use crate::{
    ARG_BLEND_ALPHA, ARG_BLEND_BETA, ARG_EPS_KM, ARG_HEAT_ONLY, ARG_K_NEIGHBOURS,
    ARG_KDE_SAMPLE_CAP, ARG_MIN_PTS, ARG_MIN_WEIGHT, ARG_OUTPUT, ARG_POINTS, ARG_RADIUS_KM,
    ARG_WEIGHTED_KERNEL, ARG_Z_THRESHOLD, CliError, ENV_POINTS,
};

/// CLI arguments for the `analyze` subcommand.
///
/// Every parameter left unset falls back to the coastal profile of
/// [`AnalysisParams::default`].
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "analyze",
    long_about = "Run clustering, density estimation and hotspot scoring over \
                 a JSON array of hazard reports. Parameters can come from CLI \
                 flags, configuration files, or HAZARD_* environment \
                 variables; the analysis is printed as JSON.",
    about = "Analyse a batch of hazard reports"
)]
#[ortho_config(prefix = "HAZARD")]
pub(crate) struct AnalyzeArgs {
    /// Path to a JSON array of `{ id, lat, lon, weight }` records.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) points: Option<Utf8PathBuf>,
    /// Write the analysis here instead of standard output.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// DBSCAN neighbourhood radius in kilometres.
    #[arg(long = ARG_EPS_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) eps_km: Option<f64>,
    /// Minimum neighbourhood size for a core point.
    #[arg(long = ARG_MIN_PTS, value_name = "count")]
    #[serde(default)]
    pub(crate) min_pts: Option<usize>,
    /// Score hotspots over the k nearest neighbours.
    #[arg(long = ARG_K_NEIGHBOURS, value_name = "count")]
    #[serde(default)]
    pub(crate) k_neighbours: Option<usize>,
    /// Score hotspots over every neighbour within this radius.
    #[arg(long = ARG_RADIUS_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) radius_km: Option<f64>,
    /// Minimum z-score for a significant hotspot.
    #[arg(long = ARG_Z_THRESHOLD, value_name = "z", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) z_threshold: Option<f64>,
    /// Minimum report weight for a significant hotspot.
    #[arg(long = ARG_MIN_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) min_weight: Option<f64>,
    /// Points sampled for KDE bandwidth estimation.
    #[arg(long = ARG_KDE_SAMPLE_CAP, value_name = "count")]
    #[serde(default)]
    pub(crate) kde_sample_cap: Option<usize>,
    /// Heat intensity multiplier for the report weight.
    #[arg(long = ARG_BLEND_ALPHA, value_name = "factor")]
    #[serde(default)]
    pub(crate) blend_alpha: Option<f64>,
    /// Heat intensity multiplier for the normalised density.
    #[arg(long = ARG_BLEND_BETA, value_name = "factor")]
    #[serde(default)]
    pub(crate) blend_beta: Option<f64>,
    /// Scale each density kernel by the neighbour's weight.
    #[arg(
        long = ARG_WEIGHTED_KERNEL,
        value_name = "bool",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) weighted_kernel: Option<bool>,
    /// Only compute the density field.
    #[arg(
        long = ARG_HEAT_ONLY,
        value_name = "bool",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) heat_only: Option<bool>,
}

impl AnalyzeArgs {
    pub(crate) fn into_config(self) -> Result<AnalyzeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AnalyzeConfig::try_from(merged)
    }
}

/// Resolved `analyze` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AnalyzeConfig {
    /// Path to the JSON points file.
    pub(crate) points: Utf8PathBuf,
    /// Optional destination file; standard output when absent.
    pub(crate) output: Option<Utf8PathBuf>,
    /// Validated analysis parameters.
    pub(crate) params: AnalysisParams,
}

impl AnalyzeConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        let path = &self.points;
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field: ARG_POINTS,
                path: path.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field: ARG_POINTS,
                    path: path.clone(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_POINTS,
                path: path.clone(),
                source,
            }),
        }
    }
}

impl TryFrom<AnalyzeArgs> for AnalyzeConfig {
    type Error = CliError;

    fn try_from(args: AnalyzeArgs) -> Result<Self, Self::Error> {
        let points = args.points.ok_or(CliError::MissingArgument {
            field: ARG_POINTS,
            env: ENV_POINTS,
        })?;

        let base = if args.heat_only.unwrap_or(false) {
            AnalysisParams::heat_only()
        } else {
            AnalysisParams::default()
        };
        let neighbourhood = match (args.k_neighbours, args.radius_km) {
            (Some(_), Some(_)) => {
                return Err(CliError::ConflictingOptions {
                    first: ARG_K_NEIGHBOURS,
                    second: ARG_RADIUS_KM,
                });
            }
            (Some(k), None) => NeighbourhoodRule::KNearest { k },
            (None, Some(radius_km)) => NeighbourhoodRule::WithinRadius { radius_km },
            (None, None) => base.neighbourhood,
        };
        let params = AnalysisParams {
            eps_km: args.eps_km.unwrap_or(base.eps_km),
            min_pts: args.min_pts.unwrap_or(base.min_pts),
            neighbourhood,
            z_threshold: args.z_threshold.unwrap_or(base.z_threshold),
            min_weight_threshold: args.min_weight.unwrap_or(base.min_weight_threshold),
            kde_sample_cap: args.kde_sample_cap.unwrap_or(base.kde_sample_cap),
            blend_alpha: args.blend_alpha.unwrap_or(base.blend_alpha),
            blend_beta: args.blend_beta.unwrap_or(base.blend_beta),
            weighted_kernel: args.weighted_kernel.unwrap_or(base.weighted_kernel),
            ..base
        };
        params.validate()?;

        Ok(Self {
            points,
            output: args.output,
            params,
        })
    }
}

/// One report as it appears in the points file, before validation.
#[derive(Debug, Clone, Copy, Deserialize)]
struct PointRecord {
    id: PointId,
    lat: f64,
    lon: f64,
    weight: f64,
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_analyze_with(args, &mut stdout)
}

pub(crate) fn run_analyze_with(args: AnalyzeArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_analyze_config(args)?;
    let points = load_points(&config.points)?;
    let analysis = analyze(&points, &config.params)?;
    info!(
        "analysed {} reports from {}: {} clusters, {} hotspots",
        analysis.summary.num_points,
        config.points,
        analysis.summary.num_clusters,
        analysis.summary.num_hotspots
    );
    write_analysis(writer, config.output.as_deref(), &analysis)
}

fn resolve_analyze_config(args: AnalyzeArgs) -> Result<AnalyzeConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    debug!("resolved analyze configuration: {config:?}");
    Ok(config)
}

/// Loads and validates hazard reports from a JSON array on disk.
///
/// The first record that fails [`HazardPoint::new`] aborts loading.
pub(crate) fn load_points(path: &Utf8Path) -> Result<Vec<HazardPoint>, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenPoints {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<PointRecord> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            CliError::ParsePoints {
                path: path.to_path_buf(),
                source,
            }
        })?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            HazardPoint::new(record.id, record.lat, record.lon, record.weight).map_err(|source| {
                CliError::InvalidPoint {
                    path: path.to_path_buf(),
                    index,
                    source,
                }
            })
        })
        .collect()
}

fn write_analysis(
    writer: &mut dyn Write,
    output: Option<&Utf8Path>,
    analysis: &Analysis,
) -> Result<(), CliError> {
    let mut payload =
        serde_json::to_string_pretty(analysis).map_err(CliError::SerialiseAnalysis)?;
    payload.push('\n');
    match output {
        Some(path) => {
            write_utf8_file(path, payload.as_bytes()).map_err(|source| {
                CliError::WriteOutputFile {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            debug!("wrote analysis to {path}");
            Ok(())
        }
        None => writer
            .write_all(payload.as_bytes())
            .map_err(CliError::WriteOutput),
    }
}


//! Command-line interface for running batch hazard analyses.
//!
//! The `analyze` subcommand reads a JSON array of hazard reports, layers the
//! analysis parameters from CLI flags, `HAZARD_*` environment variables and
//! configuration files, and prints the resulting analysis as JSON.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod analyze;
mod error;
mod fs;

pub use error::CliError;

use analyze::{AnalyzeArgs, run_analyze};

pub(crate) const ARG_POINTS: &str = "points";
pub(crate) const ENV_POINTS: &str = "HAZARD_CMDS_ANALYZE_POINTS";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_EPS_KM: &str = "eps-km";
pub(crate) const ARG_MIN_PTS: &str = "min-pts";
pub(crate) const ARG_K_NEIGHBOURS: &str = "k-neighbours";
pub(crate) const ARG_RADIUS_KM: &str = "radius-km";
pub(crate) const ARG_Z_THRESHOLD: &str = "z-threshold";
pub(crate) const ARG_MIN_WEIGHT: &str = "min-weight";
pub(crate) const ARG_KDE_SAMPLE_CAP: &str = "kde-sample-cap";
pub(crate) const ARG_BLEND_ALPHA: &str = "blend-alpha";
pub(crate) const ARG_BLEND_BETA: &str = "blend-beta";
pub(crate) const ARG_WEIGHTED_KERNEL: &str = "weighted-kernel";
pub(crate) const ARG_HEAT_ONLY: &str = "heat-only";

/// Run the hazard CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration layering, input
/// loading, validation or output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Analyze(args) => run_analyze(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "hazard",
    about = "Spatial analysis of geotagged coastal hazard reports",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Cluster, map and score a batch of hazard reports.
    Analyze(AnalyzeArgs),
}

#[cfg(test)]
mod tests;

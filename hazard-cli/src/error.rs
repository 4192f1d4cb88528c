//! Error types emitted by the hazard CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use hazard_analytics::ParameterError;
use hazard_core::HazardPointError;
use thiserror::Error;

/// Errors emitted by the hazard CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// Two options that select the same setting were both given.
    #[error("--{first} and --{second} cannot be used together")]
    ConflictingOptions {
        /// First option supplied.
        first: &'static str,
        /// Second option supplied.
        second: &'static str,
    },
    /// The merged analysis parameters failed validation.
    #[error("invalid analysis parameters: {0}")]
    InvalidParameters(#[from] ParameterError),
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Option that named the path.
        field: &'static str,
        /// Missing path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Option that named the path.
        field: &'static str,
        /// Path being inspected.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening the points file failed.
    #[error("failed to open points file at {path:?}: {source}")]
    OpenPoints {
        /// Points file path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The points file is not a JSON array of report records.
    #[error("failed to parse points JSON at {path:?}: {source}")]
    ParsePoints {
        /// Points file path.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// A record decoded but failed point validation.
    #[error("record {index} in {path:?} is not a valid hazard point: {source}")]
    InvalidPoint {
        /// Points file path.
        path: Utf8PathBuf,
        /// Zero-based position of the record in the array.
        index: usize,
        /// Validation failure.
        #[source]
        source: HazardPointError,
    },
    /// Serialising the analysis failed.
    #[error("failed to serialise analysis: {0}")]
    SerialiseAnalysis(#[source] serde_json::Error),
    /// Writing the analysis to standard output failed.
    #[error("failed to write analysis output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Writing the analysis to the `--output` file failed.
    #[error("failed to write analysis to {path:?}: {source}")]
    WriteOutputFile {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
}

//! Error types emitted by the Kidspot CLI.

use std::sync::Arc;

use kidspot_core::FiltersError;
use kidspot_data::DemoSourceError;
use kidspot_data::places::ClientBuildError;
use thiserror::Error;

/// Errors emitted by the Kidspot CLI.
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
        /// Flag name without leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// The search centre is not a finite coordinate.
    #[error("search centre ({lat}, {lng}) is not a finite coordinate")]
    InvalidCenter {
        /// Requested latitude.
        lat: f64,
        /// Requested longitude.
        lng: f64,
    },
    /// The search preferences were rejected.
    #[error(transparent)]
    InvalidFilters(#[from] FiltersError),
    /// Loading the demo fixture failed.
    #[error(transparent)]
    LoadPlaces(#[from] DemoSourceError),
    /// Constructing the Google Places client failed.
    #[error("failed to build places client: {0}")]
    BuildClient(#[from] ClientBuildError),
    /// Starting the async runtime failed.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// A newer refresh replaced this one before it finished.
    #[error("refresh {sequence} was superseded")]
    Superseded {
        /// Sequence token of the discarded refresh.
        sequence: u64,
    },
    /// Serializing the ranked places failed.
    #[error("failed to serialize ranked places: {0}")]
    SerializeRanking(#[source] serde_json::Error),
    /// Writing the ranked places failed.
    #[error("failed to write ranked places: {0}")]
    WriteOutput(#[source] std::io::Error),
}

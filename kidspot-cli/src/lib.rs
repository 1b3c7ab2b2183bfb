//! Command-line interface for ranking kid-friendly venues.
//!
//! `kidspot rank` loads venues from a demo fixture or the Google Places web
//! service, scores them against the caller's preferences and prints the
//! ranked list as JSON.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod rank;

pub use error::CliError;
use rank::{RankArgs, run_rank};

const ARG_PLACES: &str = "places";
const ARG_LAT: &str = "lat";
const ARG_LNG: &str = "lng";
const ARG_RADIUS_KM: &str = "radius-km";
const ARG_AGE: &str = "age";
const ARG_KEYWORD: &str = "keyword";
const ARG_API_KEY: &str = "api-key";
const ARG_DEMO: &str = "demo";
const ARG_LIMIT: &str = "limit";
const ENV_PLACES: &str = "KIDSPOT_CMDS_RANK_PLACES";
const ENV_LAT: &str = "KIDSPOT_CMDS_RANK_LAT";
const ENV_LNG: &str = "KIDSPOT_CMDS_RANK_LNG";

/// Run the Kidspot CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, the
/// venue fixture cannot be read, or the output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Rank(args) => run_rank(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "kidspot",
    about = "Rank kid-friendly venues around a point",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score and rank venues, printing the result as JSON.
    Rank(RankArgs),
}

#[cfg(test)]
mod tests;

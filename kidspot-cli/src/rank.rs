//! Rank command implementation for the Kidspot CLI.

use std::io::Write;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use camino::Utf8PathBuf;
use clap::Parser;
use geo::Coord;
use kidspot_core::geometry::finite_coord;
use kidspot_core::{AgePreference, DEFAULT_RADIUS_KM, EpochMillis, Filters, RankedPlace};
use kidspot_data::{
    DemoPlaceSource, GooglePlacesClient, GooglePlacesConfig, PlaceRefresher, PlaceSource,
    RefreshConfig, RefreshRequest, RefreshStatus, ResultOrigin,
};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_AGE, ARG_API_KEY, ARG_DEMO, ARG_KEYWORD, ARG_LAT, ARG_LIMIT, ARG_LNG, ARG_PLACES,
    ARG_RADIUS_KM, CliError, ENV_LAT, ENV_LNG, ENV_PLACES,
};

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score venues for families and print them best first. Venues \
                 come from the Google Places web service when an API key is \
                 configured, and from a JSON demo fixture otherwise or when \
                 the live search fails.",
    about = "Rank kid-friendly venues around a point"
)]
#[ortho_config(prefix = "KIDSPOT")]
pub(crate) struct RankArgs {
    /// Path to a JSON array of demo places.
    #[arg(long = ARG_PLACES, value_name = "path")]
    #[serde(default)]
    pub(crate) places: Option<Utf8PathBuf>,
    /// Latitude of the search centre.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the search centre.
    #[arg(long = ARG_LNG, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// Search radius in kilometres.
    #[arg(long = ARG_RADIUS_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) radius_km: Option<f64>,
    /// Children's age band: 0-5, 5+ or all.
    #[arg(long = ARG_AGE, value_name = "band")]
    #[serde(default)]
    pub(crate) age: Option<AgePreference>,
    /// Free-text search, e.g. "pizzaria".
    #[arg(long = ARG_KEYWORD, value_name = "text")]
    #[serde(default)]
    pub(crate) keyword: Option<String>,
    /// Google Places API key.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Use demo data even when an API key is configured.
    #[arg(
        long = ARG_DEMO,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) demo: Option<bool>,
    /// Print at most this many places.
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

impl RankArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

/// Resolved `rank` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RankConfig {
    /// Demo fixture path.
    pub(crate) places: Option<Utf8PathBuf>,
    /// Search centre; the refresher default when absent.
    pub(crate) center: Option<Coord<f64>>,
    pub(crate) filters: Filters,
    pub(crate) keyword: Option<String>,
    /// Non-blank API key.
    pub(crate) api_key: Option<String>,
    pub(crate) demo: bool,
    pub(crate) limit: Option<usize>,
}

impl RankConfig {
    const fn uses_live_search(&self) -> bool {
        self.api_key.is_some() && !self.demo
    }

    fn request(&self, now: EpochMillis) -> RefreshRequest {
        let mut request = RefreshRequest::new(now)
            .with_radius_m(search_radius_m(&self.filters))
            .with_filters(self.filters.clone());
        request.center = self.center;
        request.keyword.clone_from(&self.keyword);
        request
    }
}

impl TryFrom<RankArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: RankArgs) -> Result<Self, Self::Error> {
        let api_key = args.api_key.filter(|key| !key.trim().is_empty());
        let demo = args.demo.unwrap_or(false);
        if args.places.is_none() && (api_key.is_none() || demo) {
            return Err(CliError::MissingArgument {
                field: ARG_PLACES,
                env: ENV_PLACES,
            });
        }

        let center = resolve_center(args.lat, args.lng)?;
        let filters = Filters::new(args.radius_km.unwrap_or(DEFAULT_RADIUS_KM))?
            .with_age(args.age.unwrap_or_default());
        let keyword = args
            .keyword
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());

        Ok(Self {
            places: args.places,
            center,
            filters,
            keyword,
            api_key,
            demo,
            limit: args.limit,
        })
    }
}

fn resolve_center(lat: Option<f64>, lng: Option<f64>) -> Result<Option<Coord<f64>>, CliError> {
    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(_), None) => Err(CliError::MissingArgument {
            field: ARG_LNG,
            env: ENV_LNG,
        }),
        (None, Some(_)) => Err(CliError::MissingArgument {
            field: ARG_LAT,
            env: ENV_LAT,
        }),
        (Some(lat_deg), Some(lng_deg)) => finite_coord(Coord {
            x: lng_deg,
            y: lat_deg,
        })
        .map(Some)
        .ok_or(CliError::InvalidCenter {
            lat: lat_deg,
            lng: lng_deg,
        }),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "validated radius is rounded to whole metres"
)]
fn search_radius_m(filters: &Filters) -> u32 {
    filters.radius_m().round().min(f64::from(u32::MAX)) as u32
}

fn now_millis() -> EpochMillis {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            EpochMillis::try_from(elapsed.as_millis()).unwrap_or(EpochMillis::MAX)
        })
}

/// Assemble the refresher for a resolved configuration.
pub(super) fn build_refresher(config: &RankConfig) -> Result<PlaceRefresher, CliError> {
    let demo = config
        .places
        .as_deref()
        .map(DemoPlaceSource::load)
        .transpose()?
        .unwrap_or_default();
    let refresher = PlaceRefresher::new(demo)
        .with_config(RefreshConfig::default().with_demo_mode(config.demo));
    let Some(api_key) = config.api_key.as_deref().filter(|_| config.uses_live_search()) else {
        return Ok(refresher);
    };
    let client = Arc::new(GooglePlacesClient::new(GooglePlacesConfig::with_api_key(
        api_key,
    ))?);
    let live: Arc<dyn PlaceSource> = client.clone();
    Ok(refresher
        .with_live_source(live)
        .with_details_provider(client))
}

pub(super) fn run_rank(args: RankArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_rank_with(args, &mut stdout)
}

pub(super) fn run_rank_with(args: RankArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let ranked = execute_rank(&config, now_millis())?;
    write_ranked(writer, &ranked)
}

/// Refresh once and return the ranked places, truncated to the limit.
pub(super) fn execute_rank(
    config: &RankConfig,
    now: EpochMillis,
) -> Result<Vec<RankedPlace>, CliError> {
    let refresher = build_refresher(config)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let outcome = match runtime.block_on(refresher.refresh(config.request(now))) {
        RefreshStatus::Applied(outcome) => outcome,
        RefreshStatus::Superseded { sequence } => return Err(CliError::Superseded { sequence }),
    };

    match outcome.origin {
        ResultOrigin::Live => log::info!("ranked {} live places", outcome.places.len()),
        ResultOrigin::Demo => log::info!("ranked {} demo places", outcome.places.len()),
        ResultOrigin::Fallback => {
            log::warn!("live search failed; ranked {} demo places", outcome.places.len());
        }
    }

    let limit = config.limit.unwrap_or(usize::MAX);
    Ok(outcome.places.iter().take(limit).cloned().collect())
}

fn write_ranked(writer: &mut dyn Write, places: &[RankedPlace]) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(places).map_err(CliError::SerializeRanking)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RankConfig, CliError> {
    let merged = RankArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RankConfig::try_from(merged)
}

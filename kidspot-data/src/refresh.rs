//! Request-sequenced refresh of the current ranked result set.
//!
//! Each call to [`PlaceRefresher::refresh`] takes a new sequence token,
//! fetches venues (live, or demo data when live search is unavailable or
//! fails), merges duplicates, enriches the leading results, scores and ranks
//! them, and installs the ranked list only if no newer refresh has started
//! in the meantime. Late responses from superseded refreshes are discarded.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use geo::Coord;
use kidspot_core::geometry::finite_coord;
use kidspot_core::{
    EpochMillis, Filters, HeuristicScorer, Place, PlaceScorer, RankedPlace, rank_places_with,
};
use tokio::sync::Mutex;

use crate::demo::DemoPlaceSource;
use crate::enrich::{EnrichLimits, enrich_places};
use crate::location::FALLBACK_LOCATION;
use crate::places::{DetailsProvider, PlaceSource, PlacesError, SearchQuery};

/// Radius used when a request does not name one.
pub const DEFAULT_RADIUS_M: u32 = 4_000;

/// Smallest radius ever searched.
pub const MIN_RADIUS_M: u32 = 500;

/// Successive radius multipliers tried until a search returns venues.
pub const DEFAULT_RADIUS_MULTIPLIERS: [f64; 3] = [1.0, 1.6, 2.3];

/// Tuning for [`PlaceRefresher`].
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshConfig {
    /// Radius used when a request does not name one.
    pub default_radius_m: u32,
    /// Lower bound applied to every requested radius.
    pub min_radius_m: u32,
    /// Multipliers applied to the base radius, tried in order.
    pub radius_multipliers: Vec<f64>,
    /// Detail lookup bounds.
    pub enrich: EnrichLimits,
    /// Serve demo data even when a live source is present.
    pub demo_mode: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            default_radius_m: DEFAULT_RADIUS_M,
            min_radius_m: MIN_RADIUS_M,
            radius_multipliers: DEFAULT_RADIUS_MULTIPLIERS.to_vec(),
            enrich: EnrichLimits::default(),
            demo_mode: false,
        }
    }
}

impl RefreshConfig {
    /// Force demo data.
    #[must_use]
    pub const fn with_demo_mode(mut self, demo_mode: bool) -> Self {
        self.demo_mode = demo_mode;
        self
    }

    /// Radii to try for a request, in order.
    ///
    /// The base radius is `requested` (or the default) raised to the
    /// minimum; each multiplier scales it, rounding to whole metres.
    ///
    /// # Examples
    /// ```
    /// use kidspot_data::refresh::RefreshConfig;
    ///
    /// let config = RefreshConfig::default();
    /// assert_eq!(config.candidate_radii(None), [4_000, 6_400, 9_200]);
    /// assert_eq!(config.candidate_radii(Some(100)), [500, 800, 1_150]);
    /// ```
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "radii are scaled then rounded to whole metres"
    )]
    pub fn candidate_radii(&self, requested: Option<u32>) -> Vec<u32> {
        let base = requested
            .unwrap_or(self.default_radius_m)
            .max(self.min_radius_m);
        self.radius_multipliers
            .iter()
            .filter(|multiplier| multiplier.is_finite() && **multiplier > 0.0)
            .map(|multiplier| (f64::from(base) * multiplier).round())
            .filter(|radius| *radius >= 1.0 && *radius <= f64::from(u32::MAX))
            .map(|radius| radius as u32)
            .collect()
    }
}

/// Inputs of one refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshRequest {
    /// Search centre; the refresher default is used when absent or
    /// non-finite.
    pub center: Option<Coord<f64>>,
    /// Free-text search; blank means nearby search.
    pub keyword: Option<String>,
    /// Requested radius in metres.
    pub radius_m: Option<u32>,
    /// Caller preferences used for scoring.
    pub filters: Filters,
    /// Clock used for review recency.
    pub now: EpochMillis,
}

impl RefreshRequest {
    /// A nearby search around the default centre at time `now`.
    #[must_use]
    pub fn new(now: EpochMillis) -> Self {
        Self {
            center: None,
            keyword: None,
            radius_m: None,
            filters: Filters::default(),
            now,
        }
    }

    /// Search around `center`.
    #[must_use]
    pub const fn with_center(mut self, center: Coord<f64>) -> Self {
        self.center = Some(center);
        self
    }

    /// Search for `keyword`.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Search within `radius_m` metres.
    #[must_use]
    pub const fn with_radius_m(mut self, radius_m: u32) -> Self {
        self.radius_m = Some(radius_m);
        self
    }

    /// Score with `filters`.
    #[must_use]
    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    fn trimmed_keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
    }
}

/// Where a result set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultOrigin {
    /// The live place source.
    Live,
    /// Demo data, because demo mode is on or no live source exists.
    Demo,
    /// Demo data, after the live source failed.
    Fallback,
}

/// A ranked result set and the refresh that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshOutcome {
    /// Sequence token of the producing refresh.
    pub sequence: u64,
    /// Source of the venues.
    pub origin: ResultOrigin,
    /// Centre the venues were ranked around.
    pub center: Coord<f64>,
    /// Ranked, visible venues.
    pub places: Vec<RankedPlace>,
}

/// Result of a refresh call.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshStatus {
    /// The refresh was the latest and its results are now current.
    Applied(Arc<RefreshOutcome>),
    /// A newer refresh started first; these results were discarded.
    Superseded {
        /// Sequence token of the discarded refresh.
        sequence: u64,
    },
}

impl RefreshStatus {
    /// Installed outcome, if any.
    #[must_use]
    pub const fn applied(&self) -> Option<&Arc<RefreshOutcome>> {
        match self {
            Self::Applied(outcome) => Some(outcome),
            Self::Superseded { .. } => None,
        }
    }
}

/// Owner of the current ranked result set.
///
/// # Examples
/// ```
/// use kidspot_core::Place;
/// use kidspot_data::demo::DemoPlaceSource;
/// use kidspot_data::refresh::{PlaceRefresher, RefreshRequest, ResultOrigin};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let demo = DemoPlaceSource::new(vec![
///     Place::new("p1", "Parque Kids").with_categories(["amusement_park"]),
///     Place::new("h1", "Hotel Central").with_categories(["lodging"]),
/// ]);
/// let refresher = PlaceRefresher::new(demo);
/// let status = refresher.refresh(RefreshRequest::new(0)).await;
/// let outcome = status.applied().unwrap();
/// assert_eq!(outcome.origin, ResultOrigin::Demo);
/// assert_eq!(outcome.places.len(), 1);
/// # });
/// ```
pub struct PlaceRefresher {
    live: Option<Arc<dyn PlaceSource>>,
    details: Option<Arc<dyn DetailsProvider>>,
    demo: DemoPlaceSource,
    scorer: Arc<dyn PlaceScorer>,
    config: RefreshConfig,
    default_center: Coord<f64>,
    sequence: AtomicU64,
    current: Mutex<Option<Arc<RefreshOutcome>>>,
}

impl std::fmt::Debug for PlaceRefresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceRefresher")
            .field("live", &self.live.is_some())
            .field("details", &self.details.is_some())
            .field("demo_places", &self.demo.places().len())
            .field("config", &self.config)
            .field("default_center", &self.default_center)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

impl PlaceRefresher {
    /// Serve `demo` data only, with default settings.
    #[must_use]
    pub fn new(demo: DemoPlaceSource) -> Self {
        Self {
            live: None,
            details: None,
            demo,
            scorer: Arc::new(HeuristicScorer::default()),
            config: RefreshConfig::default(),
            default_center: FALLBACK_LOCATION,
            sequence: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    /// Search `source` before falling back to demo data.
    #[must_use]
    pub fn with_live_source(mut self, source: Arc<dyn PlaceSource>) -> Self {
        self.live = Some(source);
        self
    }

    /// Backfill reviews from `provider`.
    #[must_use]
    pub fn with_details_provider(mut self, provider: Arc<dyn DetailsProvider>) -> Self {
        self.details = Some(provider);
        self
    }

    /// Score with `scorer` instead of the built-in heuristic.
    #[must_use]
    pub fn with_scorer(mut self, scorer: Arc<dyn PlaceScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Replace the tuning.
    #[must_use]
    pub fn with_config(mut self, config: RefreshConfig) -> Self {
        self.config = config;
        self
    }

    /// Centre used when a request carries none.
    #[must_use]
    pub const fn with_default_center(mut self, center: Coord<f64>) -> Self {
        self.default_center = center;
        self
    }

    /// Most recently installed result set.
    pub async fn current(&self) -> Option<Arc<RefreshOutcome>> {
        self.current.lock().await.clone()
    }

    /// Run one refresh and install its results unless superseded.
    ///
    /// Never fails: live search errors fall back to demo data.
    pub async fn refresh(&self, request: RefreshRequest) -> RefreshStatus {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        let center = request
            .center
            .and_then(finite_coord)
            .unwrap_or(self.default_center);
        let keyword = request.trimmed_keyword();
        let radii = self.config.candidate_radii(request.radius_m);

        let (fetched, origin) = match self.live.as_deref() {
            Some(live) if !self.config.demo_mode => {
                match self.fetch_live(live, center, keyword, &radii).await {
                    Ok(places) => (places, ResultOrigin::Live),
                    Err(err) => {
                        log::warn!("failed to refresh places; loading demo data: {err}");
                        (self.demo.select(keyword, Some(center), &radii), ResultOrigin::Fallback)
                    }
                }
            }
            _ => (self.demo.select(keyword, Some(center), &radii), ResultOrigin::Demo),
        };

        let mut places = dedupe_by_id(fetched);
        if let Some(details) = self
            .details
            .as_deref()
            .filter(|_| origin == ResultOrigin::Live)
        {
            enrich_places(details, &mut places, self.config.enrich).await;
        }

        let ranked = rank_places_with(
            self.scorer.as_ref(),
            places,
            &request.filters,
            Some(center),
            request.now,
        );
        let outcome = Arc::new(RefreshOutcome {
            sequence,
            origin,
            center,
            places: ranked,
        });
        self.install(outcome).await
    }

    async fn fetch_live(
        &self,
        live: &dyn PlaceSource,
        center: Coord<f64>,
        keyword: Option<&str>,
        radii: &[u32],
    ) -> Result<Vec<Place>, PlacesError> {
        let mut found = Vec::new();
        for radius in radii {
            let base = SearchQuery::new(center, *radius)?;
            let query = match keyword {
                Some(text) => base.with_keyword(text),
                None => base,
            };
            found = live.search(&query).await?;
            if !found.is_empty() {
                log::debug!("found {} places within {radius} m", found.len());
                break;
            }
        }
        Ok(found)
    }

    async fn install(&self, outcome: Arc<RefreshOutcome>) -> RefreshStatus {
        let mut current = self.current.lock().await;
        if self.sequence.load(Ordering::SeqCst) != outcome.sequence {
            log::debug!("discarding superseded refresh {}", outcome.sequence);
            return RefreshStatus::Superseded {
                sequence: outcome.sequence,
            };
        }
        *current = Some(Arc::clone(&outcome));
        RefreshStatus::Applied(outcome)
    }
}

/// Merge records sharing an id: the last record wins, the first position is
/// kept.
fn dedupe_by_id(places: Vec<Place>) -> Vec<Place> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<Place> = Vec::with_capacity(places.len());
    for place in places {
        if let Some(slot) = positions.get(&place.id).and_then(|&at| merged.get_mut(at)) {
            *slot = place;
        } else {
            positions.insert(place.id.clone(), merged.len());
            merged.push(place);
        }
    }
    merged
}

//! Deterministic doubles for the fetch layer.
//!
//! These stubs answer from memory, record what they were asked and can be
//! told to fail or stall, so refresh behaviour can be exercised without a
//! network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use kidspot_core::Place;

use crate::location::{LocationError, LocationProvider};
use crate::places::{DetailsProvider, PlaceDetails, PlaceSource, PlacesError, SearchQuery};

/// Stub [`PlaceSource`] returning a fixed venue list.
///
/// # Example
///
/// ```
/// use geo::Coord;
/// use kidspot_core::Place;
/// use kidspot_data::places::{PlaceSource, SearchQuery};
/// use kidspot_data::test_support::StubPlaceSource;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let source = StubPlaceSource::with_places(vec![Place::new("p1", "Cafe")]);
/// let query = SearchQuery::new(Coord { x: 0.0, y: 0.0 }, 1_000).unwrap();
/// assert_eq!(source.search(&query).await.unwrap().len(), 1);
/// assert_eq!(source.requested_radii(), [1_000]);
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct StubPlaceSource {
    places: Vec<Place>,
    error: Option<PlacesError>,
    min_radius_m: u32,
    delays: HashMap<String, Duration>,
    calls: Arc<Mutex<Vec<SearchQuery>>>,
}

impl StubPlaceSource {
    /// Answer every search with `places`.
    #[must_use]
    pub fn with_places(places: Vec<Place>) -> Self {
        Self {
            places,
            ..Self::default()
        }
    }

    /// Fail every search with `error`.
    #[must_use]
    pub fn failing(error: PlacesError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Return nothing for searches narrower than `radius_m`.
    #[must_use]
    pub const fn with_min_radius(mut self, radius_m: u32) -> Self {
        self.min_radius_m = radius_m;
        self
    }

    /// Stall searches for `keyword` by `delay` before answering.
    #[must_use]
    pub fn with_delay_for(mut self, keyword: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(keyword.into(), delay);
        self
    }

    /// Queries received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<SearchQuery> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Radii of the queries received so far.
    #[must_use]
    pub fn requested_radii(&self) -> Vec<u32> {
        self.requests().iter().map(SearchQuery::radius_m).collect()
    }
}

#[async_trait]
impl PlaceSource for StubPlaceSource {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Place>, PlacesError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());
        if let Some(delay) = query.keyword().and_then(|k| self.delays.get(k)) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        if query.radius_m() < self.min_radius_m {
            return Ok(Vec::new());
        }
        Ok(self.places.clone())
    }
}

/// Stub [`DetailsProvider`] answering from a per-id table.
#[derive(Debug, Clone, Default)]
pub struct StubDetailsProvider {
    details: HashMap<String, Result<PlaceDetails, PlacesError>>,
    fallback: Option<PlaceDetails>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubDetailsProvider {
    /// Answer lookups for `place_id` with `details`.
    #[must_use]
    pub fn with_details(mut self, place_id: impl Into<String>, details: PlaceDetails) -> Self {
        self.details.insert(place_id.into(), Ok(details));
        self
    }

    /// Fail lookups for `place_id` with `error`.
    #[must_use]
    pub fn with_error(mut self, place_id: impl Into<String>, error: PlacesError) -> Self {
        self.details.insert(place_id.into(), Err(error));
        self
    }

    /// Answer lookups for unknown ids with `details` instead of `None`.
    #[must_use]
    pub fn with_fallback(mut self, details: PlaceDetails) -> Self {
        self.fallback = Some(details);
        self
    }

    /// Ids looked up so far, in order.
    #[must_use]
    pub fn requested(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl DetailsProvider for StubDetailsProvider {
    async fn details(&self, place_id: &str) -> Result<Option<PlaceDetails>, PlacesError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(place_id.to_owned());
        match self.details.get(place_id) {
            Some(Ok(details)) => Ok(Some(details.clone())),
            Some(Err(error)) => Err(error.clone()),
            None => Ok(self.fallback.clone()),
        }
    }
}

/// Stub [`LocationProvider`] with a scripted answer and optional delay.
#[derive(Debug, Clone)]
pub struct StubLocationProvider {
    answer: Result<Coord<f64>, LocationError>,
    delay: Option<Duration>,
}

impl StubLocationProvider {
    /// Report `position`.
    #[must_use]
    pub const fn at(position: Coord<f64>) -> Self {
        Self {
            answer: Ok(position),
            delay: None,
        }
    }

    /// Fail with `error`.
    #[must_use]
    pub const fn failing(error: LocationError) -> Self {
        Self {
            answer: Err(error),
            delay: None,
        }
    }

    /// Wait `delay` before answering.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl LocationProvider for StubLocationProvider {
    async fn current_location(&self) -> Result<Coord<f64>, LocationError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answer.clone()
    }
}

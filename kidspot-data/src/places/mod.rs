//! Venue search and detail lookup.
//!
//! [`PlaceSource`] returns raw, unscored venues around a centre, either by
//! nearby search (no keyword) or text search (keyword present).
//! [`DetailsProvider`] fetches ratings and reviews for a single venue so the
//! refresh flow can backfill review highlights.
//!
//! [`GooglePlacesClient`] implements both traits against the Google Places
//! web service.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use kidspot_data::places::{GooglePlacesClient, GooglePlacesConfig, PlaceSource, SearchQuery};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GooglePlacesClient::new(GooglePlacesConfig::with_api_key("secret"))?;
//! let query = SearchQuery::new(Coord { x: -46.63, y: -23.55 }, 4_000)?
//!     .with_keyword("pizzaria");
//! let places = client.search(&query).await?;
//! println!("found {}", places.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod google;

use async_trait::async_trait;
use geo::Coord;
use kidspot_core::{Place, ReviewHighlight};
use thiserror::Error;

pub use client::{
    ClientBuildError, DEFAULT_BASE_URL, DEFAULT_USER_AGENT, GooglePlacesClient,
    GooglePlacesConfig,
};

/// Errors raised while talking to a places service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacesError {
    /// No API key is configured, so no request was made.
    #[error("places client is not configured")]
    NotConfigured,
    /// The search radius was zero.
    #[error("search radius must be positive")]
    InvalidRadius,
    /// The request exceeded its deadline.
    #[error("{endpoint} request timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint name, without credentials.
        endpoint: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("{endpoint} request failed with HTTP {status}")]
    Http {
        /// Endpoint name, without credentials.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },
    /// The request could not reach the service.
    #[error("{endpoint} request failed: {message}")]
    Network {
        /// Endpoint name, without credentials.
        endpoint: String,
        /// Transport error description.
        message: String,
    },
    /// The service answered with a non-OK application status.
    #[error("places service returned {status}: {message}")]
    Service {
        /// Application status such as `REQUEST_DENIED`.
        status: String,
        /// Error message supplied by the service, if any.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse places response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },
}

/// A validated search around a centre.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    center: Coord<f64>,
    radius_m: u32,
    keyword: Option<String>,
}

impl SearchQuery {
    /// Build a nearby search of `radius_m` metres around `center`.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::InvalidRadius`] when `radius_m` is zero.
    pub const fn new(center: Coord<f64>, radius_m: u32) -> Result<Self, PlacesError> {
        if radius_m == 0 {
            return Err(PlacesError::InvalidRadius);
        }
        Ok(Self {
            center,
            radius_m,
            keyword: None,
        })
    }

    /// Switch to text search for `keyword`. Blank keywords are ignored.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl AsRef<str>) -> Self {
        let trimmed = keyword.as_ref().trim();
        self.keyword = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Search centre, `x = longitude`, `y = latitude`.
    #[must_use]
    pub const fn center(&self) -> Coord<f64> {
        self.center
    }

    /// Search radius in metres.
    #[must_use]
    pub const fn radius_m(&self) -> u32 {
        self.radius_m
    }

    /// Trimmed, non-empty keyword, if any.
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }
}

/// Ratings and reviews for one venue.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaceDetails {
    /// External rating.
    pub rating: Option<f64>,
    /// Number of external ratings.
    pub user_ratings_total: Option<u32>,
    /// Reviews mapped to highlights.
    pub reviews: Vec<ReviewHighlight>,
}

/// Source of raw venues.
#[async_trait]
pub trait PlaceSource: Send + Sync {
    /// Return venues matching `query`. An empty list is not an error.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Place>, PlacesError>;
}

/// Source of per-venue details.
#[async_trait]
pub trait DetailsProvider: Send + Sync {
    /// Fetch details for `place_id`; `Ok(None)` when the service has none.
    async fn details(&self, place_id: &str) -> Result<Option<PlaceDetails>, PlacesError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn zero_radius_is_rejected() {
        let err = SearchQuery::new(Coord { x: 0.0, y: 0.0 }, 0).expect_err("zero radius");
        assert_eq!(err, PlacesError::InvalidRadius);
    }

    #[rstest]
    #[case("  pizza ", Some("pizza"))]
    #[case("   ", None)]
    #[case("", None)]
    fn keywords_are_trimmed(#[case] keyword: &str, #[case] expected: Option<&str>) {
        let query = SearchQuery::new(Coord { x: 0.0, y: 0.0 }, 500)
            .expect("valid radius")
            .with_keyword(keyword);
        assert_eq!(query.keyword(), expected);
    }
}

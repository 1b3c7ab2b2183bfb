//! HTTP client for the Google Places web service.

use std::time::Duration;

use async_trait::async_trait;
use kidspot_core::Place;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use super::google::{DetailsResponse, SearchResponse};
use super::{DetailsProvider, PlaceDetails, PlaceSource, PlacesError, SearchQuery};

/// Default user agent for places requests.
pub const DEFAULT_USER_AGENT: &str = "kidspot-places/0.1";

/// Public Google Places endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Category requested by nearby searches unless overridden.
const DEFAULT_NEARBY_TYPE: &str = "restaurant";

/// Reviews kept from a details response.
const DEFAULT_MAX_REVIEWS: usize = 8;

const DETAILS_FIELDS: &str = "place_id,rating,user_ratings_total,reviews";

/// Error type for [`GooglePlacesClient`] construction failures.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
    /// The configured base URL is not a valid URL.
    #[error("invalid places base URL {url:?}")]
    BaseUrl {
        /// Offending URL.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
}

/// Configuration for [`GooglePlacesClient`].
#[derive(Debug, Clone)]
pub struct GooglePlacesConfig {
    /// API key. Without one every request fails with
    /// [`PlacesError::NotConfigured`].
    pub api_key: Option<String>,
    /// Endpoint root, e.g. [`DEFAULT_BASE_URL`].
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Category passed as `type` to nearby searches.
    pub nearby_type: Option<String>,
    /// Reviews kept per details lookup.
    pub max_reviews: usize,
}

impl Default for GooglePlacesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            nearby_type: Some(DEFAULT_NEARBY_TYPE.to_owned()),
            max_reviews: DEFAULT_MAX_REVIEWS,
        }
    }
}

impl GooglePlacesConfig {
    /// Create a configuration using `api_key` and defaults elsewhere.
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Set the endpoint root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set or clear the nearby search category.
    #[must_use]
    pub fn with_nearby_type(mut self, nearby_type: Option<String>) -> Self {
        self.nearby_type = nearby_type;
        self
    }

    /// Report whether a non-blank API key is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

/// Google Places client implementing [`PlaceSource`] and [`DetailsProvider`].
///
/// Searches with a keyword use Text Search; searches without one use Nearby
/// Search restricted to [`GooglePlacesConfig::nearby_type`].
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    client: Client,
    config: GooglePlacesConfig,
    base_url: Url,
}

impl GooglePlacesClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// fails to build.
    pub fn new(config: GooglePlacesConfig) -> Result<Self, ClientBuildError> {
        let root = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&root).map_err(|source| ClientBuildError::BaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &GooglePlacesConfig {
        &self.config
    }

    /// Report whether requests will be attempted.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn api_key(&self) -> Result<&str, PlacesError> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(PlacesError::NotConfigured)
    }

    fn endpoint_url(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Url, PlacesError> {
        let key = self.api_key()?;
        let mut url = self
            .base_url
            .join(&format!("{endpoint}/json"))
            .map_err(|err| PlacesError::Parse {
                message: err.to_string(),
            })?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().copied())
            .append_pair("key", key);
        Ok(url)
    }

    /// Nearby Search around the query centre.
    ///
    /// # Errors
    ///
    /// Returns a [`PlacesError`] for missing credentials, transport
    /// failures and non-OK statuses.
    pub async fn nearby_search(&self, query: &SearchQuery) -> Result<Vec<Place>, PlacesError> {
        let location = format_location(query);
        let radius = query.radius_m().to_string();
        let mut params = vec![("location", location.as_str()), ("radius", radius.as_str())];
        if let Some(keyword) = query.keyword() {
            params.push(("keyword", keyword));
        }
        if let Some(kind) = self
            .config
            .nearby_type
            .as_deref()
            .map(str::trim)
            .filter(|kind| !kind.is_empty())
        {
            params.push(("type", kind));
        }
        let url = self.endpoint_url("nearbysearch", &params)?;
        let response: SearchResponse = self.get_json("nearbysearch", url).await?;
        response.into_places()
    }

    /// Text Search for `text` around the query centre. A blank `text`
    /// returns no results without a request.
    ///
    /// # Errors
    ///
    /// Returns a [`PlacesError`] for missing credentials, transport
    /// failures and non-OK statuses.
    pub async fn text_search(
        &self,
        text: &str,
        query: &SearchQuery,
    ) -> Result<Vec<Place>, PlacesError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        let location = format_location(query);
        let radius = query.radius_m().to_string();
        let url = self.endpoint_url(
            "textsearch",
            &[
                ("query", trimmed),
                ("location", location.as_str()),
                ("radius", radius.as_str()),
            ],
        )?;
        let response: SearchResponse = self.get_json("textsearch", url).await?;
        response.into_places()
    }

    /// Place Details for `place_id`, with reviews capped at
    /// [`GooglePlacesConfig::max_reviews`].
    ///
    /// # Errors
    ///
    /// Returns a [`PlacesError`] for missing credentials, transport
    /// failures and non-OK statuses.
    pub async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, PlacesError> {
        let url = self.endpoint_url(
            "details",
            &[("place_id", place_id), ("fields", DETAILS_FIELDS)],
        )?;
        let response: DetailsResponse = self.get_json("details", url).await?;
        response.into_details(self.config.max_reviews)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        url: Url,
    ) -> Result<T, PlacesError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, endpoint))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, endpoint))?;

        response.json().await.map_err(|err| PlacesError::Parse {
            message: err.to_string(),
        })
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, endpoint: &str) -> PlacesError {
        if error.is_timeout() {
            log::info!("places request to {endpoint} timed out");
            return PlacesError::Timeout {
                endpoint: endpoint.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            log::info!("places request to {endpoint} failed with HTTP {status}");
            return PlacesError::Http {
                endpoint: endpoint.to_owned(),
                status: status.as_u16(),
            };
        }

        // Strip the URL so the API key never reaches logs or error text.
        let message = error.url().map_or_else(
            || error.to_string(),
            |url| error.to_string().replace(url.as_str(), endpoint),
        );
        log::info!("places request to {endpoint} failed: {message}");
        PlacesError::Network {
            endpoint: endpoint.to_owned(),
            message,
        }
    }
}

fn format_location(query: &SearchQuery) -> String {
    let center = query.center();
    format!("{},{}", center.y, center.x)
}

#[async_trait]
impl PlaceSource for GooglePlacesClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Place>, PlacesError> {
        match query.keyword() {
            Some(keyword) => self.text_search(keyword, query).await,
            None => self.nearby_search(query).await,
        }
    }
}

#[async_trait]
impl DetailsProvider for GooglePlacesClient {
    async fn details(&self, place_id: &str) -> Result<Option<PlaceDetails>, PlacesError> {
        self.place_details(place_id).await
    }
}

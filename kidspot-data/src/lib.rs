//! Fetch and merge layer for the Kidspot engine.
//!
//! Responsibilities:
//! - Search venues through a [`places::PlaceSource`] (Google Places or demo
//!   fixture) and backfill reviews through a [`places::DetailsProvider`].
//! - Coordinate refreshes so only the latest request's results are kept.
//! - Resolve the user's position with a bounded wait and a fixed fallback.
//!
//! Boundaries:
//! - Do not encode scoring rules (live in `kidspot-core`).
//! - Network failures never escape a refresh; they fall back to demo data.
//!
//! Invariants:
//! - Request sequence tokens increase monotonically.
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod demo;
pub mod enrich;
pub mod location;
pub mod places;
pub mod refresh;

#[doc(hidden)]
pub mod test_support;

pub use demo::{DemoPlaceSource, DemoSourceError};
pub use location::{FALLBACK_LOCATION, FallbackLocator, LocationError, LocationProvider};
pub use places::{
    DetailsProvider, GooglePlacesClient, GooglePlacesConfig, PlaceDetails, PlaceSource,
    PlacesError, SearchQuery,
};
pub use refresh::{
    PlaceRefresher, RefreshConfig, RefreshOutcome, RefreshRequest, RefreshStatus, ResultOrigin,
};

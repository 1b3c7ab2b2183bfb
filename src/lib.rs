//! Facade crate for the Kidspot venue ranking engine.
//!
//! This crate re-exports the core scoring and ranking API and, behind the
//! `data` feature, the fetch layer that feeds it.

#![forbid(unsafe_code)]

pub use kidspot_core::{
    AgePreference, Amenity, Badge, CategoryFilter, Environment, EpochMillis, Filters,
    FiltersError, HeuristicScorer, Lexicon, Place, PlaceScoreDetails, PlaceScorer, PriorityLayer,
    RankedPlace, ReviewHighlight, ScoringConfig, calculate_place_score, feature_chips,
    rank_places, rank_places_with, score_place_with_details,
};

#[cfg(feature = "data")]
pub use kidspot_data::{
    DemoPlaceSource, FallbackLocator, GooglePlacesClient, GooglePlacesConfig, LocationProvider,
    PlaceRefresher, PlaceSource, PlacesError, RefreshConfig, RefreshRequest, RefreshStatus,
    ResultOrigin,
};

//! Core domain for the Kidspot engine: scoring and ranking family venues.
//!
//! Responsibilities:
//! - Model venues ([`Place`]), their amenities and reviews.
//! - Normalise free text and match it against a versioned [`Lexicon`].
//! - Detect positive, non-negated review mentions.
//! - Score places into tiers, badges and a bounded score.
//! - Rank scored places by tier, score, distance and popularity.
//!
//! Boundaries:
//! - No I/O. Fetching, enrichment and geolocation live in `kidspot-data`.
//! - No ambient state. Filters and the current time are explicit inputs.
//!
//! Invariants:
//! - Scores lie in `0.0..=100.0`.
//! - Lodging venues are always hidden with a zero score.
//! - Scoring is pure: identical inputs give identical outputs.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod amenity;
pub mod chips;
mod filters;
pub mod geometry;
#[cfg(feature = "serde")]
mod lenient;
pub mod lexicon;
mod place;
pub mod ranker;
pub mod reviews;
pub mod score;
pub mod scorer;
pub mod text;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use amenity::Amenity;
pub use chips::feature_chips;
pub use filters::{
    AgePreference, CategoryFilter, DEFAULT_RADIUS_KM, Environment, Filters, FiltersError,
};
pub use lexicon::Lexicon;
pub use place::{EpochMillis, Place, ReviewHighlight};
pub use ranker::{RankedPlace, rank_places, rank_places_with};
pub use score::{Badge, PlaceScoreDetails, PriorityLayer, ScoringConfig};
pub use scorer::{
    HeuristicScorer, PlaceScorer, calculate_place_score, score_place_with_details,
};

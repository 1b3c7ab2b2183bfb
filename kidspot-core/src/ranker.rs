//! Order scored places for display.
//!
//! Places are compared by priority tier, then score, then distance from the
//! search centre, then popularity, then rating, then name.
//!
//! Distances closer than [`DISTANCE_TIE_M`] and ratings closer than
//! [`RATING_TIE`] count as ties. A pairwise tolerance is not transitive, so
//! each sorted column is split into runs whose consecutive gaps stay under
//! the tolerance, and places are compared by run index.

use std::cmp::Ordering;

use geo::Coord;

use crate::geometry::{finite_coord, haversine_distance_m};
use crate::scorer::{PlaceScorer, default_scorer};
use crate::text::normalize;
use crate::{EpochMillis, Filters, Place, PlaceScoreDetails};

/// A place decorated with its score details and distance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct RankedPlace {
    /// The scored venue.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub place: Place,
    /// Score details for the venue.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub details: PlaceScoreDetails,
    /// Great-circle distance from the search centre in metres.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub distance_m: Option<f64>,
}

impl RankedPlace {
    /// Score `place` with `scorer` and measure its distance from `center`.
    #[must_use]
    pub fn new<S: PlaceScorer + ?Sized>(
        place: Place,
        scorer: &S,
        filters: &Filters,
        center: Option<Coord<f64>>,
        now: EpochMillis,
    ) -> Self {
        let details = scorer.score_details(&place, filters, now);
        let distance_m = center
            .and_then(finite_coord)
            .zip(place.valid_location())
            .map(|(origin, target)| haversine_distance_m(origin, target));
        Self {
            place,
            details,
            distance_m,
        }
    }
}

/// Distances closer than this many metres tie.
pub const DISTANCE_TIE_M: f64 = 1.0;

/// Ratings closer than this tie.
pub const RATING_TIE: f64 = 0.001;

#[expect(clippy::float_arithmetic, reason = "gap between two finite values")]
const fn within(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

fn located_distance(ranked: &RankedPlace) -> Option<f64> {
    ranked.distance_m.filter(|distance| distance.is_finite())
}

fn popularity(ranked: &RankedPlace) -> u32 {
    ranked.place.google_user_ratings_total.unwrap_or(0)
}

fn rating(ranked: &RankedPlace) -> f64 {
    ranked.place.effective_rating().unwrap_or(0.0)
}

fn compare_tier_and_score(a: &RankedPlace, b: &RankedPlace) -> Ordering {
    a.details
        .priority_layer
        .cmp(&b.details.priority_layer)
        .then_with(|| b.details.score.total_cmp(&a.details.score))
}

/// Located places first, nearest first.
fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

const fn same_distance(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(left), Some(right)) => within(left, right, DISTANCE_TIE_M),
        (None, None) => true,
        _ => false,
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    normalize(a).cmp(&normalize(b)).then_with(|| a.cmp(b))
}

/// Number sorted `items` into runs; a new run starts wherever `same_run`
/// fails for a neighbouring pair.
fn run_indices<T>(items: &[T], same_run: impl Fn(&T, &T) -> bool) -> Vec<usize> {
    let mut indices = Vec::with_capacity(items.len());
    if items.is_empty() {
        return indices;
    }
    let mut run = 0_usize;
    indices.push(run);
    for pair in items.windows(2) {
        if let [prev, next] = pair {
            if !same_run(prev, next) {
                run = run.saturating_add(1);
            }
            indices.push(run);
        }
    }
    indices
}

/// Apply the display order. Every stage is a stable sort on a total key.
fn order(mut ranked: Vec<RankedPlace>) -> Vec<RankedPlace> {
    ranked.sort_by(|a, b| {
        compare_tier_and_score(a, b)
            .then_with(|| compare_distance(located_distance(a), located_distance(b)))
    });
    let distance_runs = run_indices(&ranked, |prev, next| {
        compare_tier_and_score(prev, next).is_eq()
            && same_distance(located_distance(prev), located_distance(next))
    });

    let mut by_rating: Vec<(usize, RankedPlace)> = distance_runs.into_iter().zip(ranked).collect();
    by_rating.sort_by(|(run_a, a), (run_b, b)| {
        run_a
            .cmp(run_b)
            .then_with(|| popularity(b).cmp(&popularity(a)))
            .then_with(|| rating(b).total_cmp(&rating(a)))
    });
    let rating_runs = run_indices(&by_rating, |(run_prev, prev), (run_next, next)| {
        run_prev == run_next
            && popularity(prev) == popularity(next)
            && within(rating(prev), rating(next), RATING_TIE)
    });

    let mut by_name: Vec<(usize, RankedPlace)> = rating_runs
        .into_iter()
        .zip(by_rating.into_iter().map(|(_, place)| place))
        .collect();
    by_name.sort_by(|(run_a, a), (run_b, b)| {
        run_a
            .cmp(run_b)
            .then_with(|| compare_names(&a.place.name, &b.place.name))
    });
    by_name.into_iter().map(|(_, place)| place).collect()
}

/// Score, filter and order `places` with `scorer`.
///
/// Hidden places are dropped. The sort is stable, so places that tie on
/// every criterion keep their input order.
#[must_use]
pub fn rank_places_with<S: PlaceScorer + ?Sized>(
    scorer: &S,
    places: impl IntoIterator<Item = Place>,
    filters: &Filters,
    center: Option<Coord<f64>>,
    now: EpochMillis,
) -> Vec<RankedPlace> {
    let ranked: Vec<RankedPlace> = places
        .into_iter()
        .map(|place| RankedPlace::new(place, scorer, filters, center, now))
        .filter(|ranked| !ranked.details.should_hide)
        .collect();
    order(ranked)
}

/// Score, filter and order `places` with the built-in heuristic scorer.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use kidspot_core::{Filters, Place, PriorityLayer, rank_places};
///
/// let center = Coord { x: -46.6333, y: -23.5505 };
/// let places = vec![
///     Place::new("cafe", "Cafe da Esquina").with_location(center),
///     Place::new("hotel", "Hotel Paulista").with_categories(["lodging"]),
///     Place::new("park", "Parque Kids")
///         .with_categories(["amusement_park"])
///         .with_location(Coord { x: -46.64, y: -23.56 }),
/// ];
///
/// let ranked = rank_places(places, &Filters::default(), Some(center), 0);
/// let ids: Vec<_> = ranked.iter().map(|r| r.place.id.as_str()).collect();
/// assert_eq!(ids, ["park", "cafe"]);
/// assert_eq!(ranked[0].details.priority_layer, PriorityLayer::A);
/// ```
#[must_use]
pub fn rank_places(
    places: impl IntoIterator<Item = Place>,
    filters: &Filters,
    center: Option<Coord<f64>>,
    now: EpochMillis,
) -> Vec<RankedPlace> {
    rank_places_with(default_scorer(), places, filters, center, now)
}

//! Backfill review highlights and ratings for the leading search results.

use kidspot_core::Place;

use crate::places::DetailsProvider;

/// Venues enriched per refresh.
pub const DEFAULT_MAX_ENRICHED_PLACES: usize = 8;

/// Reviews kept per enriched venue.
pub const DEFAULT_MAX_REVIEWS_PER_PLACE: usize = 8;

/// Bounds on detail lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichLimits {
    /// Maximum venues looked up.
    pub max_places: usize,
    /// Maximum reviews attached to each venue.
    pub max_reviews: usize,
}

impl Default for EnrichLimits {
    fn default() -> Self {
        Self {
            max_places: DEFAULT_MAX_ENRICHED_PLACES,
            max_reviews: DEFAULT_MAX_REVIEWS_PER_PLACE,
        }
    }
}

/// Look up details for up to `limits.max_places` venues that carry a Google
/// place id and no review highlights yet, in list order.
///
/// Lookup failures are logged and skipped; the venue keeps its original
/// data. Returns the number of venues that received details.
pub async fn enrich_places<D>(provider: &D, places: &mut [Place], limits: EnrichLimits) -> usize
where
    D: DetailsProvider + ?Sized,
{
    let mut enriched = 0;
    let candidates = places
        .iter_mut()
        .filter(|place| place.google_place_id.is_some() && place.review_highlights.is_empty())
        .take(limits.max_places);

    for place in candidates {
        let Some(place_id) = place.google_place_id.clone() else {
            continue;
        };
        match provider.details(&place_id).await {
            Ok(Some(details)) => {
                place.review_highlights = details
                    .reviews
                    .into_iter()
                    .filter(|review| !review.text.trim().is_empty())
                    .take(limits.max_reviews)
                    .collect();
                place.google_rating = place.google_rating.or(details.rating);
                place.google_user_ratings_total = place
                    .google_user_ratings_total
                    .or(details.user_ratings_total);
                enriched += 1;
            }
            Ok(None) => log::debug!("no details available for {place_id}"),
            Err(err) => log::debug!("skipping details for {place_id}: {err}"),
        }
    }
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::{PlaceDetails, PlacesError};
    use crate::test_support::StubDetailsProvider;
    use kidspot_core::ReviewHighlight;
    use rstest::rstest;

    fn google(id: &str) -> Place {
        let mut place = Place::new(id, id);
        place.google_place_id = Some(id.to_owned());
        place
    }

    fn reviews(count: usize) -> Vec<ReviewHighlight> {
        (0..count)
            .map(|i| ReviewHighlight::new(format!("review {i}")).with_created_at(1_000))
            .collect()
    }

    #[rstest]
    #[tokio::test]
    async fn caps_places_and_reviews() {
        let provider = StubDetailsProvider::default().with_fallback(PlaceDetails {
            rating: Some(4.4),
            user_ratings_total: Some(40),
            reviews: reviews(12),
        });
        let mut places: Vec<Place> = (0..10).map(|i| google(&format!("g{i}"))).collect();

        let count = enrich_places(&provider, &mut places, EnrichLimits::default()).await;

        assert_eq!(count, 8);
        assert_eq!(provider.requested(), (0..8).map(|i| format!("g{i}")).collect::<Vec<_>>());
        assert!(places.iter().take(8).all(|p| p.review_highlights.len() == 8));
        assert!(places.iter().skip(8).all(|p| p.review_highlights.is_empty()));
    }

    #[rstest]
    #[tokio::test]
    async fn backfills_only_missing_ratings() {
        let provider = StubDetailsProvider::default().with_fallback(PlaceDetails {
            rating: Some(3.9),
            user_ratings_total: Some(7),
            reviews: reviews(1),
        });
        let mut rated = google("rated");
        rated.google_rating = Some(4.8);
        let mut places = vec![rated, google("unrated")];

        enrich_places(&provider, &mut places, EnrichLimits::default()).await;

        let ratings: Vec<_> = places.iter().map(|p| p.google_rating).collect();
        assert_eq!(ratings, [Some(4.8), Some(3.9)]);
        assert!(places.iter().all(|p| p.google_user_ratings_total == Some(7)));
    }

    #[rstest]
    #[tokio::test]
    async fn skips_venues_without_google_id_or_with_reviews() {
        let provider = StubDetailsProvider::default().with_fallback(PlaceDetails::default());
        let reviewed = google("reviewed").with_review_highlights(reviews(1));
        let mut places = vec![Place::new("local", "Local"), reviewed, google("fresh")];

        enrich_places(&provider, &mut places, EnrichLimits::default()).await;

        assert_eq!(provider.requested(), ["fresh"]);
    }

    #[rstest]
    #[tokio::test]
    async fn failures_leave_place_untouched() {
        let provider = StubDetailsProvider::default().with_error(
            "g1",
            PlacesError::Timeout {
                endpoint: "details".to_owned(),
                timeout_secs: 15,
            },
        );
        let mut places = vec![google("g1")];

        let count = enrich_places(&provider, &mut places, EnrichLimits::default()).await;

        assert_eq!(count, 0);
        assert_eq!(places, vec![google("g1")]);
    }
}

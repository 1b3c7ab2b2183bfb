//! Google Places web service response types.
//!
//! Only the fields the engine reads are modelled; everything else in the
//! payload is ignored.
//!
//! See: <https://developers.google.com/maps/documentation/places/web-service/search>

use geo::Coord;
use kidspot_core::{EpochMillis, Place, ReviewHighlight};
use serde::Deserialize;

use super::{PlaceDetails, PlacesError};

/// Photos kept per venue.
pub(crate) const MAX_PHOTOS: usize = 6;

/// Category used when the service omits `types`.
const FALLBACK_CATEGORY: &str = "google";

/// Nearby Search and Text Search response.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Vec<GooglePlace>,
    pub status: Option<String>,
    pub error_message: Option<String>,
}

/// Place Details response.
#[derive(Debug, Deserialize)]
pub(crate) struct DetailsResponse {
    pub result: Option<GoogleDetails>,
    pub status: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GooglePlace {
    pub place_id: String,
    #[serde(default)]
    pub name: String,
    pub types: Option<Vec<String>>,
    pub geometry: Option<Geometry>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub formatted_address: Option<String>,
    pub vicinity: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    pub location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpeningHours {
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Photo {
    pub photo_reference: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleDetails {
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub reviews: Vec<GoogleReview>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleReview {
    pub text: Option<String>,
    pub rating: Option<f64>,
    /// Seconds since the Unix epoch.
    pub time: Option<i64>,
}

/// Outcome of inspecting an application-level `status` field.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Status {
    Ok,
    ZeroResults,
}

/// Classify `status`. A missing status is treated as `OK`.
pub(crate) fn check_status(
    status: Option<&str>,
    error_message: Option<&str>,
) -> Result<Status, PlacesError> {
    match status {
        None | Some("OK") => Ok(Status::Ok),
        Some("ZERO_RESULTS") => Ok(Status::ZeroResults),
        Some(other) => {
            log::info!(
                "places API returned non-OK status {other}: {}",
                error_message.unwrap_or_default()
            );
            Err(PlacesError::Service {
                status: other.to_owned(),
                message: error_message.unwrap_or_default().to_owned(),
            })
        }
    }
}

impl SearchResponse {
    /// Map the results to places, honouring the status field.
    pub(crate) fn into_places(self) -> Result<Vec<Place>, PlacesError> {
        match check_status(self.status.as_deref(), self.error_message.as_deref())? {
            Status::ZeroResults => Ok(Vec::new()),
            Status::Ok => Ok(self.results.into_iter().map(Place::from).collect()),
        }
    }
}

impl DetailsResponse {
    /// Map the result to details, honouring the status field.
    pub(crate) fn into_details(self, max_reviews: usize) -> Result<Option<PlaceDetails>, PlacesError> {
        match check_status(self.status.as_deref(), self.error_message.as_deref())? {
            Status::ZeroResults => Ok(None),
            Status::Ok => Ok(self.result.map(|details| details.into_details(max_reviews))),
        }
    }
}

impl GoogleDetails {
    fn into_details(self, max_reviews: usize) -> PlaceDetails {
        PlaceDetails {
            rating: self.rating,
            user_ratings_total: self.user_ratings_total,
            reviews: self
                .reviews
                .into_iter()
                .take(max_reviews)
                .map(ReviewHighlight::from)
                .collect(),
        }
    }
}

impl From<GoogleReview> for ReviewHighlight {
    fn from(review: GoogleReview) -> Self {
        Self {
            id: None,
            text: review.text.unwrap_or_default(),
            rating: review.rating,
            created_at: review.time.and_then(seconds_to_millis),
        }
    }
}

fn seconds_to_millis(seconds: i64) -> Option<EpochMillis> {
    seconds.checked_mul(1_000)
}

impl From<GooglePlace> for Place {
    fn from(raw: GooglePlace) -> Self {
        let location = raw
            .geometry
            .and_then(|geometry| geometry.location)
            .map(|at| Coord { x: at.lng, y: at.lat });
        let categories = raw
            .types
            .filter(|types| !types.is_empty())
            .unwrap_or_else(|| vec![FALLBACK_CATEGORY.to_owned()]);
        Self {
            id: raw.place_id.clone(),
            name: raw.name,
            categories,
            location,
            address: raw.formatted_address.or(raw.vicinity),
            phone: raw.formatted_phone_number,
            website: raw.website,
            google_place_id: Some(raw.place_id),
            google_rating: raw.rating,
            google_user_ratings_total: raw.user_ratings_total,
            opening_hours: raw
                .opening_hours
                .map(|hours| hours.weekday_text)
                .unwrap_or_default(),
            photos: raw
                .photos
                .into_iter()
                .take(MAX_PHOTOS)
                .map(|photo| photo.photo_reference)
                .collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn maps_search_result_to_place() {
        let json = r#"{
            "status": "OK",
            "results": [{
                "place_id": "g1",
                "name": "Pizzaria Bella",
                "types": ["restaurant", "food"],
                "geometry": { "location": { "lat": -23.5, "lng": -46.6 } },
                "rating": 4.6,
                "user_ratings_total": 321,
                "vicinity": "Rua Augusta, 100",
                "opening_hours": { "weekday_text": ["Seg: 11h-23h"] },
                "photos": [
                    {"photo_reference": "a"}, {"photo_reference": "b"}, {"photo_reference": "c"},
                    {"photo_reference": "d"}, {"photo_reference": "e"}, {"photo_reference": "f"},
                    {"photo_reference": "g"}
                ]
            }]
        }"#;
        let response: SearchResponse = serde_json::from_str(json).expect("should deserialise");
        let places = response.into_places().expect("status OK");
        let place = places.first().expect("one place");

        assert_eq!(place.id, "g1");
        assert_eq!(place.google_place_id.as_deref(), Some("g1"));
        assert_eq!(place.categories, vec!["restaurant", "food"]);
        assert_eq!(place.location, Some(Coord { x: -46.6, y: -23.5 }));
        assert_eq!(place.address.as_deref(), Some("Rua Augusta, 100"));
        assert_eq!(place.google_user_ratings_total, Some(321));
        assert_eq!(place.opening_hours, vec!["Seg: 11h-23h"]);
        assert_eq!(place.photos.len(), MAX_PHOTOS);
    }

    #[rstest]
    fn missing_types_and_geometry_degrade() {
        let json = r#"{ "results": [{ "place_id": "g2", "name": "Sem tipo" }] }"#;
        let response: SearchResponse = serde_json::from_str(json).expect("should deserialise");
        let places = response.into_places().expect("missing status is OK");
        let place = places.first().expect("one place");

        assert_eq!(place.categories, vec![FALLBACK_CATEGORY]);
        assert!(place.location.is_none());
    }

    #[rstest]
    fn zero_results_is_empty() {
        let json = r#"{ "status": "ZERO_RESULTS", "results": [] }"#;
        let response: SearchResponse = serde_json::from_str(json).expect("should deserialise");
        assert!(response.into_places().expect("not an error").is_empty());
    }

    #[rstest]
    fn non_ok_status_is_a_service_error() {
        let json = r#"{ "status": "REQUEST_DENIED", "error_message": "bad key" }"#;
        let response: SearchResponse = serde_json::from_str(json).expect("should deserialise");
        let err = response.into_places().expect_err("denied");
        assert_eq!(
            err,
            PlacesError::Service {
                status: "REQUEST_DENIED".to_owned(),
                message: "bad key".to_owned(),
            }
        );
    }

    #[rstest]
    fn details_reviews_are_capped_and_converted_to_millis() {
        let json = r#"{
            "status": "OK",
            "result": {
                "rating": 4.2,
                "user_ratings_total": 12,
                "reviews": [
                    { "text": "Espaço kids ótimo", "rating": 5, "time": 1700000000 },
                    { "text": "Bom", "rating": 4 },
                    { "rating": 3, "time": 1700000100 }
                ]
            }
        }"#;
        let response: DetailsResponse = serde_json::from_str(json).expect("should deserialise");
        let details = response
            .into_details(2)
            .expect("status OK")
            .expect("result present");

        assert_eq!(details.rating, Some(4.2));
        assert_eq!(details.reviews.len(), 2);
        let first = details.reviews.first().expect("first review");
        assert_eq!(first.created_at, Some(1_700_000_000_000));
        assert_eq!(first.rating, Some(5.0));
        assert_eq!(details.reviews.get(1).and_then(|r| r.created_at), None);
    }
}

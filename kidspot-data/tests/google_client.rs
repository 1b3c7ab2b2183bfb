//! Integration tests for `GooglePlacesClient` using wiremock HTTP mocks.

use std::time::Duration;

use geo::Coord;
use kidspot_data::places::{
    DetailsProvider, GooglePlacesClient, GooglePlacesConfig, PlaceSource, PlacesError, SearchQuery,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PREFIX: &str = "/maps/api/place";

fn test_client(server: &MockServer) -> GooglePlacesClient {
    GooglePlacesClient::new(
        GooglePlacesConfig::with_api_key("test-key")
            .with_base_url(format!("{}{PREFIX}", server.uri()))
            .with_timeout(Duration::from_millis(500)),
    )
    .expect("client construction should not fail")
}

fn query() -> SearchQuery {
    SearchQuery::new(Coord { x: -46.6, y: -23.5 }, 4_000).expect("valid radius")
}

#[tokio::test]
async fn nearby_search_sends_location_radius_and_type() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "status": "OK",
        "results": [{
            "place_id": "g1",
            "name": "Cantina Kids",
            "types": ["restaurant"],
            "geometry": { "location": { "lat": -23.51, "lng": -46.61 } },
            "rating": 4.7,
            "user_ratings_total": 88
        }]
    });

    Mock::given(method("GET"))
        .and(path(format!("{PREFIX}/nearbysearch/json")))
        .and(query_param("location", "-23.5,-46.6"))
        .and(query_param("radius", "4000"))
        .and(query_param("type", "restaurant"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let places = test_client(&server)
        .search(&query())
        .await
        .expect("should parse places");

    assert_eq!(places.len(), 1);
    let place = places.first().expect("one place");
    assert_eq!(place.id, "g1");
    assert_eq!(place.name, "Cantina Kids");
    assert_eq!(place.google_rating, Some(4.7));
    assert_eq!(place.location, Some(Coord { x: -46.61, y: -23.51 }));
}

#[tokio::test]
async fn keyword_switches_to_text_search() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "status": "OK",
        "results": [{ "place_id": "t1", "name": "Pizzaria Bella" }]
    });

    Mock::given(method("GET"))
        .and(path(format!("{PREFIX}/textsearch/json")))
        .and(query_param("query", "pizzaria"))
        .and(query_param("radius", "4000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let places = test_client(&server)
        .search(&query().with_keyword(" pizzaria "))
        .await
        .expect("should parse places");

    let ids: Vec<_> = places.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["t1"]);
}

#[tokio::test]
async fn zero_results_is_an_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PREFIX}/nearbysearch/json")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .mount(&server)
        .await;

    let places = test_client(&server)
        .search(&query())
        .await
        .expect("zero results is not an error");

    assert!(places.is_empty());
}

#[tokio::test]
async fn denied_status_is_a_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PREFIX}/nearbysearch/json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        })))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .search(&query())
        .await
        .expect_err("denied");

    match err {
        PlacesError::Service { status, message } => {
            assert_eq!(status, "REQUEST_DENIED");
            assert_eq!(message, "The provided API key is invalid.");
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_failure_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .search(&query())
        .await
        .expect_err("server error");

    assert_eq!(
        err,
        PlacesError::Http {
            endpoint: "nearbysearch".to_owned(),
            status: 503,
        }
    );
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "OK", "results": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = test_client(&server)
        .search(&query())
        .await
        .expect_err("should time out");

    assert!(matches!(err, PlacesError::Timeout { .. }), "got {err:?}");
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .search(&query())
        .await
        .expect_err("should fail to parse");

    assert!(matches!(err, PlacesError::Parse { .. }), "got {err:?}");
}

#[tokio::test]
async fn details_map_reviews_to_highlights() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "status": "OK",
        "result": {
            "rating": 4.3,
            "user_ratings_total": 57,
            "reviews": [
                { "text": "Espaço kids incrível", "rating": 5, "time": 1_700_000_000 }
            ]
        }
    });

    Mock::given(method("GET"))
        .and(path(format!("{PREFIX}/details/json")))
        .and(query_param("place_id", "g1"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let details = test_client(&server)
        .details("g1")
        .await
        .expect("should parse details")
        .expect("details present");

    assert_eq!(details.user_ratings_total, Some(57));
    let review = details.reviews.first().expect("one review");
    assert_eq!(review.text, "Espaço kids incrível");
    assert_eq!(review.created_at, Some(1_700_000_000_000));
}

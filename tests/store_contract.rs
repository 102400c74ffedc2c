//! Store Client Contract Tests
//!
//! Verify the exact HTTP shape the PostgREST store client produces and how it
//! maps backend responses: query and header format, record ordering
//! passthrough, null handling on insert, and error mapping.

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use waymark::config::StoreConfig;
use waymark::store::{PostgrestStore, SampleStore};
use waymark::{NewSample, TrackError};

fn store_for(server: &MockServer) -> PostgrestStore {
    PostgrestStore::new(&StoreConfig {
        base_url: server.uri(),
        api_key: "test-anon-key".to_owned(),
        table: "locations".to_owned(),
    })
    .expect("valid store config")
}

fn record(id: i64, captured_at: &str) -> serde_json::Value {
    json!({
        "id": id,
        "session_id": "7f1aa23e-93a1-4a0c-8c6c-25f2a0a0beef",
        "captured_at": captured_at,
        "latitude": 37.1,
        "longitude": -122.5,
        "elevation": null,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Read path
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_all_requests_ascending_order_with_auth_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/locations"))
        .and(query_param("select", "*"))
        .and(query_param("order", "captured_at.asc"))
        .and(header("apikey", "test-anon-key"))
        .and(header("Authorization", "Bearer test-anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let records = store.fetch_all().await.expect("fetch should succeed");
    assert!(records.is_empty());
}

#[tokio::test]
async fn fetch_all_preserves_backend_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            record(1, "2026-08-05T10:00:00Z"),
            record(2, "2026-08-05T10:01:00Z"),
            record(3, "2026-08-05T10:02:00Z"),
        ])))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let records = store.fetch_all().await.expect("fetch should succeed");

    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(records.windows(2).all(|w| w[0].captured_at <= w[1].captured_at));
}

#[tokio::test]
async fn fetch_all_twice_returns_identical_sequences() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            record(10, "2026-08-05T09:00:00Z"),
            record(11, "2026-08-05T09:01:00Z"),
        ])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let first = store.fetch_all().await.expect("first fetch");
    let second = store.fetch_all().await.expect("second fetch");

    let first_ids: Vec<i64> = first.iter().map(|r| r.id).collect();
    let second_ids: Vec<i64> = second.iter().map(|r| r.id).collect();
    assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn fetch_all_maps_backend_failure_to_store_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/locations"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    match store.fetch_all().await {
        Err(TrackError::StoreUnavailable(detail)) => {
            assert!(detail.contains("503"));
            assert!(detail.contains("overloaded"));
        }
        other => panic!("expected StoreUnavailable, got {other:?}"),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Write path
// ────────────────────────────────────────────────────────────────────────────

fn new_sample(elevation: Option<f64>) -> NewSample {
    NewSample {
        session_id: Uuid::new_v4(),
        captured_at: "2026-08-05T10:00:00Z"
            .parse::<DateTime<Utc>>()
            .expect("valid timestamp"),
        latitude: 37.1234,
        longitude: -122.5678,
        elevation,
    }
}

#[tokio::test]
async fn insert_one_sends_numeric_fields_in_a_single_element_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/locations"))
        .and(header("Prefer", "return=minimal"))
        .and(body_partial_json(json!([{
            "latitude": 37.1234,
            "longitude": -122.5678,
            "elevation": 15.2,
        }])))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    store
        .insert_one(&new_sample(Some(15.2)))
        .await
        .expect("insert should succeed");
}

#[tokio::test]
async fn insert_one_translates_absent_elevation_to_null() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/locations"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    store
        .insert_one(&new_sample(None))
        .await
        .expect("insert should succeed");

    let requests = mock_server
        .received_requests()
        .await
        .expect("requests recorded");
    let body: serde_json::Value =
        serde_json::from_slice(&requests[0].body).expect("json body");

    // Null, not zero and not a string sentinel.
    assert!(body[0]["elevation"].is_null());
    assert!(body[0]["latitude"].is_f64());
    assert!(body[0]["longitude"].is_f64());
}

#[tokio::test]
async fn insert_one_maps_backend_failure_to_store_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/locations"))
        .respond_with(ResponseTemplate::new(500).set_body_string("insert blew up"))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    match store.insert_one(&new_sample(Some(1.0))).await {
        Err(TrackError::StoreUnavailable(detail)) => assert!(detail.contains("500")),
        other => panic!("expected StoreUnavailable, got {other:?}"),
    }
}

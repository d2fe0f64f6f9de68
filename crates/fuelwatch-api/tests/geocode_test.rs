// Integration tests for `GeocodeClient` using wiremock.
#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fuelwatch_api::{Error, GeocodeClient, RetryPolicy, TransportConfig};

async fn setup() -> (MockServer, GeocodeClient) {
    let server = MockServer::start().await;
    let client = GeocodeClient::new(
        server.uri().parse().unwrap(),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

#[tokio::test]
async fn test_reverse_returns_display_name() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "12.9716"))
        .and(query_param("lon", "77.5946"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "display_name": "MG Road, Bengaluru, Karnataka, India",
            "place_id": 12345
        })))
        .mount(&server)
        .await;

    let name = client.reverse(12.9716, 77.5946).await.unwrap();
    assert_eq!(name, "MG Road, Bengaluru, Karnataka, India");
}

#[tokio::test]
async fn test_reverse_without_display_name_is_empty_error() {
    let (server, client) = setup().await;

    // The service answers 200 with an error payload when the
    // coordinates cannot be resolved.
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "Unable to geocode" })),
        )
        .mount(&server)
        .await;

    let err = client.reverse(0.0, 0.0).await.unwrap_err();
    assert!(matches!(err, Error::GeocodeEmpty));
}

#[tokio::test]
async fn test_reverse_http_failure_surfaces_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.reverse(1.0, 2.0).await.unwrap_err();
    match err {
        Error::Database { status, .. } => assert_eq!(status, 500),
        other => panic!("expected Database error, got: {other}"),
    }
}

#[test]
fn test_retry_policy_defaults() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.backoff, std::time::Duration::from_secs(2));

    let once = RetryPolicy::once();
    assert_eq!(once.max_attempts, 1);
    assert_eq!(once.backoff, std::time::Duration::ZERO);
}

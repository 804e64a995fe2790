#![allow(clippy::unwrap_used)]
// Integration tests for `HttpTransport` + `BridgeEndpoints` using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nukictl_api::{
    BridgeEndpoints, DeviceId, Error, HttpTransport, LockAction, Transport, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, HttpTransport, BridgeEndpoints) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let endpoints = BridgeEndpoints::new(base_url, "1mytkn".to_string().into());
    let transport = HttpTransport::new(&TransportConfig::default()).unwrap();
    (server, transport, endpoints)
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_round_trip() {
    let (server, transport, endpoints) = setup().await;

    Mock::given(method("GET"))
        .and(path("/list"))
        .and(query_param("token", "1mytkn"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "nukiId": 1, "name": "Front Door" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let resp = transport.get(&endpoints.list_url()).await.unwrap();

    assert_eq!(resp.status, 200);
    assert!(resp.body.contains("Front Door"));
}

#[tokio::test]
async fn test_lock_action_query_parameters() {
    let (server, transport, endpoints) = setup().await;

    Mock::given(method("GET"))
        .and(path("/lockAction"))
        .and(query_param("nukiId", "42"))
        .and(query_param("action", "2"))
        .and(query_param("token", "1mytkn"))
        .and(query_param("deviceType", "4"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "batteryCritical": false })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = endpoints.lock_action_url(&DeviceId::Numeric(42), LockAction::Lock);
    let resp = transport.get(&url).await.unwrap();

    assert_eq!(resp.status, 200);
}

// ── Status pass-through ─────────────────────────────────────────────

#[tokio::test]
async fn test_non_success_status_is_not_an_error() {
    let (server, transport, endpoints) = setup().await;

    Mock::given(method("GET"))
        .and(path("/lockState"))
        .respond_with(ResponseTemplate::new(503).set_body_string("bridge busy"))
        .mount(&server)
        .await;

    let resp = transport
        .get(&endpoints.lock_state_url(&DeviceId::Numeric(42)))
        .await
        .unwrap();

    assert_eq!(resp.status, 503);
    assert_eq!(resp.body, "bridge busy");
}

#[tokio::test]
async fn test_unauthorized_is_returned_as_response() {
    let (server, transport, endpoints) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let resp = transport.get(&endpoints.info_url()).await.unwrap();
    assert_eq!(resp.status, 401);
    assert!(resp.body.is_empty());
}

// ── Transport failures ──────────────────────────────────────────────

#[tokio::test]
async fn test_slow_bridge_times_out() {
    let server = MockServer::start().await;
    let endpoints = BridgeEndpoints::new(
        Url::parse(&server.uri()).unwrap(),
        "1mytkn".to_string().into(),
    );
    let transport = HttpTransport::new(&TransportConfig {
        connect_timeout: Duration::from_millis(200),
        timeout: Duration::from_millis(200),
    })
    .unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let result = transport.get(&endpoints.list_url()).await;

    assert!(
        matches!(result, Err(Error::Timeout { .. })),
        "expected Timeout error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind and drop a listener so the port is known to be closed.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let endpoints =
        BridgeEndpoints::from_host("127.0.0.1", port, "1mytkn".to_string().into()).unwrap();
    let transport = HttpTransport::new(&TransportConfig::default()).unwrap();

    let err = transport.get(&endpoints.list_url()).await.unwrap_err();

    assert!(err.is_transient(), "expected transient error, got: {err:?}");
    assert!(
        !err.to_string().contains("1mytkn"),
        "token leaked into error message: {err}"
    );
}

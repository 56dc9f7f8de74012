//! Integration tests for the dispatch layer's error classification.
//!
//! These drive real HTTP exchanges against a mock server and assert that
//! status codes and bodies map to the documented error variants.

use meridian_api::auth::Credentials;
use meridian_api::client::ApiError;
use meridian_api::{Client, HostUrl, MeridianConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a client whose JSON host points at the mock server.
fn create_test_client(server: &MockServer) -> Client {
    let config = MeridianConfig::builder()
        .api_host(HostUrl::new(server.uri()).unwrap())
        .rest_host(HostUrl::new(server.uri()).unwrap())
        .build();
    Client::with_config(Credentials::basic("a1b2c3d4", "secret").unwrap(), config)
}

// ============================================================================
// 4xx Classification
// ============================================================================

#[tokio::test]
async fn test_404_classifies_as_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts/a1b2c3d4/secrets/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "title": "Not Found",
            "detail": "ID 'missing' does not exist"
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let error = client.account().get_secret("missing").await.unwrap_err();

    match error {
        ApiError::Request {
            code,
            title,
            detail,
            ..
        } => {
            assert_eq!(code, 404);
            assert_eq!(title, "Not Found");
            assert!(detail.unwrap().contains("missing"));
        }
        other => panic!("expected a request error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_422_carries_field_level_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "title": "Invalid parameters",
            "detail": "The value of one or more parameters is invalid",
            "invalid_parameters": [
                {"name": "to", "reason": "must be in E.164 format"}
            ]
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let message = meridian_api::messages::SmsText::new("not-a-number", "Acme", "hi");
    let error = client.messages().send(&message).await.unwrap_err();

    match error {
        ApiError::Request {
            code,
            invalid_parameters,
            ..
        } => {
            assert_eq!(code, 422);
            assert_eq!(invalid_parameters.len(), 1);
            assert_eq!(invalid_parameters[0].name, "to");
            assert!(invalid_parameters[0].reason.contains("E.164"));
        }
        other => panic!("expected a request error, got {other:?}"),
    }
}

// ============================================================================
// Throttle Classification
// ============================================================================

#[tokio::test]
async fn test_429_classifies_as_throttle_with_header_hint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "2.5")
                .set_body_json(json!({"title": "Rate Limit Hit"})),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let message = meridian_api::messages::SmsText::new("447700900000", "Acme", "hi");
    let error = client.messages().send(&message).await.unwrap_err();

    match error {
        ApiError::Throttle {
            retry_after,
            message,
        } => {
            assert_eq!(retry_after, Some(2.5));
            assert_eq!(message, "Rate Limit Hit");
        }
        other => panic!("expected a throttle error, got {other:?}"),
    }
}

// ============================================================================
// 5xx Classification
// ============================================================================

#[tokio::test]
async fn test_503_classifies_as_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"title": "Service Unavailable"})),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let message = meridian_api::messages::SmsText::new("447700900000", "Acme", "hi");
    let error = client.messages().send(&message).await.unwrap_err();

    assert!(matches!(error, ApiError::Server { code: 503, .. }));
}

// ============================================================================
// Success Paths and Malformed Bodies
// ============================================================================

#[tokio::test]
async fn test_202_with_message_uuid_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "message_uuid": "aaaaaaaa-bbbb-cccc-dddd-0123456789ab"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let message = meridian_api::messages::SmsText::new("447700900000", "Acme", "hi");
    let uuid = client.messages().send(&message).await.unwrap();

    assert_eq!(uuid, "aaaaaaaa-bbbb-cccc-dddd-0123456789ab");
}

#[tokio::test]
async fn test_2xx_with_invalid_json_is_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>surprise</html>"))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let message = meridian_api::messages::SmsText::new("447700900000", "Acme", "hi");
    let error = client.messages().send(&message).await.unwrap_err();

    match error {
        ApiError::Response(inner) => {
            assert!(inner.to_string().contains("Malformed response body"));
        }
        other => panic!("expected a malformed-response error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_errors_propagate_unmodified() {
    // Point the client at a port nothing listens on.
    let config = MeridianConfig::builder()
        .api_host(HostUrl::new("http://127.0.0.1:9").unwrap())
        .build();
    let client = Client::with_config(
        Credentials::basic("a1b2c3d4", "secret").unwrap(),
        config,
    );

    let message = meridian_api::messages::SmsText::new("447700900000", "Acme", "hi");
    let error = client.messages().send(&message).await.unwrap_err();

    assert!(matches!(error, ApiError::Transport(_)));
}

//! Integration tests for the SMS and Conversion APIs.
//!
//! These verify the legacy form-encoded wire format end-to-end: parameter
//! encoding, credential injection, response collection parsing, and the
//! empty-200 conversion success path.

use meridian_api::auth::Credentials;
use meridian_api::client::{ApiError, ResponseError};
use meridian_api::sms::SendSms;
use meridian_api::{Client, HostUrl, MeridianConfig};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a client whose legacy host points at the mock server.
fn create_test_client(server: &MockServer) -> Client {
    let config = MeridianConfig::builder()
        .rest_host(HostUrl::new(server.uri()).unwrap())
        .build();
    Client::with_config(Credentials::basic("a1b2c3d4", "secret").unwrap(), config)
}

fn success_body() -> serde_json::Value {
    json!({
        "message-count": "1",
        "messages": [{
            "status": "0",
            "message-id": "0A0000000123ABCD1",
            "to": "447700900000",
            "message-price": "0.03330000",
            "remaining-balance": "3.14159265",
            "network": "23410"
        }]
    })
}

// ============================================================================
// SMS Send
// ============================================================================

#[tokio::test]
async fn test_send_posts_form_params_with_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms/json"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("from=Acme"))
        .and(body_string_contains("to=447700900000"))
        .and(body_string_contains("text=Hello"))
        .and(body_string_contains("type=text"))
        .and(body_string_contains("api_key=a1b2c3d4"))
        .and(body_string_contains("api_secret=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let collection = client
        .sms()
        .send_text("Acme", "447700900000", "Hello")
        .await
        .unwrap();

    assert!(collection.is_success());
    assert_eq!(collection.len(), 1);
    let entry = collection.first().unwrap();
    assert_eq!(entry.message_id(), Some("0A0000000123ABCD1"));
    assert_eq!(entry.message_price(), Some(0.0333));
}

#[tokio::test]
async fn test_send_transmits_validated_optionals() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms/json"))
        .and(body_string_contains("ttl=30000"))
        .and(body_string_contains("client-ref=order-66"))
        .and(body_string_contains("status-report-req=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let message = SendSms::text("Acme", "447700900000", "Hello")
        .ttl(30_000)
        .unwrap()
        .client_ref("order-66")
        .unwrap()
        .delivery_receipt(true);

    client.sms().send(&message).await.unwrap();
}

#[tokio::test]
async fn test_partial_failure_collection_reports_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message-count": 2,
            "messages": [
                success_body()["messages"][0],
                {"status": "9", "error_text": "Quota exceeded"}
            ]
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let collection = client
        .sms()
        .send_text("Acme", "447700900000", "Hello")
        .await
        .unwrap();

    assert!(!collection.is_success());
    let failed = collection.get(1).unwrap();
    assert!(failed.is_error());
    // The underscore spelling is normalized to the canonical key.
    assert_eq!(failed.error_text(), Some("Quota exceeded"));
}

#[tokio::test]
async fn test_count_mismatch_fails_hydration() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message-count": "3",
            "messages": [success_body()["messages"][0]]
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let error = client
        .sms()
        .send_text("Acme", "447700900000", "Hello")
        .await
        .unwrap_err();

    match error {
        ApiError::Response(ResponseError::CountMismatch { expected, actual }) => {
            assert_eq!(expected, 3);
            assert_eq!(actual, 1);
        }
        other => panic!("expected a count mismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn test_signature_credentials_sign_instead_of_sending_secret() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms/json"))
        .and(body_string_contains("api_key=a1b2c3d4"))
        .and(body_string_contains("sig="))
        .and(body_string_contains("timestamp="))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(1)
        .mount(&server)
        .await;

    let config = MeridianConfig::builder()
        .rest_host(HostUrl::new(server.uri()).unwrap())
        .build();
    let client = Client::with_config(
        Credentials::signature("a1b2c3d4", "signature-secret").unwrap(),
        config,
    );

    client
        .sms()
        .send_text("Acme", "447700900000", "Hello")
        .await
        .unwrap();

    // The signature secret itself must never travel.
    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(!body.contains("signature-secret"));
}

// ============================================================================
// Conversion Submission
// ============================================================================

#[tokio::test]
async fn test_conversion_posts_exact_params_and_accepts_empty_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversions/sms"))
        .and(body_string_contains("message-id=ABC123"))
        .and(body_string_contains("delivered=1"))
        .and(body_string_contains("timestamp=123456"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    // An empty 200 body is success; no error may surface.
    client
        .conversion()
        .sms("ABC123", true, Some("123456"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_conversion_not_delivered_sends_zero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversions/voice"))
        .and(body_string_contains("delivered=0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    client
        .conversion()
        .voice("CALL-9", false, None)
        .await
        .unwrap();

    // Unset timestamp is a non-scalar null and must be filtered out.
    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(!body.contains("timestamp"));
}

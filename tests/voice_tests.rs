//! Integration tests for the Voice API and HAL pagination.
//!
//! Voice authenticates with an application JWT, so these tests also cover
//! the keypair handler end-to-end: the Authorization header must carry a
//! bearer token and never the private key.

use meridian_api::auth::Credentials;
use meridian_api::voice::ncco::{Action, Ncco, Talk};
use meridian_api::voice::{CallFilter, CallRequest};
use meridian_api::{Client, HostUrl, MeridianConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_PRIVATE_KEY: &str = include_str!("../src/auth/testdata/test_rsa_key.pem");

fn create_test_client(server: &MockServer) -> Client {
    let config = MeridianConfig::builder()
        .api_host(HostUrl::new(server.uri()).unwrap())
        .build();
    Client::with_config(
        Credentials::keypair("aaaaaaaa-bbbb-cccc-dddd-0123456789ab", TEST_PRIVATE_KEY)
            .unwrap(),
        config,
    )
}

// ============================================================================
// Create and Control
// ============================================================================

#[tokio::test]
async fn test_create_call_sends_jwt_bearer_and_ncco() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/calls"))
        .and(header_exists("Authorization"))
        .and(body_partial_json(json!({
            "to": [{"type": "phone", "number": "447700900000"}],
            "ncco": [{"action": "talk", "text": "Hello"}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "uuid": "63f61863-4a51-4f6b-86e1-46edebcf9356",
            "status": "started",
            "direction": "outbound",
            "conversation_uuid": "CON-f972836a-550f-45fa-956c-12a2ab5b7d22"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let request = CallRequest::to_phone("447700900000")
        .from_number("447700900001")
        .ncco(Ncco::new().add(Action::Talk(Talk::new("Hello"))));

    let created = client.voice().create(&request).await.unwrap();

    assert_eq!(created.uuid, "63f61863-4a51-4f6b-86e1-46edebcf9356");
    assert_eq!(created.status, "started");

    // The bearer header carries a JWT, never the key material.
    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(!body.contains("PRIVATE KEY"));
}

#[tokio::test]
async fn test_hangup_puts_action_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/calls/abc-123"))
        .and(body_partial_json(json!({"action": "hangup"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    client.voice().hangup("abc-123").await.unwrap();
}

#[tokio::test]
async fn test_dtmf_and_talk_control_paths() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/calls/abc-123/dtmf"))
        .and(body_partial_json(json!({"digits": "1234#"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "DTMF sent", "uuid": "abc-123"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/calls/abc-123/talk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Talk stopped", "uuid": "abc-123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    client.voice().send_dtmf("abc-123", "1234#").await.unwrap();
    client.voice().stop_talk("abc-123").await.unwrap();
}

// ============================================================================
// HAL Pagination
// ============================================================================

fn call_entry(uuid: &str) -> serde_json::Value {
    json!({"uuid": uuid, "status": "completed", "direction": "outbound"})
}

#[tokio::test]
async fn test_pager_follows_next_links_lazily() {
    let server = MockServer::start().await;

    // Page 2 first so the more specific matcher wins.
    Mock::given(method("GET"))
        .and(path("/v1/calls"))
        .and(query_param("record_index", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "_embedded": {"calls": [call_entry("c3")]},
            "_links": {"self": {"href": "/v1/calls?record_index=2"}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/calls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "_embedded": {"calls": [call_entry("c1"), call_entry("c2")]},
            "_links": {"next": {"href": "/v1/calls?record_index=2"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let mut pager = client.voice().pager(&CallFilter::default());

    let mut uuids = Vec::new();
    while let Some(call) = pager.try_next().await.unwrap() {
        uuids.push(call.uuid);
    }

    assert_eq!(uuids, vec!["c1", "c2", "c3"]);
    assert!(pager.is_exhausted());
}

#[tokio::test]
async fn test_pager_with_auto_advance_disabled_stops_at_page_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/calls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "_embedded": {"calls": [call_entry("c1")]},
            "_links": {"next": {"href": "/v1/calls?record_index=1"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let mut pager = client.voice().pager(&CallFilter::default());
    pager.set_auto_advance(false);

    assert_eq!(pager.try_next().await.unwrap().unwrap().uuid, "c1");
    // More pages exist, but auto-advance is off.
    assert!(pager.try_next().await.unwrap().is_none());
    assert!(!pager.is_exhausted());
}

#[tokio::test]
async fn test_list_returns_single_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/calls"))
        .and(query_param("status", "completed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "_embedded": {"calls": [call_entry("c1"), call_entry("c2")]},
            "_links": {"next": {"href": "/v1/calls?record_index=2"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let filter = CallFilter {
        status: Some("completed".to_string()),
        ..CallFilter::default()
    };
    let page = client.voice().list(&filter).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, Some(2));
    assert!(page.has_next);
}

//! # Meridian API Rust SDK
//!
//! A Rust SDK for the Meridian communications platform REST APIs: SMS,
//! Voice, Verify, unified Messages, Account, Subaccounts, Redact,
//! Proactive Connect, and the network (CAMARA) fraud-prevention APIs.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Typed request/response objects per API operation, with fail-fast
//!   validation of the platform's parameter rules
//! - Credential wrappers for every auth scheme (key/secret, request
//!   signing, application JWT keypairs, OAuth2 client credentials) via
//!   [`auth::Credentials`]
//! - A generic dispatch layer ([`client::ApiResource`]) that per-API
//!   sub-clients configure with their host, payload format, auth handler
//!   chain, and error decoder
//! - Typed error classification: throttle (429), request (4xx), server
//!   (5xx), transport, and malformed-response errors are distinct variants
//!   of [`client::ApiError`]
//! - Lazy HAL pagination ([`client::Pager`]) that fetches pages only as
//!   iteration crosses each page boundary
//! - Webhook parsers for inbound SMS, delivery receipts, and
//!   channel-dispatched inbound messages
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use meridian_api::{auth::Credentials, Client};
//! use meridian_api::sms::SendSms;
//!
//! let client = Client::new(Credentials::basic("api-key", "api-secret")?);
//!
//! let message = SendSms::text("Acme", "447700900000", "Hello from Rust")
//!     .ttl(30_000)?
//!     .client_ref("order-66")?;
//!
//! let collection = client.sms().send(&message).await?;
//! for entry in &collection {
//!     println!("{} -> {}", entry.to().unwrap_or("?"), entry.status());
//! }
//! ```
//!
//! ## Error Handling
//!
//! Callers catch the error kind they care about; nothing is retried or
//! swallowed by the SDK:
//!
//! ```rust,ignore
//! use meridian_api::client::ApiError;
//!
//! match client.verify().start(&request).await {
//!     Ok(started) => println!("request id {}", started.request_id),
//!     Err(ApiError::Throttle { retry_after, .. }) => {
//!         // retryable after the hinted delay
//!     }
//!     Err(ApiError::Request { title, .. }) => {
//!         // caller input was wrong; retrying will not help
//!     }
//!     Err(other) => return Err(other.into()),
//! }
//! ```
//!
//! ## Webhooks
//!
//! Webhook parsing takes the already-parsed request — the SDK never reads
//! ambient process state:
//!
//! ```rust
//! use meridian_api::messages::InboundMessage;
//! use meridian_api::webhooks::IncomingRequest;
//!
//! let request = IncomingRequest::post_json(
//!     r#"{"channel": "sms", "message_type": "text", "text": "STOP"}"#,
//! );
//! let inbound = InboundMessage::from_request(&request).unwrap();
//! assert!(matches!(inbound, InboundMessage::Sms(_)));
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration and credentials are instance-based
//! - **Fail-fast validation**: parameter rules are enforced at the setter,
//!   before any network call
//! - **One round trip per operation**: no retries, no background work;
//!   throttle and server errors surface to the caller with their hints
//! - **Thread-safe**: the client and every sub-client are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime

pub mod account;
pub mod auth;
pub mod client;
pub mod config;
pub mod conversion;
pub mod error;
pub mod messages;
pub mod network;
pub mod proactive_connect;
pub mod redact;
pub mod sms;
pub mod subaccounts;
pub mod verify;
pub mod voice;
pub mod webhooks;

// Re-export the types almost every caller touches.
pub use client::{ApiError, Client, Page, Pager};
pub use config::{
    ApiKey, ApiSecret, ApplicationId, HostUrl, MeridianConfig, MeridianConfigBuilder,
    SignatureSecret,
};
pub use error::{ConfigError, ValidationError};

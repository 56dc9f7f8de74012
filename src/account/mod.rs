//! The Account API.
//!
//! Balance and account settings live on the legacy form host; API secret
//! management is a modern JSON surface under `/accounts/{api_key}/secrets`.
//! The sub-client therefore carries one resource per surface.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::http_response::require_keys;
use crate::client::{ApiError, ApiResource, ResponseError};

/// The account's current balance.
#[derive(Clone, Debug, Deserialize)]
pub struct Balance {
    /// Balance in EUR.
    pub value: f64,
    /// Whether auto-reload is enabled.
    #[serde(rename = "autoReload", default)]
    pub auto_reload: bool,
}

/// Account-level webhook settings, echoed back after an update.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    /// Where inbound messages are delivered.
    #[serde(rename = "mo-callback-url")]
    pub inbound_url: Option<String>,
    /// Where delivery receipts are delivered.
    #[serde(rename = "dr-callback-url")]
    pub delivery_receipt_url: Option<String>,
    /// Maximum outbound requests per second.
    #[serde(rename = "max-outbound-request", default)]
    pub max_outbound_request: Option<u32>,
    /// Maximum inbound requests per second.
    #[serde(rename = "max-inbound-request", default)]
    pub max_inbound_request: Option<u32>,
}

/// One API secret's metadata. The secret value itself is never returned.
#[derive(Clone, Debug, Deserialize)]
pub struct Secret {
    /// Secret identifier.
    pub id: String,
    /// When the secret was created.
    pub created_at: Option<String>,
}

/// Sub-client for the Account API.
#[derive(Clone, Debug)]
pub struct AccountClient {
    legacy: ApiResource,
    secrets: ApiResource,
}

impl AccountClient {
    /// Wraps the two configured resources. Exposed for the registry factory.
    #[must_use]
    pub const fn new(legacy: ApiResource, secrets: ApiResource) -> Self {
        Self { legacy, secrets }
    }

    /// Fetches the account balance.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures or a body missing `value`.
    pub async fn balance(&self) -> Result<Balance, ApiError> {
        let response = self.legacy.get("/get-balance").await?;
        require_keys(&response.body, &["value"])?;
        decode(&response.body)
    }

    /// Updates the account-level webhook URLs.
    ///
    /// Passing `None` leaves that URL unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn update_settings(
        &self,
        inbound_url: Option<&str>,
        delivery_receipt_url: Option<&str>,
    ) -> Result<Settings, ApiError> {
        let payload = json!({
            "moCallBackUrl": inbound_url,
            "drCallBackUrl": delivery_receipt_url,
        });
        let response = self.legacy.create(payload, "/settings").await?;
        decode(&response.body)
    }

    /// Lists the account's API secrets.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures or a body without the
    /// embedded secrets collection.
    pub async fn list_secrets(&self) -> Result<Vec<Secret>, ApiError> {
        let response = self.secrets.get("").await?;
        let members = response
            .embedded("secrets")
            .ok_or_else(|| ResponseError::MissingKeys {
                missing: vec!["_embedded.secrets".to_string()],
            })?;
        members
            .iter()
            .map(decode)
            .collect::<Result<Vec<_>, _>>()
    }

    /// Fetches one secret's metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn get_secret(&self, secret_id: &str) -> Result<Secret, ApiError> {
        let response = self.secrets.get(&format!("/{secret_id}")).await?;
        decode(&response.body)
    }

    /// Creates a new API secret.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`] with field-level detail when the
    /// secret fails the platform's complexity rules.
    pub async fn create_secret(&self, secret: &str) -> Result<Secret, ApiError> {
        let response = self
            .secrets
            .create(json!({ "secret": secret }), "")
            .await?;
        decode(&response.body)
    }

    /// Revokes an API secret. The last remaining secret cannot be revoked.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn delete_secret(&self, secret_id: &str) -> Result<(), ApiError> {
        self.secrets.delete(&format!("/{secret_id}")).await?;
        Ok(())
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &Value) -> Result<T, ApiError> {
    serde_json::from_value(body.clone()).map_err(|e| {
        ResponseError::Malformed {
            reason: e.to_string(),
        }
        .into()
    })
}

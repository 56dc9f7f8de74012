//! Network (CAMARA) APIs: SIM Swap and Number Verification.
//!
//! These fraud-prevention APIs authenticate with OAuth2 client credentials:
//! each operation first exchanges the configured client id/secret for a
//! scoped access token at the token endpoint, then performs the real call
//! with a bearer header. Tokens are fetched per operation; the SDK holds no
//! token cache.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::BearerAuth;
use crate::client::http_response::require_keys;
use crate::client::{ApiError, ApiResource, ResponseError};

/// An OAuth2 access token from the client-credentials exchange.
#[derive(Clone, Debug, Deserialize)]
pub struct AccessToken {
    /// The bearer token value.
    pub access_token: String,
    /// Token type, normally `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Fetches client-credentials tokens for the network APIs.
#[derive(Clone, Debug)]
pub struct NetworkAuthClient {
    token_resource: ApiResource,
}

impl NetworkAuthClient {
    /// Wraps a resource rooted at the OAuth2 token path.
    /// Exposed for the registry factory.
    #[must_use]
    pub const fn new(token_resource: ApiResource) -> Self {
        Self { token_resource }
    }

    /// Exchanges the configured client credentials for a scoped token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures or a token body without
    /// `access_token`.
    pub async fn token(&self, scope: &str) -> Result<AccessToken, ApiError> {
        let payload = json!({
            "grant_type": "client_credentials",
            "scope": scope,
        });
        let response = self.token_resource.create(payload, "/token").await?;
        require_keys(&response.body, &["access_token"])?;
        serde_json::from_value(response.body).map_err(|e| {
            ResponseError::Malformed {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Sub-client for the SIM Swap API.
#[derive(Clone, Debug)]
pub struct SimSwapClient {
    auth: NetworkAuthClient,
    resource: ApiResource,
}

impl SimSwapClient {
    /// Scope requested for swap checks.
    const CHECK_SCOPE: &'static str = "dpv:FraudPreventionAndDetection#check-sim-swap";

    /// Scope requested for swap date retrieval.
    const DATE_SCOPE: &'static str = "dpv:FraudPreventionAndDetection#retrieve-sim-swap-date";

    /// Wraps the auth client and a resource rooted at the SIM swap path.
    /// Exposed for the registry factory.
    #[must_use]
    pub const fn new(auth: NetworkAuthClient, resource: ApiResource) -> Self {
        Self { auth, resource }
    }

    /// Checks whether the SIM changed within `max_age_hours` (default 240).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for token or dispatch failures, or a body
    /// without the `swapped` field.
    pub async fn check(
        &self,
        phone_number: &str,
        max_age_hours: Option<u32>,
    ) -> Result<bool, ApiError> {
        let token = self.auth.token(Self::CHECK_SCOPE).await?;
        let payload = json!({
            "phoneNumber": phone_number,
            "maxAge": max_age_hours,
        });
        let response = self
            .bearer_resource(&token)
            .create(payload, "/check")
            .await?;
        require_keys(&response.body, &["swapped"])?;
        Ok(response
            .body
            .get("swapped")
            .and_then(Value::as_bool)
            .unwrap_or_default())
    }

    /// Retrieves the latest SIM change instant for a number.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for token or dispatch failures.
    pub async fn retrieve_date(&self, phone_number: &str) -> Result<Option<String>, ApiError> {
        let token = self.auth.token(Self::DATE_SCOPE).await?;
        let payload = json!({ "phoneNumber": phone_number });
        let response = self
            .bearer_resource(&token)
            .create(payload, "/retrieve-date")
            .await?;
        Ok(response
            .body
            .get("latestSimChange")
            .and_then(Value::as_str)
            .map(ToString::to_string))
    }

    fn bearer_resource(&self, token: &AccessToken) -> ApiResource {
        self.resource
            .clone()
            .with_auth_chain(vec![Box::new(BearerAuth::new(&token.access_token))])
    }
}

/// Sub-client for the Number Verification API.
#[derive(Clone, Debug)]
pub struct NumberVerificationClient {
    auth: NetworkAuthClient,
    resource: ApiResource,
}

impl NumberVerificationClient {
    /// Scope requested for number verification.
    const VERIFY_SCOPE: &'static str = "dpv:FraudPreventionAndDetection#number-verification-verify-read";

    /// Wraps the auth client and a resource rooted at the verification path.
    /// Exposed for the registry factory.
    #[must_use]
    pub const fn new(auth: NetworkAuthClient, resource: ApiResource) -> Self {
        Self { auth, resource }
    }

    /// Verifies that a phone number matches the device on the network.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for token or dispatch failures, or a body
    /// without the verification flag.
    pub async fn verify(&self, phone_number: &str) -> Result<bool, ApiError> {
        let token = self.auth.token(Self::VERIFY_SCOPE).await?;
        let payload = json!({ "phoneNumber": phone_number });
        let resource = self
            .resource
            .clone()
            .with_auth_chain(vec![Box::new(BearerAuth::new(&token.access_token))]);
        let response = resource.create(payload, "/verify").await?;
        require_keys(&response.body, &["devicePhoneNumberVerified"])?;
        Ok(response
            .body
            .get("devicePhoneNumberVerified")
            .and_then(Value::as_bool)
            .unwrap_or_default())
    }
}

//! Auth handler strategies.
//!
//! An [`AuthHandler`] decorates an outgoing [`HttpRequest`] with credentials.
//! Each [`ApiResource`](crate::client::ApiResource) carries a chain of
//! handlers; at dispatch time the chain is walked in order and the first
//! handler compatible with the configured [`Credentials`] variant wins.
//! A handler signals incompatibility by returning `Ok(false)` so the chain
//! can keep looking, which is what lets one `Client` serve both key/secret
//! and keypair endpoints.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use thiserror::Error;

use crate::auth::credentials::Credentials;
use crate::auth::jwt::{generate_application_jwt, JwtError, DEFAULT_JWT_TTL_SECS};
use crate::auth::signature::sign_params;
use crate::client::HttpRequest;

/// Errors raised while attaching credentials to a request.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No handler in the chain accepted the configured credentials.
    #[error("No auth handler accepts the configured credentials; this endpoint requires {required}.")]
    NoCompatibleHandler {
        /// Human-readable description of what the endpoint accepts.
        required: &'static str,
    },

    /// JWT generation failed for keypair credentials.
    #[error(transparent)]
    Jwt(#[from] JwtError),
}

/// A strategy that attaches credentials to an outgoing request.
///
/// Returns `Ok(true)` when the handler applied itself, `Ok(false)` when the
/// credentials variant is not one it understands.
pub trait AuthHandler: Send + Sync + fmt::Debug {
    /// Attaches credentials to `request` if this handler supports them.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the handler supports the credentials but
    /// fails to produce an authorization artifact (e.g. JWT signing fails).
    fn apply(&self, credentials: &Credentials, request: &mut HttpRequest)
        -> Result<bool, AuthError>;

    /// Short human-readable name used in error messages.
    fn name(&self) -> &'static str;
}

/// Walks a handler chain, applying the first compatible handler.
///
/// # Errors
///
/// Returns [`AuthError::NoCompatibleHandler`] when no handler in the chain
/// accepts the credentials, or any error a compatible handler raised.
pub fn apply_chain(
    chain: &[Box<dyn AuthHandler>],
    credentials: &Credentials,
    request: &mut HttpRequest,
    required: &'static str,
) -> Result<(), AuthError> {
    for handler in chain {
        if handler.apply(credentials, request)? {
            tracing::debug!(handler = handler.name(), "attached request credentials");
            return Ok(());
        }
    }
    Err(AuthError::NoCompatibleHandler { required })
}

/// Sends `Authorization: Basic` built from key/secret credentials.
///
/// Used by the modern JSON APIs (secrets, subaccounts, messages with
/// key/secret accounts) and by the OAuth2 token endpoint, which takes the
/// client id/secret pair the same way.
#[derive(Debug, Default)]
pub struct BasicHeaderAuth;

impl AuthHandler for BasicHeaderAuth {
    fn apply(
        &self,
        credentials: &Credentials,
        request: &mut HttpRequest,
    ) -> Result<bool, AuthError> {
        let pair = match credentials {
            Credentials::Basic {
                api_key,
                api_secret,
            } => (api_key, api_secret),
            Credentials::OAuth2 {
                client_id,
                client_secret,
            } => (client_id, client_secret),
            _ => return Ok(false),
        };

        let token = BASE64_STANDARD.encode(format!("{}:{}", pair.0.as_ref(), pair.1.as_ref()));
        request
            .headers
            .insert("Authorization".to_string(), format!("Basic {token}"));
        Ok(true)
    }

    fn name(&self) -> &'static str {
        "basic-header"
    }
}

/// Injects `api_key`/`api_secret` request parameters.
///
/// The legacy form APIs authenticate through body/query parameters rather
/// than headers.
#[derive(Debug, Default)]
pub struct QueryParamsAuth;

impl AuthHandler for QueryParamsAuth {
    fn apply(
        &self,
        credentials: &Credentials,
        request: &mut HttpRequest,
    ) -> Result<bool, AuthError> {
        match credentials {
            Credentials::Basic {
                api_key,
                api_secret,
            } => {
                request
                    .params
                    .insert("api_key".to_string(), api_key.as_ref().to_string());
                request
                    .params
                    .insert("api_secret".to_string(), api_secret.as_ref().to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn name(&self) -> &'static str {
        "query-params"
    }
}

/// Signs request parameters with a signature secret.
///
/// Adds `api_key`, `timestamp`, and `sig` parameters; the secret itself
/// never travels.
#[derive(Debug, Default)]
pub struct SignatureAuth;

impl AuthHandler for SignatureAuth {
    fn apply(
        &self,
        credentials: &Credentials,
        request: &mut HttpRequest,
    ) -> Result<bool, AuthError> {
        match credentials {
            Credentials::Signature {
                api_key,
                secret,
                method,
            } => {
                request
                    .params
                    .insert("api_key".to_string(), api_key.as_ref().to_string());
                let timestamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs();
                let signed = sign_params(
                    std::mem::take(&mut request.params),
                    secret.as_ref(),
                    *method,
                    timestamp,
                );
                request.params = signed;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn name(&self) -> &'static str {
        "signature"
    }
}

/// Sends `Authorization: Bearer` with a freshly generated application JWT.
///
/// Used by the voice API and by messages when the account authenticates as
/// an application.
#[derive(Debug, Default)]
pub struct KeypairAuth;

impl AuthHandler for KeypairAuth {
    fn apply(
        &self,
        credentials: &Credentials,
        request: &mut HttpRequest,
    ) -> Result<bool, AuthError> {
        match credentials {
            Credentials::Keypair {
                application_id,
                private_key,
            } => {
                let token =
                    generate_application_jwt(application_id, private_key, DEFAULT_JWT_TTL_SECS)?;
                request
                    .headers
                    .insert("Authorization".to_string(), format!("Bearer {token}"));
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn name(&self) -> &'static str {
        "keypair-jwt"
    }
}

/// Sends `Authorization: Bearer` with a token obtained out of band.
///
/// The network API sub-clients fetch an OAuth2 access token first, then
/// dispatch the real call with this handler. It applies unconditionally.
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    /// Wraps an already-obtained access token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerAuth(*****)")
    }
}

impl AuthHandler for BearerAuth {
    fn apply(
        &self,
        _credentials: &Credentials,
        request: &mut HttpRequest,
    ) -> Result<bool, AuthError> {
        request
            .headers
            .insert("Authorization".to_string(), format!("Bearer {}", self.token));
        Ok(true)
    }

    fn name(&self) -> &'static str {
        "bearer"
    }
}

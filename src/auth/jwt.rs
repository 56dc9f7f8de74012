//! Application JWT generation for keypair authentication.
//!
//! Voice and Messages endpoints authenticate with a short-lived RS256 JWT
//! generated from an application's private key. The token carries the
//! application ID, issue/expiry timestamps, and a unique `jti` claim.
//!
//! # Example
//!
//! ```rust,ignore
//! use meridian_api::auth::jwt::generate_application_jwt;
//!
//! let token = generate_application_jwt(&application_id, private_key_pem, 900)?;
//! // Attach as `Authorization: Bearer {token}`
//! ```

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use thiserror::Error;

use crate::config::ApplicationId;

/// Default token lifetime in seconds (15 minutes).
pub const DEFAULT_JWT_TTL_SECS: u64 = 900;

/// Errors raised while generating an application JWT.
#[derive(Debug, Error)]
pub enum JwtError {
    /// The private key could not be parsed as a PEM-encoded RSA key.
    #[error("Invalid RSA private key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),

    /// Signing failed.
    #[error("JWT signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Claims carried by an application JWT.
#[derive(Debug, Serialize)]
struct ApplicationClaims<'a> {
    application_id: &'a str,
    iat: u64,
    exp: u64,
    jti: String,
}

/// Generates an RS256 JWT for the given application.
///
/// # Arguments
///
/// * `application_id` - The application the token authenticates as
/// * `private_key_pem` - PEM-encoded RSA private key
/// * `ttl_secs` - Token lifetime; [`DEFAULT_JWT_TTL_SECS`] is a sensible default
///
/// # Errors
///
/// Returns [`JwtError::InvalidKey`] if the key is not valid PEM RSA, or
/// [`JwtError::Signing`] if signing fails.
pub fn generate_application_jwt(
    application_id: &ApplicationId,
    private_key_pem: &str,
    ttl_secs: u64,
) -> Result<String, JwtError> {
    let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).map_err(JwtError::InvalidKey)?;

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let claims = ApplicationClaims {
        application_id: application_id.as_ref(),
        iat: now,
        exp: now + ttl_secs,
        jti: uuid::Uuid::new_v4().to_string(),
    };

    encode(&Header::new(Algorithm::RS256), &claims, &key).map_err(JwtError::Signing)
}

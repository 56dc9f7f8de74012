//! Credential holders for the Meridian APIs.
//!
//! Credentials are opaque value objects: they carry secret material and
//! perform no I/O themselves. The [`handlers`](crate::auth::handlers) module
//! decides how a given credential is attached to an outgoing request.

use crate::config::{ApiKey, ApiSecret, ApplicationId, SignatureSecret};
use crate::error::ConfigError;

/// The HMAC algorithm used when signing legacy requests.
///
/// Only the SHA-2 family is supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureMethod {
    /// HMAC-SHA256 (the default).
    HmacSha256,
    /// HMAC-SHA512.
    HmacSha512,
}

impl Default for SignatureMethod {
    fn default() -> Self {
        Self::HmacSha256
    }
}

/// Account credentials for API authentication.
///
/// This is a tagged union: each variant corresponds to one authentication
/// scheme the platform accepts. Credentials are immutable once constructed
/// and secret material is masked in `Debug` output (see
/// [`ApiSecret`](crate::ApiSecret)).
///
/// # Variants
///
/// - [`Basic`](Self::Basic): API key + secret, sent as an Authorization
///   header or as request parameters depending on the endpoint.
/// - [`Signature`](Self::Signature): API key + signature secret; requests
///   carry an HMAC signature over their sorted parameters instead of the
///   secret itself.
/// - [`Keypair`](Self::Keypair): application ID + RSA private key; requests
///   carry a short-lived RS256 JWT bearer token.
/// - [`OAuth2`](Self::OAuth2): client credentials for the network APIs;
///   an access token is fetched from the token endpoint before the call.
///
/// # Example
///
/// ```rust
/// use meridian_api::auth::Credentials;
///
/// let credentials = Credentials::basic("a1b2c3d4", "my-secret").unwrap();
/// assert!(matches!(credentials, Credentials::Basic { .. }));
/// ```
#[derive(Clone, Debug)]
pub enum Credentials {
    /// API key and secret.
    Basic {
        /// The account API key.
        api_key: ApiKey,
        /// The account API secret.
        api_secret: ApiSecret,
    },

    /// API key and signature secret for signed legacy requests.
    Signature {
        /// The account API key.
        api_key: ApiKey,
        /// The shared signature secret.
        secret: SignatureSecret,
        /// The HMAC algorithm to sign with.
        method: SignatureMethod,
    },

    /// Application ID and RSA private key for JWT bearer auth.
    Keypair {
        /// The application ID (the JWT `application_id` claim).
        application_id: ApplicationId,
        /// PEM-encoded RSA private key.
        private_key: String,
    },

    /// OAuth2 client credentials for the network APIs.
    OAuth2 {
        /// The OAuth2 client ID.
        client_id: ApiKey,
        /// The OAuth2 client secret.
        client_secret: ApiSecret,
    },
}

impl Credentials {
    /// Creates basic key/secret credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either value is empty.
    pub fn basic(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::Basic {
            api_key: ApiKey::new(api_key)?,
            api_secret: ApiSecret::new(api_secret)?,
        })
    }

    /// Creates signature credentials with the default HMAC-SHA256 method.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either value is empty.
    pub fn signature(
        api_key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::Signature {
            api_key: ApiKey::new(api_key)?,
            secret: SignatureSecret::new(secret)?,
            method: SignatureMethod::default(),
        })
    }

    /// Creates signature credentials with an explicit HMAC method.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either value is empty.
    pub fn signature_with_method(
        api_key: impl Into<String>,
        secret: impl Into<String>,
        method: SignatureMethod,
    ) -> Result<Self, ConfigError> {
        Ok(Self::Signature {
            api_key: ApiKey::new(api_key)?,
            secret: SignatureSecret::new(secret)?,
            method,
        })
    }

    /// Creates keypair credentials from an application ID and PEM private key.
    ///
    /// The key content is validated lazily when the first JWT is generated;
    /// this constructor only rejects an obviously empty key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the application ID is malformed or the key
    /// is empty.
    pub fn keypair(
        application_id: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let private_key = private_key.into();
        if private_key.trim().is_empty() {
            return Err(ConfigError::InvalidPrivateKey {
                reason: "key is empty".to_string(),
            });
        }
        Ok(Self::Keypair {
            application_id: ApplicationId::new(application_id)?,
            private_key,
        })
    }

    /// Creates OAuth2 client credentials for the network APIs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either value is empty.
    pub fn oauth2(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::OAuth2 {
            client_id: ApiKey::new(client_id)?,
            client_secret: ApiSecret::new(client_secret)?,
        })
    }

    /// Returns the API key when the credentials carry one.
    #[must_use]
    pub const fn api_key(&self) -> Option<&ApiKey> {
        match self {
            Self::Basic { api_key, .. } | Self::Signature { api_key, .. } => Some(api_key),
            Self::OAuth2 { client_id, .. } => Some(client_id),
            Self::Keypair { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_credentials_construct() {
        let credentials = Credentials::basic("key", "secret").unwrap();
        assert!(matches!(credentials, Credentials::Basic { .. }));
        assert_eq!(credentials.api_key().unwrap().as_ref(), "key");
    }

    #[test]
    fn test_basic_credentials_reject_empty_secret() {
        assert!(matches!(
            Credentials::basic("key", ""),
            Err(ConfigError::EmptyApiSecret)
        ));
    }

    #[test]
    fn test_signature_defaults_to_sha256() {
        let credentials = Credentials::signature("key", "sig-secret").unwrap();
        match credentials {
            Credentials::Signature { method, .. } => {
                assert_eq!(method, SignatureMethod::HmacSha256);
            }
            _ => panic!("expected signature credentials"),
        }
    }

    #[test]
    fn test_keypair_rejects_empty_key() {
        let result = Credentials::keypair("aaaaaaaa-bbbb-cccc-dddd-0123456789ab", "  ");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidPrivateKey { .. })
        ));
    }

    #[test]
    fn test_keypair_has_no_api_key() {
        let credentials =
            Credentials::keypair("aaaaaaaa-bbbb-cccc-dddd-0123456789ab", "-----BEGIN").unwrap();
        assert!(credentials.api_key().is_none());
    }

    #[test]
    fn test_debug_masks_secret_material() {
        let credentials = Credentials::basic("key", "very-secret").unwrap();
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("very-secret"));
    }
}

//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear
//! error messages, and secret material is masked in debug output.

use std::fmt;

use crate::error::ConfigError;

/// A validated Meridian API key.
///
/// This newtype ensures the API key is non-empty and provides type safety
/// to prevent accidental misuse of raw strings.
///
/// # Example
///
/// ```rust
/// use meridian_api::ApiKey;
///
/// let key = ApiKey::new("a1b2c3d4").unwrap();
/// assert_eq!(key.as_ref(), "a1b2c3d4");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Meridian API secret.
///
/// This newtype ensures the secret is non-empty and masks its value in debug
/// output to prevent accidental exposure in logs.
///
/// # Security
///
/// The `Debug` implementation displays `ApiSecret(*****)` instead of the
/// actual value.
///
/// # Example
///
/// ```rust
/// use meridian_api::ApiSecret;
///
/// let secret = ApiSecret::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ApiSecret(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSecret(String);

impl ApiSecret {
    /// Creates a new validated API secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiSecret`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptyApiSecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for ApiSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSecret(*****)")
    }
}

/// A validated signature secret for legacy request signing.
///
/// Like [`ApiSecret`], the debug representation is masked.
#[derive(Clone, PartialEq, Eq)]
pub struct SignatureSecret(String);

impl SignatureSecret {
    /// Creates a new validated signature secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySignatureSecret`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptySignatureSecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for SignatureSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SignatureSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SignatureSecret(*****)")
    }
}

/// A validated Meridian application ID.
///
/// Application IDs identify a voice/messages application and are paired with
/// an RSA private key for JWT authentication. The dashboard displays them as
/// UUIDs; this newtype accepts any hyphenated hex identifier of that shape.
///
/// # Example
///
/// ```rust
/// use meridian_api::ApplicationId;
///
/// let id = ApplicationId::new("aaaaaaaa-bbbb-cccc-dddd-0123456789ab").unwrap();
/// assert_eq!(id.as_ref(), "aaaaaaaa-bbbb-cccc-dddd-0123456789ab");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Creates a new validated application ID.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApplicationId`] if the value is empty
    /// or contains characters outside `[0-9a-fA-F-]`.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_hexdigit() || c == '-');
        if !valid {
            return Err(ConfigError::InvalidApplicationId { id });
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ApplicationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated host URL for API traffic.
///
/// Hosts must carry an `http://` or `https://` scheme. A trailing slash is
/// stripped so paths can be appended uniformly.
///
/// # Example
///
/// ```rust
/// use meridian_api::HostUrl;
///
/// let host = HostUrl::new("https://api.meridianapis.com/").unwrap();
/// assert_eq!(host.as_ref(), "https://api.meridianapis.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostUrl(String);

impl HostUrl {
    /// Creates a new validated host URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] if the URL has no scheme or
    /// no host component.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim_end_matches('/');

        let rest = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"));

        match rest {
            Some(host) if !host.is_empty() => Ok(Self(trimmed.to_string())),
            _ => Err(ConfigError::InvalidHostUrl { url }),
        }
    }
}

impl AsRef<str> for HostUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_rejects_empty() {
        assert!(matches!(ApiKey::new(""), Err(ConfigError::EmptyApiKey)));
    }

    #[test]
    fn test_api_key_round_trips() {
        let key = ApiKey::new("abcd1234").unwrap();
        assert_eq!(key.as_ref(), "abcd1234");
    }

    #[test]
    fn test_api_secret_debug_is_masked() {
        let secret = ApiSecret::new("super-secret").unwrap();
        let debug = format!("{secret:?}");
        assert_eq!(debug, "ApiSecret(*****)");
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_signature_secret_debug_is_masked() {
        let secret = SignatureSecret::new("sig-secret").unwrap();
        assert_eq!(format!("{secret:?}"), "SignatureSecret(*****)");
    }

    #[test]
    fn test_application_id_accepts_uuid_shape() {
        let id = ApplicationId::new("aaaaaaaa-bbbb-cccc-dddd-0123456789ab").unwrap();
        assert_eq!(id.as_ref(), "aaaaaaaa-bbbb-cccc-dddd-0123456789ab");
    }

    #[test]
    fn test_application_id_rejects_non_hex() {
        assert!(matches!(
            ApplicationId::new("not a uuid!"),
            Err(ConfigError::InvalidApplicationId { .. })
        ));
        assert!(matches!(
            ApplicationId::new(""),
            Err(ConfigError::InvalidApplicationId { .. })
        ));
    }

    #[test]
    fn test_host_url_requires_scheme() {
        assert!(matches!(
            HostUrl::new("api.meridianapis.com"),
            Err(ConfigError::InvalidHostUrl { .. })
        ));
    }

    #[test]
    fn test_host_url_strips_trailing_slash() {
        let host = HostUrl::new("https://rest.meridianapis.com/").unwrap();
        assert_eq!(host.as_ref(), "https://rest.meridianapis.com");
    }

    #[test]
    fn test_host_url_rejects_scheme_only() {
        assert!(matches!(
            HostUrl::new("https://"),
            Err(ConfigError::InvalidHostUrl { .. })
        ));
    }
}

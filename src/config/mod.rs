//! Configuration types for the Meridian API SDK.
//!
//! This module provides the core configuration types used to initialize the
//! SDK for API communication with the Meridian platform.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`MeridianConfig`]: The main configuration struct holding all SDK settings
//! - [`MeridianConfigBuilder`]: A builder for constructing [`MeridianConfig`] instances
//! - [`ApiKey`], [`ApiSecret`], [`SignatureSecret`]: validated credential newtypes
//! - [`ApplicationId`]: a validated application identifier
//! - [`HostUrl`]: a validated host URL
//!
//! # Example
//!
//! ```rust
//! use meridian_api::{HostUrl, MeridianConfig};
//!
//! let config = MeridianConfig::builder()
//!     .api_host(HostUrl::new("https://api.example.test").unwrap())
//!     .user_agent_prefix("MyApp/1.0")
//!     .build();
//!
//! assert_eq!(config.api_host().as_ref(), "https://api.example.test");
//! ```

mod newtypes;

pub use newtypes::{ApiKey, ApiSecret, ApplicationId, HostUrl, SignatureSecret};

/// Default host for the modern JSON APIs.
pub const DEFAULT_API_HOST: &str = "https://api.meridianapis.com";

/// Default host for the legacy form-encoded APIs.
pub const DEFAULT_REST_HOST: &str = "https://rest.meridianapis.com";

/// Configuration for the Meridian API SDK.
///
/// Holds the API hosts and client-wide settings. Credentials are supplied
/// separately when constructing a [`Client`](crate::Client), so one config
/// can be shared across accounts.
///
/// # Thread Safety
///
/// `MeridianConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct MeridianConfig {
    api_host: HostUrl,
    rest_host: HostUrl,
    user_agent_prefix: Option<String>,
}

impl MeridianConfig {
    /// Creates a new builder for constructing a `MeridianConfig`.
    #[must_use]
    pub fn builder() -> MeridianConfigBuilder {
        MeridianConfigBuilder::new()
    }

    /// Returns the host used for the modern JSON APIs.
    #[must_use]
    pub const fn api_host(&self) -> &HostUrl {
        &self.api_host
    }

    /// Returns the host used for the legacy form-encoded APIs.
    #[must_use]
    pub const fn rest_host(&self) -> &HostUrl {
        &self.rest_host
    }

    /// Returns the configured User-Agent prefix, if any.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

impl Default for MeridianConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`MeridianConfig`].
///
/// All fields have production defaults, so `build()` cannot fail. Overriding
/// the hosts is primarily useful for tests and for regional proxies.
#[derive(Debug, Default)]
pub struct MeridianConfigBuilder {
    api_host: Option<HostUrl>,
    rest_host: Option<HostUrl>,
    user_agent_prefix: Option<String>,
}

impl MeridianConfigBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Overrides the host for the modern JSON APIs.
    #[must_use]
    pub fn api_host(mut self, host: HostUrl) -> Self {
        self.api_host = Some(host);
        self
    }

    /// Overrides the host for the legacy form-encoded APIs.
    #[must_use]
    pub fn rest_host(mut self, host: HostUrl) -> Self {
        self.rest_host = Some(host);
        self
    }

    /// Sets a prefix prepended to the SDK's User-Agent header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the configuration, falling back to the production hosts.
    #[must_use]
    pub fn build(self) -> MeridianConfig {
        let default_host = |url: &str| {
            // The defaults are compile-time constants known to be valid.
            HostUrl::new(url).expect("default host URL is valid")
        };
        MeridianConfig {
            api_host: self
                .api_host
                .unwrap_or_else(|| default_host(DEFAULT_API_HOST)),
            rest_host: self
                .rest_host
                .unwrap_or_else(|| default_host(DEFAULT_REST_HOST)),
            user_agent_prefix: self.user_agent_prefix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_production_hosts() {
        let config = MeridianConfig::default();
        assert_eq!(config.api_host().as_ref(), DEFAULT_API_HOST);
        assert_eq!(config.rest_host().as_ref(), DEFAULT_REST_HOST);
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_builder_overrides_hosts() {
        let config = MeridianConfig::builder()
            .api_host(HostUrl::new("https://api.example.test").unwrap())
            .rest_host(HostUrl::new("https://rest.example.test").unwrap())
            .build();

        assert_eq!(config.api_host().as_ref(), "https://api.example.test");
        assert_eq!(config.rest_host().as_ref(), "https://rest.example.test");
    }

    #[test]
    fn test_user_agent_prefix_round_trips() {
        let config = MeridianConfig::builder()
            .user_agent_prefix("MyApp/2.1")
            .build();
        assert_eq!(config.user_agent_prefix(), Some("MyApp/2.1"));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MeridianConfig>();
    }
}

//! API dispatch and the top-level [`Client`].
//!
//! The pieces in this module are the SDK's reusable engine:
//!
//! - [`HttpClient`]: thin transport wrapper (one round trip per call)
//! - [`HttpRequest`]/[`HttpResponse`]: wire-level value objects
//! - [`ApiResource`]: the generic dispatcher each sub-client configures
//! - [`decoder`]: pluggable per-endpoint error classification
//! - [`Pager`]: lazy HAL pagination
//! - [`ClientRegistry`]: string-keyed sub-client factories with
//!   memoized (`get`) and fresh (`make`) construction
//!
//! [`Client`] ties them together: it owns the credentials, the transport,
//! and a registry pre-populated with a factory per API, and exposes typed
//! accessors (`sms()`, `voice()`, ...) backed by the registry cache.

pub mod decoder;
pub mod errors;
pub mod http_client;
pub mod http_request;
pub mod http_response;
pub mod pager;
pub mod registry;
pub mod resource;

pub use decoder::{ErrorDecoder, LegacyDecoder, Rfc7807Decoder};
pub use errors::{ApiError, FieldError, ResponseError};
pub use http_client::HttpClient;
pub use http_request::{BodyFormat, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
pub use pager::{Page, Pager};
pub use registry::{ClientRegistry, RegistryError};
pub use resource::{ApiResource, ApiResourceBuilder};

use std::sync::Arc;

use crate::account::AccountClient;
use crate::auth::{
    BasicHeaderAuth, Credentials, KeypairAuth, QueryParamsAuth, SignatureAuth,
};
use crate::config::MeridianConfig;
use crate::conversion::ConversionClient;
use crate::messages::MessagesClient;
use crate::network::{NetworkAuthClient, NumberVerificationClient, SimSwapClient};
use crate::proactive_connect::ProactiveConnectClient;
use crate::redact::{RedactClient, RedactDecoder};
use crate::sms::SmsClient;
use crate::subaccounts::SubaccountsClient;
use crate::verify::VerifyClient;
use crate::voice::VoiceClient;

/// The top-level Meridian API client.
///
/// Owns one set of credentials, one HTTP transport, and a registry of
/// per-API sub-client factories. Sub-clients obtained through the typed
/// accessors are memoized; use [`registry`](Self::registry) and
/// [`ClientRegistry::make`] when a fresh, unshared instance is needed.
///
/// # Example
///
/// ```rust
/// use meridian_api::{auth::Credentials, Client};
///
/// let client = Client::new(Credentials::basic("a1b2c3d4", "secret").unwrap());
/// let sms = client.sms();
/// ```
#[derive(Debug)]
pub struct Client {
    config: MeridianConfig,
    credentials: Arc<Credentials>,
    http: HttpClient,
    registry: ClientRegistry,
}

impl Client {
    /// Creates a client with the production configuration.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self::with_config(credentials, MeridianConfig::default())
    }

    /// Creates a client with an explicit configuration.
    #[must_use]
    pub fn with_config(credentials: Credentials, config: MeridianConfig) -> Self {
        let credentials = Arc::new(credentials);
        let http = HttpClient::new(&config);
        let registry = Self::build_registry(&config, &credentials, &http);

        Self {
            config,
            credentials,
            http,
            registry,
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &MeridianConfig {
        &self.config
    }

    /// Returns the configured credentials.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the shared HTTP transport.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http
    }

    /// Returns the sub-client registry.
    #[must_use]
    pub const fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    /// The SMS sub-client.
    #[must_use]
    pub fn sms(&self) -> Arc<SmsClient> {
        self.registry.get("sms").expect("registered at construction")
    }

    /// The Conversion sub-client.
    #[must_use]
    pub fn conversion(&self) -> Arc<ConversionClient> {
        self.registry
            .get("conversion")
            .expect("registered at construction")
    }

    /// The Verify sub-client.
    #[must_use]
    pub fn verify(&self) -> Arc<VerifyClient> {
        self.registry
            .get("verify")
            .expect("registered at construction")
    }

    /// The Voice sub-client.
    #[must_use]
    pub fn voice(&self) -> Arc<VoiceClient> {
        self.registry
            .get("voice")
            .expect("registered at construction")
    }

    /// The unified Messages sub-client.
    #[must_use]
    pub fn messages(&self) -> Arc<MessagesClient> {
        self.registry
            .get("messages")
            .expect("registered at construction")
    }

    /// The Account sub-client.
    #[must_use]
    pub fn account(&self) -> Arc<AccountClient> {
        self.registry
            .get("account")
            .expect("registered at construction")
    }

    /// The Subaccounts sub-client.
    #[must_use]
    pub fn subaccounts(&self) -> Arc<SubaccountsClient> {
        self.registry
            .get("subaccounts")
            .expect("registered at construction")
    }

    /// The Redact sub-client.
    #[must_use]
    pub fn redact(&self) -> Arc<RedactClient> {
        self.registry
            .get("redact")
            .expect("registered at construction")
    }

    /// The Proactive Connect sub-client.
    #[must_use]
    pub fn proactive_connect(&self) -> Arc<ProactiveConnectClient> {
        self.registry
            .get("proactive_connect")
            .expect("registered at construction")
    }

    /// The SIM Swap sub-client.
    #[must_use]
    pub fn sim_swap(&self) -> Arc<SimSwapClient> {
        self.registry
            .get("sim_swap")
            .expect("registered at construction")
    }

    /// The Number Verification sub-client.
    #[must_use]
    pub fn number_verification(&self) -> Arc<NumberVerificationClient> {
        self.registry
            .get("number_verification")
            .expect("registered at construction")
    }

    /// Registers the standard factory per API.
    ///
    /// Each factory captures clones of the shared transport, credentials,
    /// and host configuration, so a produced sub-client stands on its own.
    fn build_registry(
        config: &MeridianConfig,
        credentials: &Arc<Credentials>,
        http: &HttpClient,
    ) -> ClientRegistry {
        let mut registry = ClientRegistry::new();
        let rest_host = config.rest_host().as_ref().to_string();
        let api_host = config.api_host().as_ref().to_string();
        let account_key = credentials
            .api_key()
            .map(|key| key.as_ref().to_string())
            .unwrap_or_default();

        let legacy_resource = |base: String| {
            ApiResource::builder(http.clone(), Arc::clone(credentials), base)
                .format(BodyFormat::Form)
                .auth(Box::new(SignatureAuth))
                .auth(Box::new(QueryParamsAuth))
                .auth_requirement("an API key with secret or signature secret")
                .decoder(Arc::new(LegacyDecoder))
        };
        let json_resource = |base: String| {
            ApiResource::builder(http.clone(), Arc::clone(credentials), base)
        };

        {
            let resource = legacy_resource(format!("{rest_host}/sms"))
                .errors_on_200(true)
                .build();
            registry.register("sms", move || SmsClient::new(resource.clone()));
        }
        {
            let resource = legacy_resource(format!("{rest_host}/conversions")).build();
            registry.register("conversion", move || {
                ConversionClient::new(resource.clone())
            });
        }
        {
            let resource = legacy_resource(format!("{api_host}/verify"))
                .errors_on_200(true)
                .build();
            registry.register("verify", move || VerifyClient::new(resource.clone()));
        }
        {
            let resource = json_resource(format!("{api_host}/v1/calls"))
                .collection("calls")
                .auth(Box::new(KeypairAuth))
                .auth_requirement("an application keypair")
                .build();
            registry.register("voice", move || VoiceClient::new(resource.clone()));
        }
        {
            let resource = json_resource(format!("{api_host}/v1/messages"))
                .auth(Box::new(KeypairAuth))
                .auth(Box::new(BasicHeaderAuth))
                .auth_requirement("an application keypair or API key/secret")
                .build();
            registry.register("messages", move || MessagesClient::new(resource.clone()));
        }
        {
            let legacy = legacy_resource(format!("{rest_host}/account")).build();
            let secrets = json_resource(format!("{api_host}/accounts/{account_key}/secrets"))
                .auth(Box::new(BasicHeaderAuth))
                .auth_requirement("an API key and secret")
                .build();
            registry.register("account", move || {
                AccountClient::new(legacy.clone(), secrets.clone())
            });
        }
        {
            let resource = json_resource(format!("{api_host}/accounts/{account_key}"))
                .auth(Box::new(BasicHeaderAuth))
                .auth_requirement("an API key and secret")
                .build();
            registry.register("subaccounts", move || {
                SubaccountsClient::new(resource.clone())
            });
        }
        {
            let resource = json_resource(format!("{api_host}/v1/redact"))
                .auth(Box::new(BasicHeaderAuth))
                .auth(Box::new(KeypairAuth))
                .auth_requirement("an API key/secret or application keypair")
                .decoder(Arc::new(RedactDecoder))
                .build();
            registry.register("redact", move || RedactClient::new(resource.clone()));
        }
        {
            let resource = json_resource(format!("{api_host}/v0.1/bulk/lists"))
                .collection("lists")
                .auth(Box::new(KeypairAuth))
                .auth(Box::new(BasicHeaderAuth))
                .auth_requirement("an application keypair or API key/secret")
                .build();
            registry.register("proactive_connect", move || {
                ProactiveConnectClient::new(resource.clone())
            });
        }

        let network_auth = {
            let resource = ApiResource::builder(
                http.clone(),
                Arc::clone(credentials),
                format!("{api_host}/oauth2"),
            )
            .format(BodyFormat::Form)
            .auth(Box::new(BasicHeaderAuth))
            .auth_requirement("OAuth2 client credentials")
            .build();
            NetworkAuthClient::new(resource)
        };
        {
            let auth = network_auth.clone();
            let resource = json_resource(format!("{api_host}/camara/sim-swap/v040")).build();
            registry.register("sim_swap", move || {
                SimSwapClient::new(auth.clone(), resource.clone())
            });
        }
        {
            let auth = network_auth;
            let resource =
                json_resource(format!("{api_host}/camara/number-verification/v031")).build();
            registry.register("number_verification", move || {
                NumberVerificationClient::new(auth.clone(), resource.clone())
            });
        }

        registry
    }
}

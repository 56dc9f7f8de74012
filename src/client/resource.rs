//! The generic API resource dispatcher.
//!
//! [`ApiResource`] is the one reusable engine in the SDK: given a base URL,
//! a payload format, an auth handler chain, and an error decoder, it turns
//! logical operations (`create`, `get`, `search`, `update`, `delete`) into
//! single HTTP round trips and interprets the result. Every per-API
//! sub-client is a thin layer over one or two configured resources.
//!
//! A resource is configured once by its sub-client factory and then used
//! many times; it is `Clone`, and clones share the underlying transport.
//!
//! # Success vs failure
//!
//! By default a 2xx response is success regardless of body content. The
//! legacy endpoints signal business failure inside HTTP 200, so resources
//! for those endpoints enable `errors_on_200`, which runs the configured
//! [`ErrorDecoder`] on 2xx bodies as well. Non-2xx responses are always
//! decoded. Transport errors propagate unmodified.

use std::sync::Arc;

use serde_json::Value;

use crate::auth::{apply_chain, AuthHandler, Credentials};
use crate::client::decoder::{classify_status, ErrorDecoder, Rfc7807Decoder};
use crate::client::errors::ApiError;
use crate::client::http_client::HttpClient;
use crate::client::http_request::{BodyFormat, HttpMethod, HttpRequest};
use crate::client::http_response::HttpResponse;
use crate::client::pager::Pager;

/// A configured dispatcher for one API surface.
///
/// Construct with [`ApiResource::builder`]; the builder is used by the
/// per-API factories in [`Client`](crate::Client).
#[derive(Clone, Debug)]
pub struct ApiResource {
    http: HttpClient,
    credentials: Arc<Credentials>,
    base_url: String,
    collection_name: Option<&'static str>,
    format: BodyFormat,
    auth_chain: Arc<Vec<Box<dyn AuthHandler>>>,
    auth_requirement: &'static str,
    errors_on_200: bool,
    decoder: Arc<dyn ErrorDecoder>,
}

impl ApiResource {
    /// Creates a new builder.
    ///
    /// # Arguments
    ///
    /// * `http` - The shared transport
    /// * `credentials` - The account credentials the auth chain draws from
    /// * `base_url` - Absolute URL prefix for every operation
    #[must_use]
    pub fn builder(
        http: HttpClient,
        credentials: Arc<Credentials>,
        base_url: impl Into<String>,
    ) -> ApiResourceBuilder {
        ApiResourceBuilder::new(http, credentials, base_url)
    }

    /// Returns the base URL this resource dispatches to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the HAL collection name used by `search`/`pager`.
    #[must_use]
    pub const fn collection_name(&self) -> Option<&'static str> {
        self.collection_name
    }

    /// Returns whether 2xx bodies are inspected for errors.
    #[must_use]
    pub const fn errors_on_200(&self) -> bool {
        self.errors_on_200
    }

    /// Replaces the auth handler chain.
    ///
    /// Used when the authorization artifact is obtained out of band, e.g.
    /// a network API token fetched just before the call.
    #[must_use]
    pub fn with_auth_chain(mut self, chain: Vec<Box<dyn AuthHandler>>) -> Self {
        self.auth_chain = Arc::new(chain);
        self
    }

    /// Returns a clone of this resource rebased onto another URL.
    ///
    /// Used for request-scoped dispatch (per-list item collections, token
    /// endpoints); the clone shares the transport and auth chain but never
    /// leaks its base URL back to the original.
    #[must_use]
    pub fn scoped(&self, base_url: impl Into<String>, collection: Option<&'static str>) -> Self {
        let mut scoped = self.clone();
        scoped.base_url = base_url.into();
        scoped.collection_name = collection;
        scoped
    }

    /// Creates a resource: POST to the base URL plus an optional suffix.
    ///
    /// For form resources the payload's scalar entries become the form
    /// body; for JSON resources the payload is sent verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] per the classification rules in
    /// [`decoder`](crate::client::decoder).
    pub async fn create(&self, payload: Value, suffix: &str) -> Result<HttpResponse, ApiError> {
        let builder = self.request(HttpMethod::Post, suffix);
        let request = match self.format {
            BodyFormat::Form => builder.merge_params(&payload).build(),
            BodyFormat::Json => builder.body(payload).build(),
        };
        self.dispatch(request).await
    }

    /// Fetches a resource: GET the base URL plus a path suffix.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] per the classification rules.
    pub async fn get(&self, suffix: &str) -> Result<HttpResponse, ApiError> {
        let request = self.request(HttpMethod::Get, suffix).build();
        self.dispatch(request).await
    }

    /// Searches: GET with the filter's scalar entries as query parameters.
    ///
    /// Returns the raw first page; use [`pager`](Self::pager) for lazy
    /// iteration across HAL pages.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] per the classification rules.
    pub async fn search(&self, filter: &Value, suffix: &str) -> Result<HttpResponse, ApiError> {
        let request = self
            .request(HttpMethod::Get, suffix)
            .merge_params(filter)
            .build();
        self.dispatch(request).await
    }

    /// Returns a lazy pager over the HAL collection this resource serves.
    ///
    /// No request is made until the pager is first advanced; subsequent
    /// pages are fetched one at a time as iteration crosses each page
    /// boundary, following `_links.next`.
    #[must_use]
    pub fn pager<T: serde::de::DeserializeOwned>(&self, filter: &Value) -> Pager<T> {
        Pager::new(
            self.clone(),
            self.collection_name.unwrap_or_default(),
            filter.clone(),
        )
    }

    /// Updates a resource: PUT to the base URL plus a path suffix.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] per the classification rules.
    pub async fn update(&self, suffix: &str, payload: Value) -> Result<HttpResponse, ApiError> {
        self.write(HttpMethod::Put, suffix, payload).await
    }

    /// Partially updates a resource: PATCH to the base URL plus a suffix.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] per the classification rules.
    pub async fn patch(&self, suffix: &str, payload: Value) -> Result<HttpResponse, ApiError> {
        self.write(HttpMethod::Patch, suffix, payload).await
    }

    /// Deletes a resource. Most callers ignore the returned response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] per the classification rules.
    pub async fn delete(&self, suffix: &str) -> Result<HttpResponse, ApiError> {
        let request = self.request(HttpMethod::Delete, suffix).build();
        self.dispatch(request).await
    }

    /// Fetches an arbitrary absolute or host-relative URL.
    ///
    /// Used by the pager to follow `_links.next.href`, which the API
    /// returns as a host-relative path.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] per the classification rules.
    pub async fn get_absolute(&self, href: &str) -> Result<HttpResponse, ApiError> {
        let url = if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            format!("{}{}", self.host_root(), href)
        };
        let request = HttpRequest::builder(HttpMethod::Get, url)
            .format(self.format)
            .build();
        self.dispatch(request).await
    }

    async fn write(
        &self,
        method: HttpMethod,
        suffix: &str,
        payload: Value,
    ) -> Result<HttpResponse, ApiError> {
        let builder = self.request(method, suffix);
        let request = match self.format {
            BodyFormat::Form => builder.merge_params(&payload).build(),
            BodyFormat::Json => builder.body(payload).build(),
        };
        self.dispatch(request).await
    }

    fn request(&self, method: HttpMethod, suffix: &str) -> crate::client::HttpRequestBuilder {
        HttpRequest::builder(method, format!("{}{}", self.base_url, suffix)).format(self.format)
    }

    /// Returns the scheme + authority portion of the base URL.
    fn host_root(&self) -> &str {
        let after_scheme = self
            .base_url
            .find("://")
            .map_or(0, |position| position + "://".len());
        self.base_url[after_scheme..]
            .find('/')
            .map_or(&self.base_url, |slash| {
                &self.base_url[..after_scheme + slash]
            })
    }

    /// Attaches credentials, performs the round trip, interprets the result.
    async fn dispatch(&self, mut request: HttpRequest) -> Result<HttpResponse, ApiError> {
        apply_chain(
            &self.auth_chain,
            &self.credentials,
            &mut request,
            self.auth_requirement,
        )?;

        let response = self.http.send(request).await?;
        self.interpret(response)
    }

    fn interpret(&self, response: HttpResponse) -> Result<HttpResponse, ApiError> {
        if response.is_ok() && !self.errors_on_200 {
            return Ok(response);
        }

        let decoded = if response.is_ok() {
            self.decoder.decode(&response)
        } else {
            // Non-2xx always classifies, even if the decoder punts.
            Some(self.decoder.decode(&response).unwrap_or_else(|| {
                classify_status(
                    &response,
                    "API request failed".to_string(),
                    None,
                    Vec::new(),
                )
            }))
        };

        match decoded {
            Some(error) => {
                tracing::warn!(code = response.code, error = %error, "API request failed");
                Err(error)
            }
            None => Ok(response),
        }
    }
}

/// Builder for [`ApiResource`].
#[derive(Debug)]
pub struct ApiResourceBuilder {
    http: HttpClient,
    credentials: Arc<Credentials>,
    base_url: String,
    collection_name: Option<&'static str>,
    format: BodyFormat,
    auth_chain: Vec<Box<dyn AuthHandler>>,
    auth_requirement: &'static str,
    errors_on_200: bool,
    decoder: Arc<dyn ErrorDecoder>,
}

impl ApiResourceBuilder {
    fn new(http: HttpClient, credentials: Arc<Credentials>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            credentials,
            base_url: base_url.into(),
            collection_name: None,
            format: BodyFormat::Json,
            auth_chain: Vec::new(),
            auth_requirement: "account credentials",
            errors_on_200: false,
            decoder: Arc::new(Rfc7807Decoder),
        }
    }

    /// Sets the HAL collection name used by `search`/`pager`.
    #[must_use]
    pub const fn collection(mut self, name: &'static str) -> Self {
        self.collection_name = Some(name);
        self
    }

    /// Sets the payload encoding (JSON by default).
    #[must_use]
    pub const fn format(mut self, format: BodyFormat) -> Self {
        self.format = format;
        self
    }

    /// Appends an auth handler to the chain.
    #[must_use]
    pub fn auth(mut self, handler: Box<dyn AuthHandler>) -> Self {
        self.auth_chain.push(handler);
        self
    }

    /// Describes the credentials this endpoint accepts, for error messages.
    #[must_use]
    pub const fn auth_requirement(mut self, requirement: &'static str) -> Self {
        self.auth_requirement = requirement;
        self
    }

    /// Enables error decoding on 2xx bodies.
    #[must_use]
    pub const fn errors_on_200(mut self, enabled: bool) -> Self {
        self.errors_on_200 = enabled;
        self
    }

    /// Replaces the error decoder (RFC 7807 by default).
    #[must_use]
    pub fn decoder(mut self, decoder: Arc<dyn ErrorDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Builds the resource.
    #[must_use]
    pub fn build(self) -> ApiResource {
        ApiResource {
            http: self.http,
            credentials: self.credentials,
            base_url: self.base_url,
            collection_name: self.collection_name,
            format: self.format,
            auth_chain: Arc::new(self.auth_chain),
            auth_requirement: self.auth_requirement,
            errors_on_200: self.errors_on_200,
            decoder: self.decoder,
        }
    }
}

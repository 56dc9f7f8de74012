//! Authentication for the Meridian APIs.
//!
//! This module provides:
//!
//! - [`Credentials`]: a tagged union of the account credential schemes
//! - [`handlers`]: strategy objects that attach credentials to a request
//! - [`jwt`]: RS256 application JWT generation for keypair auth
//! - [`signature`]: HMAC request signing for legacy endpoints
//!
//! Credential holders store secret material and nothing else; all logic
//! lives in the handlers, which the per-API factories assemble into chains.

pub mod credentials;
pub mod handlers;
pub mod jwt;
pub mod signature;

pub use credentials::{Credentials, SignatureMethod};
pub use handlers::{
    apply_chain, AuthError, AuthHandler, BasicHeaderAuth, BearerAuth, KeypairAuth,
    QueryParamsAuth, SignatureAuth,
};

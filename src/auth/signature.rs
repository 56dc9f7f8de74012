//! Request signing for legacy endpoints.
//!
//! Accounts configured with a signature secret authenticate legacy requests
//! by sending an HMAC signature over the request parameters instead of the
//! API secret itself. The scheme is:
//!
//! 1. Add a `timestamp` parameter (Unix seconds) if not already present.
//! 2. Sort the remaining parameters by name.
//! 3. Concatenate them as `&name=value`, with any `&` or `=` inside a value
//!    replaced by `_`.
//! 4. HMAC the concatenation with the signature secret and append the
//!    lowercase hex digest as the `sig` parameter.
//!
//! # Example
//!
//! ```rust
//! use meridian_api::auth::signature::sign_params;
//! use meridian_api::auth::SignatureMethod;
//! use std::collections::BTreeMap;
//!
//! let mut params = BTreeMap::new();
//! params.insert("from".to_string(), "Acme".to_string());
//! params.insert("to".to_string(), "447700900000".to_string());
//!
//! let signed = sign_params(params, "secret", SignatureMethod::HmacSha256, 1_700_000_000);
//! assert!(signed.contains_key("sig"));
//! assert_eq!(signed.get("timestamp").unwrap(), "1700000000");
//! ```

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};

use super::credentials::SignatureMethod;

/// Signs a parameter map, returning it with `timestamp` and `sig` added.
///
/// Parameters are kept in a `BTreeMap` so the signable string is built in
/// sorted order without an extra sort step. The caller supplies the
/// timestamp so signing stays deterministic and testable.
#[must_use]
pub fn sign_params(
    mut params: BTreeMap<String, String>,
    secret: &str,
    method: SignatureMethod,
    timestamp: u64,
) -> BTreeMap<String, String> {
    params
        .entry("timestamp".to_string())
        .or_insert_with(|| timestamp.to_string());

    let signable = signable_string(&params);
    let digest = compute_digest(&signable, secret, method);
    params.insert("sig".to_string(), digest);
    params
}

/// Builds the canonical signable string `&k=v&k=v…` over sorted parameters.
///
/// Values containing `&` or `=` have those characters replaced with `_` so
/// the canonical form stays unambiguous.
#[must_use]
pub fn signable_string(params: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (key, value) in params {
        if key == "sig" {
            continue;
        }
        let clean = value.replace(['&', '='], "_");
        out.push('&');
        out.push_str(key);
        out.push('=');
        out.push_str(&clean);
    }
    out
}

/// Computes the lowercase hex HMAC digest of a signable string.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_digest(signable: &str, secret: &str, method: SignatureMethod) -> String {
    match method {
        SignatureMethod::HmacSha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
                .expect("HMAC can take key of any size");
            mac.update(signable.as_bytes());
            hex::encode(mac.finalize().into_bytes())
        }
        SignatureMethod::HmacSha512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(secret.as_bytes())
                .expect("HMAC can take key of any size");
            mac.update(signable.as_bytes());
            hex::encode(mac.finalize().into_bytes())
        }
    }
}

// Internal hex encoding since we don't want to add another dependency
mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        let bytes = bytes.as_ref();
        let mut result = String::with_capacity(bytes.len() * 2);
        for &byte in bytes {
            result.push(HEX_CHARS[(byte >> 4) as usize] as char);
            result.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_signable_string_is_sorted_and_prefixed() {
        let p = params(&[("to", "447700900000"), ("from", "Acme")]);
        assert_eq!(signable_string(&p), "&from=Acme&to=447700900000");
    }

    #[test]
    fn test_signable_string_escapes_delimiters() {
        let p = params(&[("text", "a=b&c")]);
        assert_eq!(signable_string(&p), "&text=a_b_c");
    }

    #[test]
    fn test_signable_string_excludes_existing_sig() {
        let p = params(&[("sig", "deadbeef"), ("to", "447700900000")]);
        assert_eq!(signable_string(&p), "&to=447700900000");
    }

    #[test]
    fn test_sign_params_adds_timestamp_and_sig() {
        let p = params(&[("from", "Acme")]);
        let signed = sign_params(p, "secret", SignatureMethod::HmacSha256, 1_700_000_000);

        assert_eq!(signed.get("timestamp").unwrap(), "1700000000");
        let sig = signed.get("sig").unwrap();
        assert_eq!(sig.len(), 64); // SHA256 = 32 bytes = 64 hex chars
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_sign_params_keeps_caller_timestamp() {
        let p = params(&[("timestamp", "42")]);
        let signed = sign_params(p, "secret", SignatureMethod::HmacSha256, 1_700_000_000);
        assert_eq!(signed.get("timestamp").unwrap(), "42");
    }

    #[test]
    fn test_sha512_digest_length() {
        let digest = compute_digest("&a=1", "secret", SignatureMethod::HmacSha512);
        assert_eq!(digest.len(), 128); // SHA512 = 64 bytes = 128 hex chars
    }

    #[test]
    fn test_signing_is_deterministic() {
        let a = compute_digest("&a=1", "secret", SignatureMethod::HmacSha256);
        let b = compute_digest("&a=1", "secret", SignatureMethod::HmacSha256);
        assert_eq!(a, b);
    }
}

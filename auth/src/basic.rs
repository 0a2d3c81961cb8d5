//! Basic-scheme credential envelope parsing.
//!
//! Every stage fails closed: a header that is not well-formed at any step
//! yields `None` rather than an error, so malformed input is indistinguishable
//! from absent credentials.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const SCHEME_PREFIX: &str = "Basic ";

/// Credentials carried by a `Basic` Authorization header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub identifier: String,
    pub secret: String,
}

impl BasicCredentials {
    /// Parse a full Authorization header value.
    ///
    /// Composes scheme extraction, base64 decoding, and credential splitting,
    /// short-circuiting to `None` at the first malformed stage.
    pub fn parse(header: &str) -> Option<Self> {
        let payload = strip_scheme(header)?;
        let decoded = decode_payload(payload)?;
        let (identifier, secret) = split_credentials(&decoded)?;
        Some(Self { identifier, secret })
    }
}

/// Returns the scheme payload of a header value starting with `"Basic "`.
pub fn strip_scheme(header: &str) -> Option<&str> {
    header.strip_prefix(SCHEME_PREFIX)
}

/// Base64-decodes a scheme payload into UTF-8 text.
pub fn decode_payload(payload: &str) -> Option<String> {
    let bytes = STANDARD.decode(payload).ok()?;
    String::from_utf8(bytes).ok()
}

/// Splits decoded text into identifier and secret on the FIRST `':'` only;
/// the secret may itself contain `':'`.
pub fn split_credentials(decoded: &str) -> Option<(String, String)> {
    decoded
        .split_once(':')
        .map(|(identifier, secret)| (identifier.to_string(), secret.to_string()))
}

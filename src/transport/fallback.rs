//! Scheme mismatch detection.
//!
//! Exposed instances are found by port scans, so the scheme in a target list
//! is often a guess. Talking TLS to a plaintext port (or the reverse) fails in
//! a handful of recognizable ways; those failures are worth one retry with
//! the other scheme.

/// Error fragments that indicate HTTP was spoken to an HTTPS port or the reverse.
///
/// Matched case-insensitively against the full error-source chain.
const SCHEME_MISMATCH_FRAGMENTS: &[&str] = &[
    "server gave http response to https client",
    "server gave https response to http client",
    // rustls reading a plaintext response as a TLS record
    "invalidcontenttype",
    "corrupt message",
    // openssl equivalent
    "wrong version number",
    // hyper reading a TLS record as an HTTP response
    "invalid http version parsed",
];

/// Returns `true` when the error text looks like a scheme mismatch.
pub fn is_scheme_mismatch(error_text: &str) -> bool {
    let lowered = error_text.to_lowercase();
    SCHEME_MISMATCH_FRAGMENTS
        .iter()
        .any(|fragment| lowered.contains(fragment))
}

/// Swaps `https://` for `http://` and vice versa. Returns `None` for any other scheme.
pub fn flip_scheme(url: &str) -> Option<String> {
    if let Some(rest) = url.strip_prefix("https://") {
        Some(format!("http://{rest}"))
    } else {
        url.strip_prefix("http://")
            .map(|rest| format!("https://{rest}"))
    }
}

/// Prefixes `http://` when the endpoint names no scheme.
pub fn with_default_scheme(endpoint: &str) -> String {
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}

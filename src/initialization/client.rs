//! HTTP client initialization.

use std::sync::Arc;

use reqwest::ClientBuilder;

use crate::error_handling::InitializationError;

/// Initializes the HTTP client shared by every probe.
///
/// Creates a `reqwest::Client` configured with:
/// - Invalid certificates accepted (exposed instances are mostly self-signed)
/// - No idle connections kept (each target is visited once)
/// - Rustls TLS backend
///
/// Timeouts are set per request.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client() -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .use_rustls_tls()
        .danger_accept_invalid_certs(true)
        .pool_max_idle_per_host(0)
        .build()?;
    Ok(Arc::new(client))
}

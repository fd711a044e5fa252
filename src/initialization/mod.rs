//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources of a run:
//! - HTTP client
//! - DNS resolver
//! - Logger
//! - Crypto provider

mod client;
mod logger;
mod resolver;

use std::sync::Arc;

use rustls::crypto::{ring::default_provider, CryptoProvider};
use tokio::sync::Semaphore;

pub use client::init_client;
pub use logger::init_logger_with;
pub use resolver::init_resolver;

/// Initializes the semaphore bounding how many targets are scanned at once.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count))
}

/// Installs `ring` as the process-wide `rustls` crypto provider.
///
/// Must run before any TLS connection is made.
pub fn init_crypto_provider() {
    // Reinstalling fails harmlessly
    let _ = CryptoProvider::install_default(default_provider());
}

//! Shared resources for scanning targets.
//!
//! One `ScanContext` is built per run and shared by every target task
//! through `Arc`, keeping probe and sampler signatures short.

use std::sync::Arc;

use hickory_resolver::TokioAsyncResolver;

use crate::error_handling::{update_error_stats, InfoType, ProcessingStats, TransportError};
use crate::transport::{self, Method, Reply};

/// Context containing all shared resources needed while scanning a target.
#[derive(Clone)]
pub struct ScanContext {
    /// HTTP client for target requests
    pub client: Arc<reqwest::Client>,
    /// DNS resolver for IP intelligence lookups
    pub resolver: Arc<TokioAsyncResolver>,
    /// Error statistics tracker
    pub stats: Arc<ProcessingStats>,
    /// Maximum number of collections sampled per target
    pub max_collections: usize,
    /// Documents requested per collection sample
    pub sample_size: usize,
}

impl ScanContext {
    /// Creates a new `ScanContext` with the given resources.
    pub fn new(
        client: Arc<reqwest::Client>,
        resolver: Arc<TokioAsyncResolver>,
        stats: Arc<ProcessingStats>,
        max_collections: usize,
        sample_size: usize,
    ) -> Self {
        Self {
            client,
            resolver,
            stats,
            max_collections,
            sample_size,
        }
    }

    /// Sends a request through the fail-safe transport and records the outcome
    /// in the run statistics.
    pub async fn request(
        &self,
        endpoint: &str,
        timeout_secs: u64,
        allow_retry: bool,
        headers: &[(&str, &str)],
        method: Method,
    ) -> Result<Reply, TransportError> {
        let result = transport::send(
            &self.client,
            endpoint,
            timeout_secs,
            allow_retry,
            headers,
            method,
        )
        .await;
        match &result {
            Ok(reply) if reply.fell_back => self.stats.increment_info(InfoType::ProtocolFallback),
            Ok(_) => {}
            Err(e) => update_error_stats(&self.stats, e),
        }
        result
    }
}

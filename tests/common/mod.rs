//! Shared helpers for integration tests.

use std::sync::Arc;

use index_harvest::initialization::{init_client, init_crypto_provider, init_resolver};
use index_harvest::{ProcessingStats, ScanContext};

/// Builds a scan context with the given caps and a fresh statistics tracker.
pub fn test_context(max_collections: usize, sample_size: usize) -> Arc<ScanContext> {
    init_crypto_provider();
    let client = init_client().expect("client should build");
    Arc::new(ScanContext::new(
        client,
        init_resolver(),
        Arc::new(ProcessingStats::new()),
        max_collections,
        sample_size,
    ))
}

//! Per-collection sampling.
//!
//! After enumeration, a bounded number of collections are sampled with a
//! small `_search` request each. Samples run concurrently behind an inner
//! semaphore whose size does not depend on the outer target pool.

use std::future::Future;
use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{debug, info, warn};
use serde_json::Value;
use tokio::sync::Semaphore;

use crate::aggregate::{Aggregator, HarvestSink};
use crate::classify::{extract_artifacts, extract_keyword_snippets};
use crate::config::COLLECTION_SCAN_CONCURRENCY;
use crate::models::InterestingCollectionInfo;

/// A fetched sample: the raw body (fed to extraction) and its parsed form.
pub type Sample = (String, Value);

/// Builds and sends the family-specific sample request for one collection.
pub trait SampleSource: Send + Sync + 'static {
    /// Returns `None` when the collection could not be sampled.
    fn fetch_sample(&self, collection: &str) -> impl Future<Output = Option<Sample>> + Send;
}

/// Picks the collections to sample: the first `cap` in enumeration order.
pub fn select_for_sampling(
    collections: &[InterestingCollectionInfo],
    cap: usize,
) -> &[InterestingCollectionInfo] {
    &collections[..collections.len().min(cap)]
}

/// Samples up to `max_collections` collections and merges what they reveal
/// into the aggregator.
///
/// # Arguments
///
/// * `collections` - Surviving collections, in enumeration order
/// * `max_collections` - Sampling cap
/// * `source` - Family-specific request builder
/// * `aggregator` - Destination for samples and extracted artifacts
///
/// # Returns
///
/// The number of collections that were sampled successfully.
pub async fn scan_collections<S, R>(
    collections: &[InterestingCollectionInfo],
    max_collections: usize,
    source: Arc<S>,
    aggregator: Arc<Aggregator<R>>,
) -> usize
where
    S: SampleSource,
    R: HarvestSink + Send + 'static,
{
    let selected = select_for_sampling(collections, max_collections);
    if selected.len() < collections.len() {
        info!(
            "{} collections listed, sampling only the first {}",
            collections.len(),
            selected.len()
        );
    }

    let semaphore = Arc::new(Semaphore::new(COLLECTION_SCAN_CONCURRENCY));
    let mut tasks = FuturesUnordered::new();

    for collection in selected {
        let name = collection.index.clone();
        let source = Arc::clone(&source);
        let aggregator = Arc::clone(&aggregator);
        let semaphore = Arc::clone(&semaphore);
        tasks.push(tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return false;
            };
            let Some((raw, parsed)) = source.fetch_sample(&name).await else {
                debug!("No usable sample for collection {}", name);
                return false;
            };
            let artifacts = extract_artifacts(&raw);
            let snippets = extract_keyword_snippets(&raw);
            aggregator.store_sample(name, parsed);
            aggregator.merge(artifacts, snippets);
            true
        }));
    }

    let mut sampled = 0;
    while let Some(result) = tasks.next().await {
        match result {
            Ok(true) => sampled += 1,
            Ok(false) => {}
            Err(join_error) => warn!("Sample task panicked: {:?}", join_error),
        }
    }
    sampled
}

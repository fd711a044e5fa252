//! Search-engine probe.
//!
//! Talks to the engine's REST API directly. Enumeration fires the four
//! `_cat` listings at once; any one of them answering is enough to call the
//! instance initialized, even if the index listing itself failed.

use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::Value;

use super::{keep_interesting, resolved_base};
use crate::aggregate::Aggregator;
use crate::classify::has_collection_over_gb;
use crate::config::{
    ENUMERATION_TIMEOUT_SECS, SAMPLE_TIMEOUT_SECS, SEARCH_HEADERS, SEARCH_LIVENESS_TIMEOUT_SECS,
};
use crate::context::ScanContext;
use crate::error_handling::{ErrorType, InfoType, TransportError};
use crate::models::{CollectionDescriptor, ScanResult};
use crate::sample::{scan_collections, Sample, SampleSource};
use crate::transport::{Method, Reply};

const INDICES_ENDPOINT: &str = "_cat/indices?format=json&size=1000";
const ALIASES_ENDPOINT: &str = "_cat/aliases?format=json";
const ALLOCATION_ENDPOINT: &str = "_cat/allocation?format=json";
const NODES_ENDPOINT: &str = "_cat/nodes?format=json";

/// Outcome of the four enumeration calls.
#[derive(Debug, Default)]
pub struct Enumeration {
    /// How many of the calls got any HTTP response
    pub successes: usize,
    pub collections: Option<Vec<CollectionDescriptor>>,
    pub aliases: Option<Vec<Value>>,
    pub allocations: Option<Vec<Value>>,
    pub nodes: Option<Vec<Value>>,
}

/// Scans one search-engine target.
///
/// # Arguments
///
/// * `ctx` - Shared scan resources
/// * `target` - Target as read from the input file
///
/// # Returns
///
/// The finished record. Never fails: every problem is logged and reflected
/// in the record instead.
pub async fn scan(ctx: &Arc<ScanContext>, target: &str) -> ScanResult {
    let mut record = ScanResult::new(target);

    let liveness = ctx
        .request(
            target,
            SEARCH_LIVENESS_TIMEOUT_SECS,
            true,
            SEARCH_HEADERS,
            Method::Get,
        )
        .await;
    let base = match liveness {
        Ok(reply) => resolved_base(target, &reply),
        Err(e) => {
            debug!("{} is not reachable: {}", target, e);
            ctx.stats.increment_info(InfoType::DeadTarget);
            return record;
        }
    };
    info!("{} is a working search-engine instance", target);

    let enumeration = enumerate(ctx, &base).await;
    record.is_initialized = enumeration.successes > 0;
    record.aliases = enumeration.aliases;
    record.allocations = enumeration.allocations;
    record.nodes = enumeration.nodes;

    let Some(collections) = enumeration.collections else {
        warn!("Failed to get collections from {}", target);
        return record;
    };
    record.indices = keep_interesting(&collections, &ctx.stats);
    record.has_large_collection = has_collection_over_gb(&record.indices);
    if record.indices.is_empty() {
        return record;
    }

    let collections = record.indices.clone();
    let sampler = Arc::new(SearchSampler {
        ctx: Arc::clone(ctx),
        base,
    });
    let aggregator = Arc::new(Aggregator::new(record));
    let sampled = scan_collections(
        &collections,
        ctx.max_collections,
        sampler,
        Arc::clone(&aggregator),
    )
    .await;
    info!("Sampled {} collections on {}", sampled, target);
    Aggregator::unwrap_shared(aggregator)
}

/// Runs the four `_cat` listings concurrently.
pub async fn enumerate(ctx: &ScanContext, base: &str) -> Enumeration {
    let get = |path: &'static str| {
        let endpoint = format!("{}/{}", base, path);
        async move {
            ctx.request(
                &endpoint,
                ENUMERATION_TIMEOUT_SECS,
                true,
                SEARCH_HEADERS,
                Method::Get,
            )
            .await
        }
    };

    let (indices, aliases, allocations, nodes) = tokio::join!(
        get(INDICES_ENDPOINT),
        get(ALIASES_ENDPOINT),
        get(ALLOCATION_ENDPOINT),
        get(NODES_ENDPOINT),
    );

    let successes = [&indices, &aliases, &allocations, &nodes]
        .iter()
        .filter(|r| r.is_ok())
        .count();

    Enumeration {
        successes,
        collections: parse_listing(ctx, base, INDICES_ENDPOINT, indices),
        aliases: parse_listing(ctx, base, ALIASES_ENDPOINT, aliases),
        allocations: parse_listing(ctx, base, ALLOCATION_ENDPOINT, allocations),
        nodes: parse_listing(ctx, base, NODES_ENDPOINT, nodes),
    }
}

/// Parses one listing; a failure only loses that listing.
fn parse_listing<T: serde::de::DeserializeOwned>(
    ctx: &ScanContext,
    base: &str,
    path: &str,
    result: Result<Reply, TransportError>,
) -> Option<Vec<T>> {
    let reply = result.ok()?;
    match serde_json::from_str::<Vec<T>>(&reply.body) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!(
                "Unexpected {} body from {}/{}: {}",
                reply.status, base, path, e
            );
            ctx.stats.increment_error(ErrorType::ResponseParseError);
            None
        }
    }
}

/// Samples a collection with `GET {base}/{collection}/_search`.
pub struct SearchSampler {
    ctx: Arc<ScanContext>,
    base: String,
}

impl SampleSource for SearchSampler {
    async fn fetch_sample(&self, collection: &str) -> Option<Sample> {
        let endpoint = format!(
            "{}/{}/_search?format=json&size={}",
            self.base, collection, self.ctx.sample_size
        );
        let reply = match self
            .ctx
            .request(&endpoint, SAMPLE_TIMEOUT_SECS, true, SEARCH_HEADERS, Method::Get)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                debug!("Sample request {} failed: {}", endpoint, e);
                self.ctx.stats.increment_error(ErrorType::SampleFetchError);
                return None;
            }
        };
        match serde_json::from_str::<Value>(&reply.body) {
            Ok(parsed) => Some((reply.body, parsed)),
            Err(e) => {
                debug!("Sample from {} is not JSON: {}", endpoint, e);
                self.ctx.stats.increment_error(ErrorType::ResponseParseError);
                None
            }
        }
    }
}

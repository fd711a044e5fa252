//! Dashboard-console probe.
//!
//! Everything goes through the console's proxy endpoint, with the headers
//! the console insists on. Requests are never retried with the other
//! scheme.

use std::sync::Arc;

use log::{debug, info};

use super::keep_interesting;
use super::shapes::{parse_collections, ApiShape, ExpectedShape, CONSOLE_SHAPES};
use crate::aggregate::Aggregator;
use crate::classify::has_collection_over_gb;
use crate::config::{
    CONSOLE_HEADERS, CONSOLE_LIVENESS_TIMEOUT_SECS, ENUMERATION_TIMEOUT_SECS, SAMPLE_TIMEOUT_SECS,
};
use crate::context::ScanContext;
use crate::error_handling::{ErrorType, InfoType};
use crate::models::{CollectionDescriptor, ScanResult};
use crate::sample::{scan_collections, Sample, SampleSource};
use crate::transport::{with_default_scheme, Method};

/// Scans one console target. IP intelligence is gathered separately.
pub async fn scan(ctx: &Arc<ScanContext>, target: &str) -> ScanResult {
    let mut record = ScanResult::new(target);
    let base = with_default_scheme(target);

    if !is_alive(ctx, &base).await {
        debug!("{} is down", target);
        ctx.stats.increment_info(InfoType::DeadTarget);
        return record;
    }
    info!("{} has a working console front-end", target);

    let Some((shape, collections)) = enumerate(ctx, &base).await else {
        info!("Failed to get collections from {}", target);
        return record;
    };
    debug!("{} answers the {} proxy layout", target, shape.name);

    record.is_initialized = true;
    record.indices = keep_interesting(&collections, &ctx.stats);
    record.has_large_collection = has_collection_over_gb(&record.indices);
    if record.indices.is_empty() {
        return record;
    }

    let collections = record.indices.clone();
    let sampler = Arc::new(ConsoleSampler {
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

/// The console is dead when it answers with neither a body nor a 200.
async fn is_alive(ctx: &ScanContext, base: &str) -> bool {
    match ctx
        .request(
            base,
            CONSOLE_LIVENESS_TIMEOUT_SECS,
            false,
            CONSOLE_HEADERS,
            Method::Get,
        )
        .await
    {
        Ok(reply) => !(reply.body.is_empty() && reply.status != 200),
        Err(e) => {
            debug!("Console front-end {} unreachable: {}", base, e.detail());
            false
        }
    }
}

/// Tries each proxy layout in order; the first 200 with a collection listing wins.
pub async fn enumerate(
    ctx: &ScanContext,
    base: &str,
) -> Option<(ApiShape, Vec<CollectionDescriptor>)> {
    for shape in CONSOLE_SHAPES {
        let endpoint = shape.collections_endpoint(base);
        let Ok(reply) = ctx
            .request(
                &endpoint,
                ENUMERATION_TIMEOUT_SECS,
                false,
                CONSOLE_HEADERS,
                shape.method,
            )
            .await
        else {
            continue;
        };
        match ExpectedShape::CollectionList
            .accept(&reply)
            .and_then(parse_collections)
        {
            Some(collections) => return Some((*shape, collections)),
            None => debug!(
                "{} layout rejected by {} (status {})",
                shape.name, base, reply.status
            ),
        }
    }
    None
}

/// Samples a collection through the proxy, trying every layout in order.
pub struct ConsoleSampler {
    ctx: Arc<ScanContext>,
    base: String,
}

impl SampleSource for ConsoleSampler {
    async fn fetch_sample(&self, collection: &str) -> Option<Sample> {
        for shape in CONSOLE_SHAPES {
            let endpoint = shape.search_endpoint(&self.base, collection, self.ctx.sample_size);
            let Ok(reply) = self
                .ctx
                .request(
                    &endpoint,
                    SAMPLE_TIMEOUT_SECS,
                    false,
                    CONSOLE_HEADERS,
                    shape.method,
                )
                .await
            else {
                continue;
            };
            if let Some(parsed) = ExpectedShape::SearchObject.accept(&reply) {
                return Some((reply.body, parsed));
            }
        }
        debug!("No proxy layout returned a sample of {}", collection);
        self.ctx.stats.increment_error(ErrorType::SampleFetchError);
        None
    }
}

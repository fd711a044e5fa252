//! Per-target result aggregation.
//!
//! Collection samples finish in any order on different tasks; the
//! aggregator is the only place they write into the target's record.

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::models::{ExtractedArtifacts, ScanResult};

/// What a record must support to receive sampled content.
pub trait HarvestSink {
    /// Unions extracted artifacts into the record.
    fn append_artifacts(&mut self, artifacts: ExtractedArtifacts);
    /// Adds keyword snippets, ignoring ones already present.
    fn append_snippets(&mut self, snippets: Vec<String>);
    /// Keeps the parsed sample of one collection.
    fn store_sample(&mut self, collection: String, sample: Value);
}

impl HarvestSink for ScanResult {
    fn append_artifacts(&mut self, artifacts: ExtractedArtifacts) {
        self.interesting_info.union_with(artifacts);
    }

    fn append_snippets(&mut self, snippets: Vec<String>) {
        self.interesting_words.extend(snippets);
    }

    fn store_sample(&mut self, collection: String, sample: Value) {
        self.indices_info.insert(collection, sample);
    }
}

/// Serializes concurrent writes into one record.
pub struct Aggregator<R: HarvestSink> {
    record: Mutex<R>,
}

impl<R: HarvestSink> Aggregator<R> {
    pub fn new(record: R) -> Self {
        Aggregator {
            record: Mutex::new(record),
        }
    }

    // Each write is one call on the record, so a poisoned lock still guards a consistent record.
    fn lock(&self) -> MutexGuard<'_, R> {
        self.record.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Merges one sample's artifacts and snippets under a single lock.
    pub fn merge(&self, artifacts: ExtractedArtifacts, snippets: Vec<String>) {
        let mut record = self.lock();
        record.append_artifacts(artifacts);
        record.append_snippets(snippets);
    }

    pub fn store_sample(&self, collection: String, sample: Value) {
        self.lock().store_sample(collection, sample);
    }

    /// Gives the record back once every writer is done.
    pub fn into_inner(self) -> R {
        self.record
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<R: HarvestSink + Clone> Aggregator<R> {
    /// Recovers the record from a shared aggregator.
    ///
    /// Once every sampler has been joined this is the last reference and the
    /// record is moved out; otherwise a copy is taken under the lock.
    pub fn unwrap_shared(shared: Arc<Self>) -> R {
        match Arc::try_unwrap(shared) {
            Ok(aggregator) => aggregator.into_inner(),
            Err(shared) => {
                log::warn!("Record still shared after sampling, taking a copy");
                shared.lock().clone()
            }
        }
    }
}

//! Per-target task processing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::debug;
use tokio::sync::OwnedSemaphorePermit;

use crate::config::TargetFamily;
use crate::context::ScanContext;
use crate::intel::lookup_ip_intel;
use crate::models::ScanResult;
use crate::output::Sink;
use crate::probe::{console, search};

/// Everything one spawned target task owns.
pub(crate) struct TargetTask {
    pub target: String,
    pub family: TargetFamily,
    pub ctx: Arc<ScanContext>,
    pub sink: Arc<Sink>,
    pub completed: Arc<AtomicUsize>,
    pub initialized: Arc<AtomicUsize>,
    pub permit: OwnedSemaphorePermit,
}

/// Scans one target, hands the record to the sink, then counts it as completed.
pub(crate) async fn process_target(task: TargetTask) {
    let TargetTask {
        target,
        family,
        ctx,
        sink,
        completed,
        initialized,
        permit: _permit, // Hold the slot until the record is written
    } = task;

    let record = scan_target(&ctx, family, &target).await;
    if record.is_initialized {
        initialized.fetch_add(1, Ordering::SeqCst);
    }
    sink.write(&record, &ctx.stats).await;
    completed.fetch_add(1, Ordering::SeqCst);
    debug!("Finished {}", target);
}

/// Runs the family's probe. Console targets get IP intelligence gathered
/// alongside the probe.
pub async fn scan_target(
    ctx: &Arc<ScanContext>,
    family: TargetFamily,
    target: &str,
) -> ScanResult {
    match family {
        TargetFamily::Elasticsearch => search::scan(ctx, target).await,
        TargetFamily::Kibana => {
            let (mut record, intel) = tokio::join!(
                console::scan(ctx, target),
                lookup_ip_intel(target, &ctx.resolver),
            );
            record.ip_info = Some(intel);
            record
        }
    }
}

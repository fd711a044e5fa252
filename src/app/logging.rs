//! Progress logging utilities.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::info;
use tokio_util::sync::CancellationToken;

use crate::config::PROGRESS_INTERVAL_SECS;

/// Logs `completed/total` with the elapsed time.
pub fn log_progress(start_time: Instant, completed: &AtomicUsize, total: usize) {
    let completed = completed.load(Ordering::SeqCst);
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        completed as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Progress: {}/{} targets in {:.1}s (~{:.2} targets/sec)",
        completed, total, elapsed_secs, rate
    );
}

/// Logs progress every `PROGRESS_INTERVAL_SECS` until `cancel` fires.
pub fn spawn_progress_reporter(
    start_time: Instant,
    completed: Arc<AtomicUsize>,
    total: usize,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(PROGRESS_INTERVAL_SECS));
        // The first tick fires immediately
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => log_progress(start_time, &completed, total),
                _ = cancel.cancelled() => break,
            }
        }
    })
}

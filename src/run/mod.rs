//! Scan orchestration.
//!
//! Targets are dispatched in file order into a pool bounded by the
//! configured thread count. Each task scans its target to completion, hands
//! the record to the sink and bumps the completed counter.

mod targets;
mod task;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::app::{
    install_interrupt_handler, log_progress, print_error_statistics, shutdown_gracefully,
    spawn_progress_reporter,
};
use crate::config::Config;
use crate::context::ScanContext;
use crate::error_handling::{ErrorType, ProcessingStats};
use crate::initialization::{init_client, init_resolver, init_semaphore};
use crate::output::Sink;

pub use targets::{parse_targets, read_targets};
pub use task::scan_target;
use task::{process_target, TargetTask};

/// Results of a scanning run.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Targets read from the input file
    pub total_targets: usize,
    /// Targets whose record reached the sink
    pub completed: usize,
    /// Targets whose record came back initialized
    pub live: usize,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
    /// Where the records went
    pub output: String,
}

/// Runs a scan with the provided configuration.
///
/// This is the main entry point for the library. It reads targets from the
/// input file, scans them concurrently and writes one record per target to
/// the configured sink.
///
/// # Errors
///
/// This function will return an error if:
/// - The configuration is invalid
/// - The input file cannot be read
/// - The HTTP client or the output sink cannot be initialized
/// - The output cannot be finalized
///
/// # Example
///
/// ```no_run
/// use index_harvest::{run_scan, Config, TargetFamily};
/// use std::path::PathBuf;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config {
///     file: PathBuf::from("targets.txt"),
///     family: TargetFamily::Elasticsearch,
///     ..Default::default()
/// };
/// let report = run_scan(config).await?;
/// println!("{} of {} targets were live", report.live, report.total_targets);
/// # Ok(())
/// # }
/// ```
pub async fn run_scan(config: Config) -> Result<ScanReport> {
    config.validate().context("Invalid configuration")?;

    let targets = read_targets(&config.file).await?;
    let total_targets = targets.len();
    info!(
        "Total {} targets in file: {}",
        config.family.as_str(),
        total_targets
    );

    let client = init_client().context("Failed to initialize HTTP client")?;
    let resolver = init_resolver();
    let stats = Arc::new(ProcessingStats::new());
    let ctx = Arc::new(ScanContext::new(
        client,
        resolver,
        Arc::clone(&stats),
        config.max_collections,
        config.sample_size,
    ));

    let sink = Arc::new(
        Sink::open(&config)
            .await
            .context("Failed to initialize output")?,
    );
    info!("Writing results to {}", sink.describe());
    let cancel = CancellationToken::new();
    let _interrupt_handler = install_interrupt_handler(Arc::clone(&sink), cancel.child_token());

    let start_time = Instant::now();
    let completed = Arc::new(AtomicUsize::new(0));
    let initialized = Arc::new(AtomicUsize::new(0));

    let reporter = spawn_progress_reporter(
        start_time,
        Arc::clone(&completed),
        total_targets,
        cancel.child_token(),
    );

    let semaphore = init_semaphore(config.threads);
    let mut tasks = FuturesUnordered::new();
    for target in targets {
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Semaphore closed, skipping target: {target}");
                continue;
            }
        };
        tasks.push(tokio::spawn(process_target(TargetTask {
            target,
            family: config.family,
            ctx: Arc::clone(&ctx),
            sink: Arc::clone(&sink),
            completed: Arc::clone(&completed),
            initialized: Arc::clone(&initialized),
            permit,
        })));
    }

    while let Some(task_result) = tasks.next().await {
        if let Err(join_error) = task_result {
            stats.increment_error(ErrorType::TaskPanic);
            warn!("Target task panicked: {:?}", join_error);
        }
    }

    // An interrupt already being handled keeps finalizing; the call below then waits for it.
    shutdown_gracefully(cancel, reporter).await;
    log_progress(start_time, &completed, total_targets);

    sink.finalize()
        .await
        .with_context(|| format!("Failed to finalize {}", sink.describe()))?;

    print_error_statistics(&stats);

    Ok(ScanReport {
        total_targets,
        completed: completed.load(Ordering::SeqCst),
        live: initialized.load(Ordering::SeqCst),
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
        output: sink.describe(),
    })
}

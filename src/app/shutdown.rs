//! Graceful shutdown and interrupt handling.

use std::sync::Arc;
use std::time::Duration;

use log::{error, warn};
use tokio_util::sync::CancellationToken;

use crate::config::INTERRUPT_NOTICE_INTERVAL_SECS;
use crate::output::Sink;

/// Stops the progress reporter and waits for it.
pub async fn shutdown_gracefully(
    cancel: CancellationToken,
    reporter: tokio::task::JoinHandle<()>,
) {
    cancel.cancel();
    let _ = reporter.await;
}

/// Finalizes a `json` output on Ctrl+C, then exits with code 0.
///
/// In-flight targets keep running while the output is finalized. Signals
/// arriving during finalization only repeat the notice. Cancelling `stop`
/// before any signal arrives uninstalls the handler.
pub fn install_interrupt_handler(
    sink: Arc<Sink>,
    stop: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if signal.is_err() {
                    warn!("Cannot listen for Ctrl+C; interrupts will not finalize the output");
                    return;
                }
            }
            _ = stop.cancelled() => return,
        }
        warn!("Interrupted with Ctrl+C. Finalizing..");

        let finalize = async {
            match sink.as_ref() {
                Sink::Json(file) => file.finalize().await,
                Sink::Plain(_) | Sink::Store(_) => Ok(()),
            }
        };
        tokio::pin!(finalize);
        let mut notice =
            tokio::time::interval(Duration::from_secs(INTERRUPT_NOTICE_INTERVAL_SECS));
        notice.tick().await;
        loop {
            tokio::select! {
                result = &mut finalize => {
                    if let Err(e) = result {
                        error!("Failed to finalize {}: {:#}", sink.describe(), e);
                    }
                    break;
                }
                Ok(()) = tokio::signal::ctrl_c() => warn!("Interrupted with Ctrl+C. Finalizing.."),
                _ = notice.tick() => warn!("Still finalizing {}..", sink.describe()),
            }
        }
        std::process::exit(0);
    })
}

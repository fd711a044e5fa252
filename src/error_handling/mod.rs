//! Error handling and processing statistics.
//!
//! This module provides:
//! - Typed errors for initialization, configuration, transport and storage
//! - Processing statistics tracking (error and info counters)
//! - Error categorization and error-chain rendering
//!
//! Counters are split into:
//! - **Errors**: Failures local to one request or one target
//! - **Info**: Notable events (protocol fallback, duplicates, dead targets)

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_transport_error, error_chain_text, update_error_stats};
pub use stats::ProcessingStats;
pub use types::{
    ConfigError, DatabaseError, ErrorType, InfoType, InitializationError, TransportError,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use strum::IntoEnumIterator;

    #[test]
    fn test_processing_stats_initialization() {
        let stats = ProcessingStats::new();
        for error_type in ErrorType::iter() {
            assert_eq!(stats.get_error_count(error_type), 0);
        }
        for info_type in InfoType::iter() {
            assert_eq!(stats.get_info_count(info_type), 0);
        }
    }

    #[test]
    fn test_processing_stats_totals() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::SampleFetchError);
        stats.increment_error(ErrorType::HttpRequestTimeoutError);
        stats.increment_info(InfoType::ProtocolFallback);

        assert_eq!(stats.total_errors(), 2);
        assert_eq!(stats.total_info(), 1);
    }

    #[test]
    fn test_processing_stats_concurrent_increments() {
        let stats = Arc::new(ProcessingStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        stats.increment_info(InfoType::DeadTarget);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(stats.get_info_count(InfoType::DeadTarget), 800);
    }
}

//! index_harvest library: fingerprinting of exposed search-engine and
//! dashboard-console instances.
//!
//! Each target is checked for liveness, its collections (indices) are
//! enumerated and filtered, a few documents of the interesting ones are
//! sampled, and the samples are mined for emails, URLs, public IPs and
//! keyword snippets. Console targets are additionally attributed through
//! reverse DNS, their TLS certificate and CNAME records.
//!
//! # Example
//!
//! ```no_run
//! use index_harvest::{run_scan, Config, OutputMode, TargetFamily};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file: std::path::PathBuf::from("targets.txt"),
//!     family: TargetFamily::Kibana,
//!     output_mode: OutputMode::Json,
//!     output_file: std::path::PathBuf::from("kibana.json"),
//!     threads: 20,
//!     ..Default::default()
//! };
//!
//! let report = run_scan(config).await?;
//! println!("Scanned {} targets, {} live", report.completed, report.live);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod aggregate;
mod app;
pub mod classify;
pub mod config;
pub mod context;
mod error_handling;
pub mod initialization;
pub mod intel;
pub mod models;
pub mod output;
pub mod probe;
mod run;
mod sample;
mod storage;
pub mod transport;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, Opt, OutputMode, TargetFamily};
pub use context::ScanContext;
pub use error_handling::{
    ConfigError, DatabaseError, ErrorType, InfoType, InitializationError, ProcessingStats,
    TransportError,
};
pub use models::ScanResult;
pub use run::{parse_targets, run_scan, scan_target, ScanReport};
pub use storage::run_migrations;

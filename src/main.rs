//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `index_harvest` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use index_harvest::initialization::{init_crypto_provider, init_logger_with};
use index_harvest::{run_scan, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    // Lets RUST_LOG live in a .env file next to the target lists
    let _ = dotenvy::dotenv();

    let opt = Opt::parse();
    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let config = Config::from(opt);
    if let Err(e) = config.validate() {
        eprintln!("index_harvest error: {}", e);
        process::exit(1);
    }

    init_crypto_provider();

    match run_scan(config).await {
        Ok(report) => {
            println!(
                "Scanned {} of {} target{} ({} live) in {:.1}s",
                report.completed,
                report.total_targets,
                if report.total_targets == 1 { "" } else { "s" },
                report.live,
                report.elapsed_seconds
            );
            println!("Results saved in {}", report.output);
            Ok(())
        }
        Err(e) => {
            eprintln!("index_harvest error: {:#}", e);
            process::exit(1);
        }
    }
}

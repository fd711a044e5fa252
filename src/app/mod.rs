//! Run-level helpers: progress logging, interrupt handling and statistics.

pub mod logging;
pub mod shutdown;
pub mod statistics;

pub use logging::{log_progress, spawn_progress_reporter};
pub use shutdown::{install_interrupt_handler, shutdown_gracefully};
pub use statistics::print_error_statistics;

//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, pool sizes, defaults)
//! - Request header sets per target family
//! - CLI option types and the library-level `Config`

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{Config, LogFormat, LogLevel, Opt, OutputMode, TargetFamily};

//! Configuration constants.
//!
//! This module defines the operational constants used throughout the scanner:
//! per-call timeouts, pool sizes and the defaults backing the CLI options.

/// Default number of targets scanned concurrently (outer pool)
pub const DEFAULT_THREADS: usize = 8;
/// Inner pool size for per-collection sampling.
///
/// Fixed regardless of the outer thread count. Each sample keeps a socket and
/// a potentially large response body alive, so this bounds open file
/// descriptors and memory per target.
pub const COLLECTION_SCAN_CONCURRENCY: usize = 5;
/// Default number of collections sampled per target
pub const DEFAULT_MAX_COLLECTIONS: usize = 5;
/// Default number of documents requested per collection sample
pub const DEFAULT_SAMPLE_SIZE: usize = 70;

/// Interval between progress log lines, in seconds
pub const PROGRESS_INTERVAL_SECS: u64 = 2;
/// Interval between repeated "finalizing" notices after an interrupt
pub const INTERRUPT_NOTICE_INTERVAL_SECS: u64 = 2;

// Per-call HTTP timeouts (seconds)
/// Search-engine root liveness request
pub const SEARCH_LIVENESS_TIMEOUT_SECS: u64 = 10;
/// Console root liveness request
pub const CONSOLE_LIVENESS_TIMEOUT_SECS: u64 = 15;
/// `_cat/*` informational requests and console enumeration
pub const ENUMERATION_TIMEOUT_SECS: u64 = 15;
/// Collection sample requests. Kept moderate: samples can be large and a long
/// tail of slow servers holds memory on low-end machines.
pub const SAMPLE_TIMEOUT_SECS: u64 = 30;

// IP intelligence
/// TCP connect timeout for the certificate probe
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// TLS handshake timeout for the certificate probe
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;
/// DNS query timeout
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// Upper bound for any single IP-intelligence lookup
pub const INTEL_LOOKUP_TIMEOUT_SECS: u64 = 5;
/// Port used for the certificate probe when the target names none
pub const DEFAULT_TLS_PORT: u16 = 443;

// Output
/// Default output file for the search-engine family
pub const DEFAULT_SEARCH_OUTPUT: &str = "elasticsearch.json";
/// Default output file for the console family
pub const DEFAULT_CONSOLE_OUTPUT: &str = "kibana.json";
/// Default SQLite database for the document-store output mode
pub const DB_PATH: &str = "./index_harvest.db";
/// Timeout for a single document-store insert
pub const STORE_INSERT_TIMEOUT_SECS: u64 = 10;

/// Length of the context captured after a keyword match
pub const KEYWORD_CONTEXT_CHARS: usize = 30;

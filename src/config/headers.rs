//! Request header sets.
//!
//! The console rejects proxied API calls that lack `kbn-xsrf`; its value is
//! never checked, only its presence.

/// Headers sent with every console request, including the liveness check.
pub const CONSOLE_HEADERS: &[(&str, &str)] = &[
    ("kbn-xsrf", "_"),
    ("Content-Type", "application/json"),
    ("User-Agent", "curl/7.0.0"),
    ("Accept", "*/*"),
];

/// Headers sent with search-engine requests (none beyond the client defaults).
pub const SEARCH_HEADERS: &[(&str, &str)] = &[];

//! Collection name filtering and size checks.
//!
//! Exposed clusters are full of indices that carry nothing worth sampling:
//! internal bookkeeping, ransom notes left by wiper bots, framework demo data.
//! The lists below were collected from real scans.

use crate::models::InterestingCollectionInfo;

/// A collection whose name starts with one of these is internal bookkeeping.
pub const UNINTERESTING_PREFIXES: &[&str] = &[".kibana", ".apm", "ilm-history"];

/// Names that are dropped only on an exact match.
pub const UNINTERESTING_EXACT_NAMES: &[&str] = &[
    "service",
    "auth",
    "actions",
    "casa",
    "website",
    "api",
    "login",
    "config",
    "oauth",
    "connect",
    "v1",
    "v2",
    "km.asmx",
    "biz",
    "wap",
    "courseware_index",
    "v3",
    "video_info",
    ".elastichq",
    "btc.bitfinex.ticker",
    "eth.bitfinex.ticker",
    "btc.bitmex.ticker",
];

/// Names that are dropped when they appear anywhere in the collection name.
pub const UNINTERESTING_SUBSTRINGS: &[&str] = &[
    // left behind by wiper bots
    "meow",
    "readme",
    "read_me",
    "read__me",
    ".geoip_databases",
    ".async-search",
    "magento",
    "market.kline",
    "waveland-datas",
    "resources_index",
    "company-datas",
    "movies",
    // framework scaffolding
    "zend3",
    "casa",
    "kkrp",
    "actuator",
    "m.api",
    "solr",
    "minio",
    "daman",
    "index.php",
    "index.js",
    "index.jsp",
    "index.py",
    "index.do",
    "index.htm",
    "index.html",
    "index.cfm",
    "index.aspx",
    "index.cgi",
    "index.pl",
    "index.asp",
    "index.action",
    "yz.jsp",
    "ilm-history",
    "seismic",
    "result-logs",
    "demo",
    "vue_storefront",
    "produtos",
];

/// Size suffixes reported by `_cat/indices` for a gigabyte or more.
const LARGE_SIZE_SUFFIXES: &[&str] = &["gb", "tb", "pb"];

/// Returns `true` when a collection name is known noise and should be neither
/// sampled nor reported.
///
/// # Arguments
///
/// * `name` - Collection (index) name as listed by the server
pub fn is_uninteresting(name: &str) -> bool {
    UNINTERESTING_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
        || UNINTERESTING_EXACT_NAMES.contains(&name)
        || UNINTERESTING_SUBSTRINGS
            .iter()
            .any(|noisy| name.contains(noisy))
}

fn has_large_suffix(size: &str) -> bool {
    let size = size.trim().to_ascii_lowercase();
    LARGE_SIZE_SUFFIXES
        .iter()
        .any(|suffix| size.ends_with(suffix))
}

/// Returns `true` if any collection stores a gigabyte or more, judging by
/// either `store.size` or `pri.store.size`.
pub fn has_collection_over_gb(collections: &[InterestingCollectionInfo]) -> bool {
    collections
        .iter()
        .any(|c| has_large_suffix(&c.store_size) || has_large_suffix(&c.pri_store_size))
}

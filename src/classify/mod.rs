//! Heuristic classification of collections and sampled content.
//!
//! This module provides:
//! - Collection name filtering (`is_uninteresting`) and size checks
//! - Artifact and keyword-snippet extraction from raw sample text

mod collections;
mod extract;
mod patterns;

pub use collections::{has_collection_over_gb, is_uninteresting};
pub use extract::{extract_artifacts, extract_keyword_snippets};
pub use patterns::INTERESTING_KEYWORDS;
pub(crate) use patterns::URL_RE;

//! Target probing.
//!
//! A probe takes one target from unknown to a classified record:
//! liveness check, collection enumeration, name filtering, then sampling.
//! A target that fails liveness is reported with `isInitialized = false` and
//! nothing else.

pub mod console;
pub mod search;
pub mod shapes;

use crate::classify::is_uninteresting;
use crate::error_handling::{InfoType, ProcessingStats};
use crate::models::{CollectionDescriptor, InterestingCollectionInfo};
use crate::transport::{flip_scheme, with_default_scheme, Reply};

/// Base URL for every request after the liveness check.
///
/// When liveness only succeeded after a scheme flip, later requests start
/// from the scheme that answered instead of failing over again.
pub(crate) fn resolved_base(target: &str, liveness: &Reply) -> String {
    let base = with_default_scheme(target);
    if liveness.fell_back {
        flip_scheme(&base).unwrap_or(base)
    } else {
        base
    }
}

/// Drops noise collections and keeps the reported fields of the rest,
/// preserving enumeration order.
pub(crate) fn keep_interesting(
    collections: &[CollectionDescriptor],
    stats: &ProcessingStats,
) -> Vec<InterestingCollectionInfo> {
    collections
        .iter()
        .filter(|c| {
            let noisy = is_uninteresting(&c.index);
            if noisy {
                stats.increment_info(InfoType::CollectionFiltered);
            }
            !noisy
        })
        .map(InterestingCollectionInfo::from)
        .collect()
}

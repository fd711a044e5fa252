//! Reverse DNS and CNAME lookups.

use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::TokioAsyncResolver;
use log::debug;

use super::Endpoint;

/// PTR suffixes that only say "some hosting provider" and name no one.
const GENERIC_HOSTING_SUFFIXES: &[&str] = &[
    "amazonaws.com.",
    "googleusercontent.com.",
    "linode.com.",
    "awsglobalaccelerator.com.",
    "vultr.com.",
    "fios.verizon.net.",
];

pub(crate) fn is_generic_hosting_name(name: &str) -> bool {
    GENERIC_HOSTING_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

/// First PTR name of the target's address that is not a generic hosting name.
///
/// Hostname targets are resolved first and their first address is used.
pub(super) async fn reverse_name(
    endpoint: &Endpoint,
    resolver: &TokioAsyncResolver,
) -> Option<String> {
    let ip = match endpoint.ip() {
        Some(ip) => ip,
        None => match resolver.lookup_ip(endpoint.host.as_str()).await {
            Ok(lookup) => lookup.iter().next()?,
            Err(e) => {
                debug!("Failed to resolve {}: {}", endpoint.host, e);
                return None;
            }
        },
    };

    match resolver.reverse_lookup(ip).await {
        Ok(response) => first_specific_name(response.iter().map(|name| name.to_utf8())),
        Err(e) => {
            debug!("Reverse lookup for {} failed: {}", ip, e);
            None
        }
    }
}

fn first_specific_name(names: impl IntoIterator<Item = String>) -> Option<String> {
    names.into_iter().find(|name| !is_generic_hosting_name(name))
}

/// CNAME of a hostname target; IP targets have none.
pub(super) async fn cname(endpoint: &Endpoint, resolver: &TokioAsyncResolver) -> Option<String> {
    if endpoint.ip().is_some() {
        return None;
    }
    match resolver
        .lookup(endpoint.host.as_str(), RecordType::CNAME)
        .await
    {
        Ok(lookup) => lookup.iter().find_map(|rdata| {
            if let RData::CNAME(cname) = rdata {
                Some(cname.to_utf8())
            } else {
                None
            }
        }),
        Err(e) => {
            debug!("CNAME lookup for {} failed: {}", endpoint.host, e);
            None
        }
    }
}

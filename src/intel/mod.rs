//! IP intelligence for console targets.
//!
//! Three independent lookups answer "who runs this box": reverse DNS,
//! the TLS certificate the port presents, and the CNAME of hostname
//! targets. Each one is bounded by `INTEL_LOOKUP_TIMEOUT_SECS` and degrades
//! to an empty string.

mod dns;
mod tls;

use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use hickory_resolver::TokioAsyncResolver;
use log::debug;

use crate::config::{DEFAULT_TLS_PORT, INTEL_LOOKUP_TIMEOUT_SECS};
use crate::models::IpIntel;
use crate::transport::with_default_scheme;

/// Host and port to look up for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// Parses a target as read from the input file. The port defaults to 443.
    pub(crate) fn parse(target: &str) -> Option<Endpoint> {
        let url = url::Url::parse(&with_default_scheme(target)).ok()?;
        let host = match url.host()? {
            url::Host::Domain(domain) => domain.to_string(),
            url::Host::Ipv4(ip) => ip.to_string(),
            url::Host::Ipv6(ip) => ip.to_string(),
        };
        Some(Endpoint {
            host,
            port: url.port().unwrap_or(DEFAULT_TLS_PORT),
        })
    }

    pub(crate) fn ip(&self) -> Option<IpAddr> {
        self.host.parse().ok()
    }
}

/// Gathers reverse DNS, certificate and CNAME information about a target.
///
/// Never fails; every part that cannot be determined is left empty.
pub async fn lookup_ip_intel(target: &str, resolver: &TokioAsyncResolver) -> IpIntel {
    let Some(endpoint) = Endpoint::parse(target) else {
        debug!("Cannot extract a host from {}", target);
        return IpIntel::default();
    };

    let (cloud_hosting_provider, certificate, cname) = tokio::join!(
        bounded("reverse DNS", target, dns::reverse_name(&endpoint, resolver)),
        bounded("certificate", target, tls::certificate_subjects(&endpoint)),
        bounded("CNAME", target, dns::cname(&endpoint, resolver)),
    );
    let (subject_urls, organizations) = certificate.unwrap_or_default();

    IpIntel {
        cloud_hosting_provider: cloud_hosting_provider.unwrap_or_default(),
        subject_urls,
        organizations,
        cname: cname.unwrap_or_default(),
    }
}

async fn bounded<T>(
    what: &str,
    target: &str,
    lookup: impl Future<Output = Option<T>>,
) -> Option<T> {
    match tokio::time::timeout(Duration::from_secs(INTEL_LOOKUP_TIMEOUT_SECS), lookup).await {
        Ok(found) => found,
        Err(_) => {
            debug!("{} lookup for {} timed out", what, target);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_parse() {
        assert_eq!(
            Endpoint::parse("1.2.3.4:5601"),
            Some(Endpoint {
                host: "1.2.3.4".into(),
                port: 5601
            })
        );
        assert_eq!(
            Endpoint::parse("https://kibana.example.com"),
            Some(Endpoint {
                host: "kibana.example.com".into(),
                port: 443
            })
        );
        assert_eq!(Endpoint::parse("http://").map(|e| e.port), None);
    }

    #[tokio::test]
    async fn test_bounded_passes_result_through() {
        assert_eq!(bounded("test", "t", async { Some(7) }).await, Some(7));
        assert_eq!(bounded::<u8>("test", "t", async { None }).await, None);
    }

    #[test]
    fn test_endpoint_ip() {
        assert!(Endpoint::parse("10.0.0.1:5601").unwrap().ip().is_some());
        assert!(Endpoint::parse("example.com:5601").unwrap().ip().is_none());
    }
}

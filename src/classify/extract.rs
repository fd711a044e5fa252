//! Artifact extraction from raw sample text.
//!
//! Runs over the raw response body rather than parsed JSON: the artifacts can
//! sit in any field, at any depth, and the regexes do not care about the
//! document structure.

use std::collections::{BTreeSet, HashSet};
use std::net::Ipv4Addr;

use super::patterns::{DOTTED_NAME_RE, EMAIL_RE, IPV4_WITH_PORT_RE, KEYWORD_RES, URL_RE};
use crate::models::ExtractedArtifacts;

/// Extracts emails, URLs, public IPv4 addresses and dotted names from text.
///
/// # Arguments
///
/// * `text` - Raw text to scan (usually a `_search` response body)
///
/// # Returns
///
/// The deduplicated artifacts. A URL candidate that contains an email address
/// is never reported as a URL.
pub fn extract_artifacts(text: &str) -> ExtractedArtifacts {
    let emails: BTreeSet<String> = EMAIL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    let urls = URL_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|candidate| !EMAIL_RE.is_match(candidate))
        .map(str::to_string)
        .collect();

    let public_ips = IPV4_WITH_PORT_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|candidate| is_public_ip_candidate(candidate))
        .map(str::to_string)
        .collect();

    let dotted_names = DOTTED_NAME_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    ExtractedArtifacts {
        emails,
        urls,
        public_ips,
        dotted_names,
    }
}

/// Checks an `a.b.c.d[:port]` candidate.
///
/// The address must parse as a real IPv4 address (every octet 0-255, no
/// leading zeros) and must not be private, loopback, link-local or
/// unspecified. A port, if present, must fit in a `u16`.
fn is_public_ip_candidate(candidate: &str) -> bool {
    let (addr, port) = match candidate.split_once(':') {
        Some((addr, port)) => (addr, Some(port)),
        None => (candidate, None),
    };
    if let Some(port) = port {
        if port.parse::<u16>().is_err() {
            return false;
        }
    }
    match addr.parse::<Ipv4Addr>() {
        Ok(ip) => is_public(&ip),
        Err(_) => false,
    }
}

fn is_public(ip: &Ipv4Addr) -> bool {
    !(ip.is_private() || ip.is_loopback() || ip.is_link_local() || ip.is_unspecified())
}

/// Collects `<keyword><up to 30 chars>` snippets for every interesting keyword.
///
/// Matching is case-insensitive and never crosses a line break. The result
/// keeps first-seen order and contains each snippet once.
pub fn extract_keyword_snippets(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut snippets = Vec::new();
    for re in KEYWORD_RES.iter() {
        for m in re.find_iter(text) {
            if seen.insert(m.as_str()) {
                snippets.push(m.as_str().to_string());
            }
        }
    }
    snippets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emails_and_urls_are_disjoint() {
        let text = r#"{"contact":"john.doe@example.com","site":"https://shop.example.org/cart?id=1"}"#;
        let artifacts = extract_artifacts(text);

        assert!(artifacts.emails.contains("john.doe@example.com"));
        assert!(artifacts
            .urls
            .iter()
            .any(|u| u.starts_with("shop.example.org")));
        for url in &artifacts.urls {
            assert!(!url.contains('@'), "email leaked into urls: {url}");
        }
    }

    #[test]
    fn test_public_ip_filtering() {
        let text = "peers: 10.1.2.3, 192.168.0.10:8080, 172.20.1.1, 127.0.0.1, \
                    169.254.10.10, 0.0.0.0, 8.8.8.8, 52.14.1.9:9200, 999.1.1.1";
        let artifacts = extract_artifacts(text);
        let ips: Vec<&str> = artifacts.public_ips.iter().map(String::as_str).collect();
        assert_eq!(ips, vec!["52.14.1.9:9200", "8.8.8.8"]);
    }

    #[test]
    fn test_public_ip_rejects_leading_zeros() {
        let artifacts = extract_artifacts("host 08.8.8.8 and 1.1.1.1");
        assert!(!artifacts.public_ips.contains("08.8.8.8"));
        assert!(artifacts.public_ips.contains("1.1.1.1"));
    }

    #[test]
    fn test_ip_reported_once() {
        let artifacts = extract_artifacts("8.8.4.4 8.8.4.4 8.8.4.4");
        assert_eq!(artifacts.public_ips.len(), 1);
    }

    #[test]
    fn test_dotted_names() {
        let artifacts = extract_artifacts("class org.springframework.web.Filter loaded");
        assert!(artifacts
            .dotted_names
            .iter()
            .any(|n| n.starts_with("org.springframework.web")));
    }

    #[test]
    fn test_keyword_snippets_are_deduplicated() {
        let text = "password: hunter2\npassword: hunter2\nPassword: other";
        let snippets = extract_keyword_snippets(text);
        let password_hits: Vec<&String> = snippets
            .iter()
            .filter(|s| s.to_lowercase().starts_with("password"))
            .collect();
        assert_eq!(password_hits.len(), 2);
        assert!(snippets.contains(&"password: hunter2".to_string()));
        assert!(snippets.contains(&"Password: other".to_string()));
    }

    #[test]
    fn test_keyword_snippet_length_is_bounded() {
        let long_tail = "x".repeat(100);
        let snippets = extract_keyword_snippets(&format!("token={long_tail}"));
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].chars().count(), "token".len() + 30);
    }

    #[test]
    fn test_keyword_needs_at_least_one_trailing_char() {
        assert!(extract_keyword_snippets("secret").is_empty());
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(extract_artifacts("").is_empty());
        assert!(extract_keyword_snippets("").is_empty());
    }
}

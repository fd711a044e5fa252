//! Certificate subjects presented by the target.
//!
//! Exposed consoles mostly run on self-signed or mismatched certificates, so
//! the handshake skips verification entirely: only the subjects matter.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use log::debug;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{ring, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use super::Endpoint;
use crate::classify::URL_RE;
use crate::config::{TCP_CONNECT_TIMEOUT_SECS, TLS_HANDSHAKE_TIMEOUT_SECS};

/// Organizations of public certificate authorities; they say nothing about the owner.
const CERTIFICATE_AUTHORITIES: &[&str] = &[
    "Digicert",
    "DigiCert",
    "Sectigo",
    "SECTIGO",
    "Let's Encrypt",
    "GlobalSign",
    "Amazon",
    "USERTRUST",
    "Internet Security Research Group",
    "Google Trust Services",
    "IdenTrust",
    "GoDaddy.com",
    "The Go Daddy Group",
    "Starfield Technologies",
    "Comodo",
    "COMODO",
    "Acme",
    "ACME",
];

pub(crate) fn is_certificate_authority(organization: &str) -> bool {
    CERTIFICATE_AUTHORITIES
        .iter()
        .any(|ca| organization.contains(ca))
}

/// Accepts whatever the server presents.
#[derive(Debug)]
struct AcceptAnyCertificate {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

fn unverified_client_config() -> Result<ClientConfig> {
    let provider = Arc::new(ring::default_provider());
    let config = ClientConfig::builder_with_provider(Arc::clone(&provider))
        .with_safe_default_protocol_versions()?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate { provider }))
        .with_no_client_auth();
    Ok(config)
}

/// Subject URLs and organizations of the certificate chain, both comma-joined.
pub(super) async fn certificate_subjects(endpoint: &Endpoint) -> Option<(String, String)> {
    match fetch_chain(endpoint).await {
        Ok(chain) => Some(summarize_chain(&chain)),
        Err(e) => {
            debug!(
                "No certificate from {}:{}: {}",
                endpoint.host, endpoint.port, e
            );
            None
        }
    }
}

async fn fetch_chain(endpoint: &Endpoint) -> Result<Vec<CertificateDer<'static>>> {
    let config = unverified_client_config()?;
    let server_name = ServerName::try_from(endpoint.host.clone())
        .map_err(|e| anyhow!("Invalid server name {}: {}", endpoint.host, e))?;

    let sock = tokio::time::timeout(
        Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
        TcpStream::connect((endpoint.host.as_str(), endpoint.port)),
    )
    .await
    .map_err(|_| anyhow!("TCP connection timeout ({}s)", TCP_CONNECT_TIMEOUT_SECS))??;

    let connector = TlsConnector::from(Arc::new(config));
    let tls_stream = tokio::time::timeout(
        Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
        connector.connect(server_name, sock),
    )
    .await
    .map_err(|_| anyhow!("TLS handshake timeout ({}s)", TLS_HANDSHAKE_TIMEOUT_SECS))??;

    let chain = tls_stream
        .get_ref()
        .1
        .peer_certificates()
        .map(|certs| certs.iter().map(|c| c.clone().into_owned()).collect())
        .unwrap_or_default();
    Ok(chain)
}

fn summarize_chain(chain: &[CertificateDer<'_>]) -> (String, String) {
    let mut common_names = Vec::new();
    let mut organizations = Vec::new();
    for der in chain {
        let cert = match x509_parser::parse_x509_certificate(der.as_ref()) {
            Ok((_, cert)) => cert,
            Err(e) => {
                debug!("Unparseable certificate in chain: {}", e);
                continue;
            }
        };
        let subject = cert.subject();
        common_names.extend(
            subject
                .iter_common_name()
                .filter_map(|attr| attr.as_str().ok())
                .map(str::to_string),
        );
        organizations.extend(
            subject
                .iter_organization()
                .filter_map(|attr| attr.as_str().ok())
                .map(str::to_string),
        );
    }
    (
        subject_urls(&common_names),
        owner_organizations(&organizations),
    )
}

/// URL-looking common names, leading `.` trimmed, first occurrence kept.
fn subject_urls(common_names: &[String]) -> String {
    let mut urls: Vec<&str> = Vec::new();
    for cn in common_names {
        let Some(found) = URL_RE.find(cn) else {
            continue;
        };
        let url = found.as_str().trim_start_matches('.');
        if !url.is_empty() && !urls.contains(&url) {
            urls.push(url);
        }
    }
    urls.join(",")
}

fn owner_organizations(organizations: &[String]) -> String {
    let mut kept: Vec<&str> = Vec::new();
    for org in organizations {
        let org = org.trim();
        if !org.is_empty() && !is_certificate_authority(org) && !kept.contains(&org) {
            kept.push(org);
        }
    }
    kept.join(",")
}

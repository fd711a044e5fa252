//! Fail-safe HTTP transport.
//!
//! Every request made against a target goes through [`send`]. It never
//! panics and never retries on its own except in one case: a scheme
//! mismatch, which is retried once with the scheme flipped when the caller
//! allows it.

mod fallback;

use std::future::Future;
use std::time::Duration;

use log::{debug, info};

use crate::error_handling::{error_chain_text, TransportError};

pub use fallback::{flip_scheme, is_scheme_mismatch, with_default_scheme};

/// HTTP method of a request. Only the two the probes need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

/// A response, whatever its status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub body: String,
    pub status: u16,
    /// Set when the reply came from the retry with the flipped scheme
    pub fell_back: bool,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Reply {
            body: body.into(),
            status,
            fell_back: false,
        }
    }
}

/// How a single attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Connect,
    Other,
}

/// Failure of one attempt, before the retry decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub kind: FailureKind,
    /// Full error-source chain
    pub detail: String,
}

impl AttemptFailure {
    fn from_reqwest(error: &reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            FailureKind::Timeout
        } else if error.is_connect() {
            FailureKind::Connect
        } else {
            FailureKind::Other
        };
        AttemptFailure {
            kind,
            detail: error_chain_text(error),
        }
    }

    fn into_transport_error(self, url: String) -> TransportError {
        let detail = self.detail;
        match self.kind {
            FailureKind::Timeout => TransportError::Timeout { url, detail },
            FailureKind::Connect => TransportError::Connect { url, detail },
            FailureKind::Other => TransportError::Request { url, detail },
        }
    }
}

/// Sends one logical request to `endpoint`.
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `endpoint` - Full URL; `http://` is assumed when no scheme is given
/// * `timeout_secs` - Deadline for each attempt
/// * `allow_retry` - Whether a scheme mismatch may be retried with the other scheme
/// * `headers` - Extra request headers
/// * `method` - GET or POST (sent without a body)
///
/// # Returns
///
/// The reply for any HTTP status, including 4xx and 5xx.
///
/// # Errors
///
/// Returns a `TransportError` when no response could be obtained. At most two
/// attempts are ever made.
pub async fn send(
    client: &reqwest::Client,
    endpoint: &str,
    timeout_secs: u64,
    allow_retry: bool,
    headers: &[(&str, &str)],
    method: Method,
) -> Result<Reply, TransportError> {
    let timeout = Duration::from_secs(timeout_secs);
    send_with(endpoint, allow_retry, |url| async move {
        debug!("{:?} {} (timeout {}s)", method, url, timeout_secs);
        let mut request = client
            .request(method.into(), url.as_str())
            .timeout(timeout);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send()
            .await
            .map_err(|e| AttemptFailure::from_reqwest(&e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AttemptFailure::from_reqwest(&e))?;
        Ok(Reply::new(status, body))
    })
    .await
}

/// Retry loop behind [`send`], generic over the attempt executor.
///
/// `execute` receives the absolute URL of each attempt. The first attempt
/// uses `endpoint` as given (with `http://` prefixed if it has no scheme);
/// a second attempt is made only when `allow_retry` is set and the first
/// failure is a scheme mismatch.
pub async fn send_with<F, Fut>(
    endpoint: &str,
    allow_retry: bool,
    mut execute: F,
) -> Result<Reply, TransportError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Reply, AttemptFailure>>,
{
    let mut url = with_default_scheme(endpoint);
    if let Err(e) = url::Url::parse(&url) {
        return Err(TransportError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            detail: e.to_string(),
        });
    }

    let mut fell_back = false;
    loop {
        match execute(url.clone()).await {
            Ok(mut reply) => {
                reply.fell_back = fell_back;
                return Ok(reply);
            }
            Err(failure) => {
                debug!("Request to {} failed: {}", url, failure.detail);
                if allow_retry && !fell_back && is_scheme_mismatch(&failure.detail) {
                    if let Some(flipped) = flip_scheme(&url) {
                        info!("Scheme mismatch on {}, retrying as {}", url, flipped);
                        url = flipped;
                        fell_back = true;
                        continue;
                    }
                }
                return Err(failure.into_transport_error(url));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn mismatch() -> AttemptFailure {
        AttemptFailure {
            kind: FailureKind::Connect,
            detail: "error sending request: received corrupt message of type InvalidContentType"
                .into(),
        }
    }

    /// Records every attempted URL and replays scripted outcomes.
    fn scripted(
        outcomes: Vec<Result<Reply, AttemptFailure>>,
    ) -> (
        Arc<Mutex<Vec<String>>>,
        impl FnMut(String) -> std::future::Ready<Result<Reply, AttemptFailure>>,
    ) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&calls);
        let mut outcomes = outcomes.into_iter();
        let execute = move |url: String| {
            recorder.lock().unwrap().push(url);
            std::future::ready(outcomes.next().unwrap_or_else(|| Err(mismatch())))
        };
        (calls, execute)
    }

    #[tokio::test]
    async fn test_scheme_mismatch_retried_once_with_flipped_scheme() {
        let (calls, execute) = scripted(vec![Err(mismatch()), Ok(Reply::new(200, "{}"))]);
        let reply = send_with("https://1.2.3.4:9200", true, execute)
            .await
            .unwrap();

        assert_eq!(reply.status, 200);
        assert!(reply.fell_back);
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["https://1.2.3.4:9200", "http://1.2.3.4:9200"]
        );
    }

    #[tokio::test]
    async fn test_scheme_mismatch_not_retried_when_disallowed() {
        let (calls, execute) = scripted(vec![Err(mismatch()), Ok(Reply::new(200, "{}"))]);
        let err = send_with("https://1.2.3.4:5601", false, execute)
            .await
            .unwrap_err();

        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(err.status(), -1);
    }

    #[tokio::test]
    async fn test_second_mismatch_is_not_retried_again() {
        let (calls, execute) = scripted(vec![Err(mismatch()), Err(mismatch())]);
        let err = send_with("1.2.3.4:9200", true, execute).await.unwrap_err();

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["http://1.2.3.4:9200", "https://1.2.3.4:9200"]
        );
        assert!(matches!(err, TransportError::Connect { ref url, .. } if url == "https://1.2.3.4:9200"));
    }

    #[tokio::test]
    async fn test_other_failures_are_not_retried() {
        let refused = AttemptFailure {
            kind: FailureKind::Connect,
            detail: "tcp connect error: Connection refused".into(),
        };
        let (calls, execute) = scripted(vec![Err(refused), Ok(Reply::new(200, ""))]);
        let err = send_with("http://1.2.3.4:9200", true, execute)
            .await
            .unwrap_err();

        assert_eq!(calls.lock().unwrap().len(), 1);
        assert!(matches!(err, TransportError::Connect { .. }));
    }

    #[tokio::test]
    async fn test_timeout_maps_to_timeout_error() {
        let timeout = AttemptFailure {
            kind: FailureKind::Timeout,
            detail: "operation timed out".into(),
        };
        let (_, execute) = scripted(vec![Err(timeout)]);
        let err = send_with("http://1.2.3.4:9200", true, execute)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_invalid_endpoint_never_executes() {
        let (calls, execute) = scripted(vec![]);
        let err = send_with("http://[not-an-ip", true, execute)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidEndpoint { .. }));
        assert!(calls.lock().unwrap().is_empty());
    }
}

//! Error categorization.
//!
//! Maps transport failures onto counter categories and renders error chains
//! as a single line of text.

use std::error::Error as StdError;

use super::stats::ProcessingStats;
use super::types::{ErrorType, TransportError};

/// Joins an error and all of its sources into one `": "`-separated line.
///
/// reqwest wraps hyper, which wraps rustls or io errors; the useful part of
/// the message usually sits at the bottom of that chain.
pub fn error_chain_text(error: &(dyn StdError + 'static)) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

/// Categorizes a `TransportError` into an `ErrorType`.
///
/// # Arguments
///
/// * `error` - The failure returned by the transport
///
/// # Returns
///
/// The appropriate `ErrorType` for the error.
pub fn categorize_transport_error(error: &TransportError) -> ErrorType {
    match error {
        TransportError::InvalidEndpoint { .. } => ErrorType::HttpRequestInvalidEndpoint,
        TransportError::Timeout { .. } => ErrorType::HttpRequestTimeoutError,
        TransportError::Connect { .. } => ErrorType::HttpRequestConnectError,
        TransportError::Request { .. } => ErrorType::HttpRequestOtherError,
    }
}

/// Updates processing statistics based on a `TransportError`.
pub fn update_error_stats(stats: &ProcessingStats, error: &TransportError) {
    stats.increment_error(categorize_transport_error(error));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Layer {
        message: &'static str,
        source: Option<Box<Layer>>,
    }

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl StdError for Layer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.source.as_deref().map(|s| s as &(dyn StdError + 'static))
        }
    }

    #[test]
    fn test_error_chain_text_includes_every_source() {
        let err = Layer {
            message: "error sending request",
            source: Some(Box::new(Layer {
                message: "client error (Connect)",
                source: Some(Box::new(Layer {
                    message: "received corrupt message of type InvalidContentType",
                    source: None,
                })),
            })),
        };
        let text = error_chain_text(&err);
        assert_eq!(
            text,
            "error sending request: client error (Connect): received corrupt message of type InvalidContentType"
        );
    }

    #[test]
    fn test_error_chain_text_skips_repeated_messages() {
        let err = Layer {
            message: "timed out: operation timed out",
            source: Some(Box::new(Layer {
                message: "operation timed out",
                source: None,
            })),
        };
        assert_eq!(error_chain_text(&err), "timed out: operation timed out");
    }

    #[test]
    fn test_categorize_transport_error() {
        let timeout = TransportError::Timeout {
            url: "http://a".into(),
            detail: String::new(),
        };
        let invalid = TransportError::InvalidEndpoint {
            endpoint: "::".into(),
            detail: String::new(),
        };
        assert_eq!(
            categorize_transport_error(&timeout),
            ErrorType::HttpRequestTimeoutError
        );
        assert_eq!(
            categorize_transport_error(&invalid),
            ErrorType::HttpRequestInvalidEndpoint
        );

        let stats = ProcessingStats::new();
        update_error_stats(&stats, &timeout);
        assert_eq!(stats.get_error_count(ErrorType::HttpRequestTimeoutError), 1);
    }
}

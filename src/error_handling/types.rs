//! Error type definitions.
//!
//! This module defines the typed errors and the counter categories used throughout the scanner.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for document-store operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// The record could not be serialized into a document.
    #[error("Document serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The insert did not finish in time.
    #[error("Insert timed out after {0} seconds")]
    Timeout(u64),
}

/// Invalid configuration values, detected before any scanning starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A numeric option that must be at least 1.
    #[error("{0} must be at least 1")]
    NotPositive(&'static str),

    /// A required value is empty.
    #[error("{0} must not be empty")]
    MissingValue(&'static str),
}

/// Failure of a single logical request after any protocol fallback.
///
/// Callers that only care about a `(body, status)` pair can treat every
/// variant as an empty body with status `-1` (see [`TransportError::status`]).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The endpoint could not be turned into a request URL.
    #[error("invalid endpoint {endpoint}: {detail}")]
    InvalidEndpoint {
        /// Endpoint as given by the caller
        endpoint: String,
        /// Parser message
        detail: String,
    },

    /// The request did not complete within its deadline.
    #[error("request to {url} timed out: {detail}")]
    Timeout {
        /// URL of the last attempt
        url: String,
        /// Full error-source chain of the last attempt
        detail: String,
    },

    /// The TCP connection or TLS handshake failed.
    #[error("could not connect to {url}: {detail}")]
    Connect {
        /// URL of the last attempt
        url: String,
        /// Full error-source chain of the last attempt
        detail: String,
    },

    /// Any other failure (protocol error, body read, ...).
    #[error("request to {url} failed: {detail}")]
    Request {
        /// URL of the last attempt
        url: String,
        /// Full error-source chain of the last attempt
        detail: String,
    },
}

impl TransportError {
    /// Status code reported for a failed request. There is no response, so always `-1`.
    pub fn status(&self) -> i32 {
        -1
    }

    /// Full error text of the last attempt.
    pub fn detail(&self) -> &str {
        match self {
            TransportError::InvalidEndpoint { detail, .. }
            | TransportError::Timeout { detail, .. }
            | TransportError::Connect { detail, .. }
            | TransportError::Request { detail, .. } => detail,
        }
    }
}

/// Types of errors counted during a run.
///
/// These are failures local to one request or one target; none of them
/// abort the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // HTTP/Network errors
    HttpRequestConnectError,
    HttpRequestTimeoutError,
    HttpRequestOtherError,
    HttpRequestInvalidEndpoint,
    // Response handling
    ResponseParseError,
    SampleFetchError,
    // Output
    StoreInsertError,
    OutputWriteError,
    // Orchestration
    TaskPanic,
}

/// Types of informational metrics counted during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// A request was retried with the other scheme after a protocol mismatch
    ProtocolFallback,
    /// A record was already present in the document store
    DuplicateRecord,
    /// A target failed its liveness check
    DeadTarget,
    /// A collection was dropped by the name filter
    CollectionFiltered,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::HttpRequestInvalidEndpoint => "Invalid endpoint",
            ErrorType::ResponseParseError => "Response parse error",
            ErrorType::SampleFetchError => "Collection sample error",
            ErrorType::StoreInsertError => "Document store insert error",
            ErrorType::OutputWriteError => "Output file write error",
            ErrorType::TaskPanic => "Target task panicked",
        }
    }
}

impl InfoType {
    /// Returns a human-readable string representation of the info type.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::ProtocolFallback => "Protocol fallback retry",
            InfoType::DuplicateRecord => "Duplicate record skipped",
            InfoType::DeadTarget => "Dead target",
            InfoType::CollectionFiltered => "Collection filtered by name",
        }
    }
}

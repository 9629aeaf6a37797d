//! Error types for the realtime API client.
//!
//! # Design
//! Every failure of a call surfaces synchronously as one `RealtimeError`.
//! Nothing is retried here; the caller decides. `UnexpectedStatus` renders as
//! a single line combining the status code and a bounded body excerpt so it
//! can be logged as-is.

use thiserror::Error;

/// Boxed error produced by a `Transport` implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `Client` operations.
#[derive(Debug, Error)]
pub enum RealtimeError {
    /// A resource path could not be parsed as a URL reference.
    #[error("malformed resource {resource:?}: {source}")]
    MalformedResource {
        resource: String,
        #[source]
        source: url::ParseError,
    },

    /// The transport failed before a response arrived (DNS, connect, TLS, timeout).
    #[error("{0}")]
    Transport(#[source] BoxError),

    /// The server answered with a status other than 200 OK.
    #[error("unexpected response from realtime API, status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// A 200 OK body was not valid JSON for the expected shape.
    #[error("failed to decode realtime response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reading a non-OK response body failed while building the error.
    #[error("failed to read error response body: {0}")]
    ErrorBody(#[source] std::io::Error),
}

impl RealtimeError {
    /// HTTP status of an `UnexpectedStatus` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            RealtimeError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

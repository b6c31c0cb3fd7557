//! Error types for the client SDK.
//!
//! # Design
//! The four runtime outcomes a caller has to tell apart are `Timeout`,
//! `Http`, `Network` and `Parse`. Everything else is a pre-flight failure
//! raised before any bytes hit the wire: a bad URL or header, a path token
//! without a usable value, a body that does not serialize, or a client that
//! could not be set up.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by `ApiClient` operations and by the executor.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response headers arrived before the configured deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-2xx status. `body` is the raw text.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Transport failure (DNS, connection refused, reset, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response declared JSON but the body did not deserialize.
    #[error("failed to parse response body: {0}")]
    Parse(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },

    /// A `{token}` in the path template had no value supplied.
    #[error("missing value for path parameter '{0}'")]
    MissingPathParam(String),

    /// A path value of `.` or `..` would be collapsed by URL normalization.
    #[error("path parameter '{name}' cannot be '{value}'")]
    InvalidPathParam { name: String, value: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP client could not be built (TLS backend initialisation).
    #[error("failed to build HTTP client: {0}")]
    ClientInit(#[source] reqwest::Error),

    #[error("failed to register metrics: {0}")]
    Metrics(#[from] prometheus::Error),

    /// The blocking client could not start its runtime.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl ApiError {
    /// Status code of an `Http` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout(_))
    }

    /// True for failures that happened before a request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ApiError::Serialization(_)
                | ApiError::InvalidUrl(_)
                | ApiError::InvalidHeader { .. }
                | ApiError::MissingPathParam(_)
                | ApiError::InvalidPathParam { .. }
                | ApiError::InvalidConfig(_)
                | ApiError::ClientInit(_)
                | ApiError::Metrics(_)
                | ApiError::Runtime(_)
        )
    }
}

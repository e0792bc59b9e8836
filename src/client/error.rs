//! Client-specific error types.

use serde_json::Value;
use thiserror::Error;

use crate::config::SettingsError;
use crate::query::QueryError;

/// Result type for client operations.
pub type DruidResult<T> = Result<T, DruidError>;

/// Connection-level failures reported by a [`Transport`](super::Transport).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Could not reach the remote host.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The connect or request timeout elapsed.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Any other failure raised by the HTTP client.
    #[error("http client error: {0}")]
    Request(#[source] reqwest::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Request(err)
        }
    }
}

/// Errors that can occur while talking to a Druid cluster.
///
/// Every variant raised for an HTTP exchange carries the outbound payload.
#[derive(Error, Debug)]
pub enum DruidError {
    /// The request never produced a response, even after retries.
    #[error("transport failure for {url}: {source}")]
    Transport {
        url: String,
        payload: Value,
        #[source]
        source: TransportError,
    },

    /// HTTP 502 on the final attempt.
    #[error("bad gateway from {url}: brokers are unavailable, try again later")]
    BadGateway { url: String, payload: Value },

    /// The engine rejected the request with a structured error body.
    #[error("druid error: {message} (code: {code})")]
    Engine {
        code: String,
        message: String,
        payload: Value,
    },

    /// A successful response whose body is not valid JSON.
    #[error("failed to decode response from {url} (status {status}): {source}")]
    Decode {
        url: String,
        status: u16,
        body: String,
        payload: Value,
        #[source]
        source: serde_json::Error,
    },

    /// Non-2xx response without a structured error body.
    #[error("http status {status}: {body}")]
    Http {
        status: u16,
        body: String,
        payload: Value,
    },

    /// The query failed validation before anything was sent.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The client could not be configured.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl DruidError {
    /// Create an engine error.
    pub fn engine(code: impl Into<String>, message: impl Into<String>, payload: Value) -> Self {
        Self::Engine {
            code: code.into(),
            message: message.into(),
            payload,
        }
    }

    /// Check if sending the same request again later may succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::BadGateway { .. })
    }

    /// The outbound payload of the failed request, if one was sent.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Transport { payload, .. }
            | Self::BadGateway { payload, .. }
            | Self::Engine { payload, .. }
            | Self::Decode { payload, .. }
            | Self::Http { payload, .. } => Some(payload),
            Self::Query(_) | Self::Settings(_) => None,
        }
    }

    /// HTTP status of the final response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadGateway { .. } => Some(502),
            Self::Decode { status, .. } | Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

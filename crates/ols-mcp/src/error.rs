//! Error types for the LightSpeed bridge.

use thiserror::Error;

/// Invalid process configuration. Fatal at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `OLS_API_URL` is not an absolute http(s) URL
    #[error("Invalid OLS_API_URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// `OLS_TIMEOUT` is not a finite, positive number of seconds
    #[error("Invalid OLS_TIMEOUT '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Failure talking to the LightSpeed backend.
///
/// The `Display` form is what ends up after `Error: ` in the tool result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Transport-level failure: connect, DNS, TLS, timeout, body read.
    #[error("Request error: {0}")]
    Request(String),

    /// Backend answered outside 200-299.
    #[error("HTTP error {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Anything else, e.g. a body that is not the expected JSON shape.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl BackendError {
    /// Short label used as a structured logging field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Request(_) => "request",
            Self::HttpStatus { .. } => "http_status",
            Self::Unexpected(_) => "unexpected",
        }
    }
}

/// Errors raised while handling a tool call.
///
/// Only `UnknownTool` escapes the gateway as a protocol error; the rest are
/// rendered as user-visible text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Query is required")]
    MissingArgument,

    #[error("{0} must be a string")]
    InvalidArgument(&'static str),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;

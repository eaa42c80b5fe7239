//! HTTP client for the LightSpeed `/v1/query` endpoint.
//!
//! Every call builds its own `reqwest::Client` so concurrent tool calls share nothing but the
//! immutable [`BackendConfig`]. The client (and its connection pool) is dropped when the call
//! returns, on success and error paths alike.

use crate::config::BackendConfig;
use crate::error::{BackendError, Result};
use crate::models::{QueryRequest, QueryResponse};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::sync::Arc;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone)]
pub struct BackendClient {
    config: Arc<BackendConfig>,
}

impl BackendClient {
    #[must_use]
    pub fn new(config: Arc<BackendConfig>) -> Self {
        Self { config }
    }

    /// Send one query to the backend.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Request`] on transport failure (including timeout)
    /// - [`BackendError::HttpStatus`] if the backend answers outside 200-299
    /// - [`BackendError::Unexpected`] if the body is not the expected JSON object
    pub async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let cfg = self.config.as_ref();
        let http = build_http_client(cfg)?;
        let url = cfg.query_url();

        let mut builder = http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(request);
        if let Some(token) = cfg.auth_token.as_deref() {
            builder = builder.bearer_auth(token);
        }

        debug!(
            url = %redact_url_str(&url),
            has_conversation = request.conversation_id.is_some(),
            "sending LightSpeed query"
        );

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(BackendError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| BackendError::Unexpected(format!("invalid JSON in response: {e}")))?;

        QueryResponse::from_body(&value, request)
    }
}

fn build_http_client(cfg: &BackendConfig) -> Result<reqwest::Client> {
    let timeout = cfg
        .timeout()
        .map_err(|e| BackendError::Unexpected(e.to_string()))?;
    // Redirects are not followed: a 3xx is reported like any other non-2xx status.
    reqwest::Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(!cfg.verify_tls)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| BackendError::Unexpected(sanitize_reqwest_error(&e)))
}

fn map_reqwest_error(e: reqwest::Error) -> BackendError {
    if e.is_builder() {
        BackendError::Unexpected(sanitize_reqwest_error(&e))
    } else {
        BackendError::Request(sanitize_reqwest_error(&e))
    }
}

/// Drop credentials, query and fragment from a URL.
#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

/// [`redact_url`] for a raw string; unparseable input is returned as-is.
#[must_use]
pub fn redact_url_str(raw: &str) -> String {
    Url::parse(raw).map_or_else(|_| raw.to_string(), |u| redact_url(&u))
}

/// Render a reqwest error, including its source chain, with the URL redacted.
#[must_use]
pub fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(inner) = source {
        msg.push_str(": ");
        msg.push_str(&inner.to_string());
        source = std::error::Error::source(inner);
    }
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}

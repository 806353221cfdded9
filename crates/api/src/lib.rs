//! Paydesk backend client.
//!
//! This crate talks to the Paydesk point-of-sale backend:
//!
//! - [`PaydeskClient`] wraps a configured `reqwest::Client` with a validated
//!   base URL, a cookie store for the session and optional bearer auth
//! - [`search`] queries the account, product and category search endpoints
//! - [`payment`] drives the payment-terminal flow
//! - [`events`] multiplexes the server-push stream to any number of
//!   subscribers
//!
//! # Example
//!
//! ```ignore
//! use paydesk_api::{PaydeskClient, SearchKind};
//! use paydesk_util::PaydeskConfig;
//!
//! async fn lookup() -> anyhow::Result<()> {
//!     let client = PaydeskClient::new(&PaydeskConfig::load()?, None)?;
//!     let rows = client.search(SearchKind::Products, "mate").await?;
//!     println!("{} rows", rows.len());
//!     Ok(())
//! }
//! ```

pub mod events;
pub mod payment;
pub mod search;

use std::env;
use std::time::Duration;

use paydesk_util::PaydeskConfig;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub use events::EventHub;
pub use search::{SearchKind, SearchResults, encode_search_query};

/// Environment variable holding an optional bearer token.
pub const API_TOKEN_ENV: &str = "PAYDESK_API_TOKEN";

/// Hostnames allowed to use plain `http` regardless of configuration.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "[::1]"];

/// Errors returned by [`PaydeskClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Thin wrapper around a configured `reqwest::Client` for the Paydesk backend.
#[derive(Debug, Clone)]
pub struct PaydeskClient {
    base_url: String,
    http: Client,
    user_agent: String,
}

impl PaydeskClient {
    /// Build a client from configuration.
    ///
    /// The base URL is resolved by [`PaydeskConfig::resolve_base_url`] with
    /// `base_url_override` taking precedence. A bearer token is sent when
    /// `PAYDESK_API_TOKEN` is set.
    pub fn new(config: &PaydeskConfig, base_url_override: Option<&str>) -> Result<Self, ApiError> {
        let base_url = config.resolve_base_url(base_url_override);
        Self::with_base_url(&base_url, config.allow_insecure_http)
    }

    /// Build a client for an explicit base URL.
    pub fn with_base_url(base_url: &str, allow_insecure_http: bool) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        validate_base_url(&base_url, allow_insecure_http)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(token) = env::var(API_TOKEN_ENV).ok().filter(|token| !token.trim().is_empty()) {
            match header::HeaderValue::from_str(&format!("Bearer {}", token.trim())) {
                Ok(value) => {
                    default_headers.insert(header::AUTHORIZATION, value);
                }
                Err(_) => warn!("{API_TOKEN_ENV} contains characters not allowed in a header; ignoring it"),
            }
        }

        let http = Client::builder()
            .default_headers(default_headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("paydesk-tui/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for a method and backend-relative path.
    ///
    /// `path` must start with `/` and may carry an already-encoded query.
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    /// Request the long-lived push stream. No overall timeout applies.
    pub(crate) fn event_stream_request(&self, last_event_id: Option<&str>) -> RequestBuilder {
        let mut request = self
            .http
            .get(format!("{}/events", self.base_url))
            .header(header::USER_AGENT, &self.user_agent)
            .header(header::ACCEPT, "text/event-stream")
            .timeout(Duration::from_secs(60 * 60 * 24 * 365));
        if let Some(id) = last_event_id {
            request = request.header("Last-Event-ID", id);
        }
        request
    }
}

/// Fail with [`ApiError::Status`] unless the response is a success.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status { status, body })
}

/// Decode a JSON body, keeping decode failures distinct from transport ones.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - the URL must parse and include a host
/// - `localhost`, `127.0.0.1` and `[::1]` may use any scheme
/// - every other host must use HTTPS unless `allow_insecure_http` is set
pub fn validate_base_url(base: &str, allow_insecure_http: bool) -> Result<(), ApiError> {
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        url: base.to_string(),
        reason,
    };

    let parsed = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    let host_name = parsed
        .host_str()
        .ok_or_else(|| invalid("the URL must include a host".into()))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    match parsed.scheme() {
        "https" => Ok(()),
        "http" if allow_insecure_http => Ok(()),
        scheme => Err(invalid(format!(
            "non-localhost hosts must use https (set allow_insecure_http to permit http); got '{scheme}://'"
        ))),
    }
}

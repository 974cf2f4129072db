//! Transport adapter for upstream data services.
//!
//! Tools describe what they want as an [`UpstreamRequest`] and hand it to an
//! [`Upstream`]. The adapter performs exactly one GET per call, never
//! retries, and classifies the outcome into an [`UpstreamResult`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use tracing::{debug, instrument, warn};

use crate::core::config::UpstreamConfig;
use crate::domains::tools::ToolError;

/// Timeout used when a request does not set one explicitly.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP error bodies are cut to this many characters before rendering.
pub const MAX_ERROR_BODY_CHARS: usize = 500;

/// Declared format of an upstream response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    Xml,
}

impl ContentType {
    /// Value sent in the `Accept` header.
    pub fn accept(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Xml => f.write_str("XML"),
        }
    }
}

/// A query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// Encoded by the adapter (`application/x-www-form-urlencoded`).
    Plain(String),
    /// Already percent-encoded; appended verbatim.
    Encoded(String),
}

impl QueryValue {
    /// Percent-encode values that contain a space up front, leave the rest
    /// to the adapter.
    pub fn encode_multi_word(value: &str) -> Self {
        if value.contains(' ') {
            Self::Encoded(urlencoding::encode(value).into_owned())
        } else {
            Self::Plain(value.to_string())
        }
    }
}

/// A single upstream GET request.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub url: String,
    pub query: Vec<(&'static str, QueryValue)>,
    pub headers: Vec<(&'static str, String)>,
    pub content_type: ContentType,
    pub timeout: Duration,
}

impl UpstreamRequest {
    /// Create a GET request for `url` expecting a body of `content_type`.
    pub fn get(url: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            content_type,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a GET request carrying the configured client identity and
    /// timeout.
    pub fn for_service(
        config: &UpstreamConfig,
        url: impl Into<String>,
        content_type: ContentType,
    ) -> Self {
        Self::get(url, content_type)
            .header("User-Agent", config.user_agent.clone())
            .timeout(config.timeout())
    }

    pub fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, QueryValue::Plain(value.into())));
        self
    }

    pub fn query_value(mut self, key: &'static str, value: QueryValue) -> Self {
        self.query.push((key, value));
        self
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Look up a query value by key.
    pub fn query_param(&self, key: &str) -> Option<&QueryValue> {
        self.query.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Look up a header value by name (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Encode the query parameters in declaration order.
    pub fn query_string(&self) -> Result<String, String> {
        let mut parts = Vec::with_capacity(self.query.len());
        for (key, value) in &self.query {
            match value {
                QueryValue::Plain(v) => {
                    parts.push(serde_urlencoded::to_string([(key, v)]).map_err(|e| e.to_string())?)
                }
                QueryValue::Encoded(v) => parts.push(format!("{}={}", urlencoding::encode(key), v)),
            }
        }
        Ok(parts.join("&"))
    }

    /// The URL with its encoded query string appended.
    pub fn full_url(&self) -> Result<String, String> {
        let query = self.query_string()?;
        if query.is_empty() {
            return Ok(self.url.clone());
        }
        let separator = if self.url.contains('?') { '&' } else { '?' };
        Ok(format!("{}{}{}", self.url, separator, query))
    }
}

/// Classified outcome of one upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamResult {
    Success { body: String, content_type: ContentType },
    HttpError { status: u16, body: String },
    NetworkError { cause: String },
    Timeout,
    Unexpected { cause: String },
}

impl UpstreamResult {
    /// Keep the body of a successful call; turn every other outcome into
    /// the matching [`ToolError`].
    pub fn into_body(self) -> Result<(String, ContentType), ToolError> {
        match self {
            Self::Success { body, content_type } => Ok((body, content_type)),
            Self::HttpError { status, body } => Err(ToolError::Http {
                status,
                body: truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS),
            }),
            Self::NetworkError { cause } => Err(ToolError::Network(cause)),
            Self::Timeout => Err(ToolError::Timeout),
            Self::Unexpected { cause } => Err(ToolError::Internal(cause)),
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Anything that can perform an upstream GET.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch(&self, request: UpstreamRequest) -> UpstreamResult;
}

/// `reqwest`-backed upstream client.
///
/// Built at the start of a tool invocation and dropped at its end; no
/// connection state is shared between invocations.
pub struct HttpUpstream {
    client: Result<reqwest::Client, String>,
}

impl HttpUpstream {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e));
        Self { client }
    }
}

impl Default for HttpUpstream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    #[instrument(skip_all, fields(url = %request.url))]
    async fn fetch(&self, request: UpstreamRequest) -> UpstreamResult {
        let client = match &self.client {
            Ok(client) => client,
            Err(cause) => return UpstreamResult::Unexpected { cause: cause.clone() },
        };

        if request.timeout.is_zero() {
            return UpstreamResult::Unexpected {
                cause: "request timeout must be positive".to_string(),
            };
        }

        let url = match request.full_url().and_then(|u| {
            reqwest::Url::parse(&u).map_err(|e| format!("Invalid URL {}: {}", u, e))
        }) {
            Ok(url) => url,
            Err(cause) => return UpstreamResult::Unexpected { cause },
        };

        debug!("GET {}", url);

        let mut builder = client
            .get(url)
            .header(ACCEPT, request.content_type.accept())
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return classify_error(e),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return classify_error(e),
        };

        debug!("Upstream answered {} ({} bytes)", status, body.len());

        if status.is_client_error() || status.is_server_error() {
            warn!("Upstream returned HTTP {}", status.as_u16());
            return UpstreamResult::HttpError {
                status: status.as_u16(),
                body,
            };
        }

        UpstreamResult::Success {
            body,
            content_type: request.content_type,
        }
    }
}

fn classify_error(e: reqwest::Error) -> UpstreamResult {
    if e.is_timeout() {
        warn!("Upstream request timed out");
        UpstreamResult::Timeout
    } else if e.is_connect() || e.is_request() || e.is_body() || e.is_decode() {
        warn!("Upstream network error: {}", e);
        UpstreamResult::NetworkError {
            cause: e.to_string(),
        }
    } else {
        warn!("Unexpected upstream error: {}", e);
        UpstreamResult::Unexpected {
            cause: e.to_string(),
        }
    }
}

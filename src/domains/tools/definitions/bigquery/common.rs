//! Common utilities shared across the BigQuery metadata tools.
//!
//! Requests go to the BigQuery v2 REST API. When an access token is
//! configured it is forwarded as a bearer token; nothing else about
//! credentials is handled here.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::core::config::Config;
use crate::domains::tools::ToolError;
use crate::domains::tools::pipeline::{ContentType, UpstreamRequest};

/// Build a GET request for `/projects/{project}/...` with each path segment
/// percent-encoded.
pub fn request(config: &Config, segments: &[&str]) -> UpstreamRequest {
    let mut url = config
        .upstream
        .bigquery_base_url
        .trim_end_matches('/')
        .to_string();
    for segment in segments {
        url.push('/');
        url.push_str(&urlencoding::encode(segment));
    }

    let request = UpstreamRequest::for_service(&config.upstream, url, ContentType::Json);
    match &config.credentials.bigquery_access_token {
        Some(token) => request.header("Authorization", format!("Bearer {}", token)),
        None => request,
    }
}

/// Reject blank identifiers.
pub fn require_id(value: &str, what: &str) -> Result<String, ToolError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ToolError::invalid_arguments(format!(
            "Please provide a {}.",
            what
        )))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Convert a BigQuery epoch-milliseconds string to RFC 3339.
///
/// Values that are not a valid timestamp are returned unchanged.
pub fn millis_to_rfc3339(value: &str) -> String {
    value
        .parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| value.to_string())
}

//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, a `.env` file, or defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Default per-request timeout for upstream services, in seconds.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for the MCP server.
///
/// This struct contains all configurable aspects of the server, organized
/// by domain for clarity and maintainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Upstream service endpoints and request settings.
    pub upstream: UpstreamConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Endpoints and request settings for the upstream data services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// BigQuery REST API root (`.../bigquery/v2`).
    pub bigquery_base_url: String,

    /// TheCocktailDB JSON API root.
    pub cocktaildb_base_url: String,

    /// MedlinePlus web service query endpoint.
    pub medlineplus_base_url: String,

    /// NIH Clinical Tables ICD-10-CM search endpoint.
    pub clinical_tables_base_url: String,

    /// Per-request timeout in seconds. Always positive.
    pub timeout_secs: u64,

    /// Identifying client string sent as `User-Agent`.
    pub user_agent: String,
}

/// Configuration for external API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Pre-issued OAuth access token forwarded to BigQuery as a bearer token.
    /// Nothing here obtains or refreshes tokens.
    pub bigquery_access_token: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "bigquery_access_token",
                &self.bigquery_access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl UpstreamConfig {
    /// The configured timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            bigquery_base_url: "https://bigquery.googleapis.com/bigquery/v2".to_string(),
            cocktaildb_base_url: "https://www.thecocktaildb.com/api/json/v1/1".to_string(),
            medlineplus_base_url: "https://wsearch.nlm.nih.gov/ws/query".to_string(),
            clinical_tables_base_url: "https://clinicaltables.nlm.nih.gov/api/icd10cm/v3/search"
                .to_string(),
            timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            user_agent: format!("lookup-mcp-server/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "lookup-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            upstream: UpstreamConfig::default(),
            credentials: CredentialsConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        let upstream = &mut config.upstream;
        override_from_env("MCP_BIGQUERY_BASE_URL", &mut upstream.bigquery_base_url);
        override_from_env("MCP_COCKTAILDB_BASE_URL", &mut upstream.cocktaildb_base_url);
        override_from_env("MCP_MEDLINEPLUS_BASE_URL", &mut upstream.medlineplus_base_url);
        override_from_env(
            "MCP_CLINICAL_TABLES_BASE_URL",
            &mut upstream.clinical_tables_base_url,
        );
        override_from_env("MCP_USER_AGENT", &mut upstream.user_agent);

        if let Ok(raw) = std::env::var("MCP_UPSTREAM_TIMEOUT_SECS") {
            upstream.timeout_secs = parse_timeout_secs(&raw);
        }

        if let Ok(token) = std::env::var("MCP_BIGQUERY_ACCESS_TOKEN") {
            config.credentials.bigquery_access_token = Some(token);
            info!("BigQuery access token loaded from environment");
        } else {
            warn!(
                "MCP_BIGQUERY_ACCESS_TOKEN not set - BigQuery requests will be sent \
                 without credentials and will likely be rejected"
            );
        }

        config
    }
}

fn override_from_env(key: &str, target: &mut String) {
    if let Ok(value) = std::env::var(key) {
        if !value.trim().is_empty() {
            *target = value.trim().to_string();
        }
    }
}

/// Parse a timeout in whole seconds, falling back to the default for zero
/// or unparsable input.
fn parse_timeout_secs(raw: &str) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => secs,
        _ => {
            warn!(
                "Invalid MCP_UPSTREAM_TIMEOUT_SECS value {:?}, using {}s",
                raw, DEFAULT_UPSTREAM_TIMEOUT_SECS
            );
            DEFAULT_UPSTREAM_TIMEOUT_SECS
        }
    }
}

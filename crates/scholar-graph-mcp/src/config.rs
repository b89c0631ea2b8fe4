//! Configuration for the Semantic Scholar MCP server.
//!
//! Settings are resolved once at startup from environment variables (a `.env`
//! file is loaded by the binary beforehand) and never change afterwards. The
//! resulting [`Config`] is passed by value into the client constructor.

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for Semantic Scholar API.
    pub const BASE_URL: &str = "https://api.semanticscholar.org";

    /// Path prefix of the Graph API.
    pub const GRAPH_API_PATH: &str = "/graph/v1";

    /// Default request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default retry budget (attempts after the first).
    pub const MAX_RETRIES: u32 = 3;

    /// Default flat delay between retries.
    pub const RETRY_DELAY: Duration = Duration::from_secs(1);

    /// Upper bound applied to upstream `Retry-After` hints.
    pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

    /// Pacing delay before each call without API key (100 requests / 5 minutes).
    pub const PACING_DELAY: Duration = Duration::from_secs(3);

    /// Pacing delay before each call with API key (1 req/s).
    pub const PACING_DELAY_WITH_KEY: Duration = Duration::from_secs(1);

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 5;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Recognised environment variables.
pub mod env {
    pub const API_KEY: &str = "SEMANTIC_SCHOLAR_API_KEY";
    pub const BASE_URL: &str = "SEMANTIC_SCHOLAR_BASE_URL";
    pub const REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";
    pub const MAX_RETRIES: &str = "MAX_RETRIES";
    pub const RETRY_DELAY: &str = "RETRY_DELAY";
    pub const SERVER_NAME: &str = "MCP_SERVER_NAME";
    pub const SERVER_HOST: &str = "MCP_SERVER_HOST";
    pub const SERVER_PORT: &str = "MCP_SERVER_PORT";
    pub const LOG_LEVEL: &str = "MCP_LOG_LEVEL";
    pub const TRANSPORT: &str = "MCP_TRANSPORT";
}

/// Field catalogs accepted by the Graph API.
pub mod fields {
    /// Paper fields; `search_papers` rejects anything outside this list.
    pub const PAPER: &[&str] = &[
        "paperId",
        "title",
        "abstract",
        "venue",
        "year",
        "referenceCount",
        "citationCount",
        "influentialCitationCount",
        "isOpenAccess",
        "fieldsOfStudy",
        "s2FieldsOfStudy",
        "publicationTypes",
        "publicationDate",
        "journal",
        "authors",
        "citations",
        "references",
        "url",
        "publicationVenue",
        "externalIds",
        "openAccessPdf",
    ];

    /// Author fields.
    pub const AUTHOR: &[&str] = &[
        "authorId",
        "name",
        "affiliations",
        "homepage",
        "paperCount",
        "citationCount",
        "hIndex",
        "papers",
    ];

    /// Fields of citation/reference edges.
    pub const CITATION: &[&str] = &[
        "paperId",
        "title",
        "abstract",
        "venue",
        "year",
        "authors",
        "isInfluential",
        "contexts",
        "intents",
    ];
}

/// How the server talks to its MCP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TransportMode {
    /// Newline-delimited JSON-RPC over stdin/stdout
    Stdio,
    /// Stateless JSON-RPC over `POST /mcp`
    #[default]
    #[value(name = "streamable-http", alias = "http")]
    StreamableHttp,
}

impl TransportMode {
    /// Anything other than `stdio` selects the HTTP transport.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("stdio") {
            Self::Stdio
        } else {
            Self::StreamableHttp
        }
    }
}

/// Server configuration.
#[derive(Clone)]
pub struct Config {
    /// Semantic Scholar API key (optional).
    pub api_key: Option<String>,

    /// API base URL, without trailing slash (overridable for mock servers).
    pub base_url: String,

    /// Request timeout, applied to every attempt.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Retry budget after the first attempt.
    pub max_retries: u32,

    /// Flat delay between attempts.
    pub retry_delay: Duration,

    /// Ceiling for upstream `Retry-After` hints.
    pub max_retry_after: Duration,

    /// Delay before each logical call.
    pub pacing_delay: Duration,

    /// Name advertised to MCP clients and in `User-Agent`.
    pub server_name: String,

    /// HTTP bind host.
    pub host: String,

    /// HTTP bind port.
    pub port: u16,

    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Transport selection.
    pub transport: TransportMode,
}

impl Config {
    /// Create a configuration with defaults and an optional API key.
    ///
    /// Pacing is adjusted to API key presence:
    /// - Without key: 3 s between calls
    /// - With key: 1 s between calls
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        let pacing_delay =
            if api_key.is_some() { api::PACING_DELAY_WITH_KEY } else { api::PACING_DELAY };
        Self {
            api_key,
            base_url: api::BASE_URL.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            max_retries: api::MAX_RETRIES,
            retry_delay: api::RETRY_DELAY,
            max_retry_after: api::MAX_RETRY_AFTER,
            pacing_delay,
            server_name: "SemanticSearch".to_string(),
            host: "localhost".to_string(),
            port: 5002,
            log_level: "INFO".to_string(),
            transport: TransportMode::default(),
        }
    }

    /// Create a test configuration pointed at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            retry_delay: Duration::ZERO, // No delay in tests
            pacing_delay: Duration::ZERO,
            ..Self::new(None)
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if a numeric variable is set but unparsable, or the base
    /// URL is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Blank values are treated as absent.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config = Self::new(get(env::API_KEY));

        if let Some(raw) = get(env::BASE_URL) {
            config.base_url = parse_base_url(&raw)?;
        }
        if let Some(raw) = get(env::REQUEST_TIMEOUT) {
            config.request_timeout = parse_seconds(env::REQUEST_TIMEOUT, &raw)?;
            if config.request_timeout.is_zero() {
                return Err(invalid_number(env::REQUEST_TIMEOUT, &raw, "must be greater than zero"));
            }
        }
        if let Some(raw) = get(env::MAX_RETRIES) {
            config.max_retries = raw
                .parse()
                .map_err(|e| invalid_number(env::MAX_RETRIES, &raw, format!("{e}")))?;
        }
        if let Some(raw) = get(env::RETRY_DELAY) {
            config.retry_delay = parse_seconds(env::RETRY_DELAY, &raw)?;
        }
        if let Some(raw) = get(env::SERVER_PORT) {
            config.port =
                raw.parse().map_err(|e| invalid_number(env::SERVER_PORT, &raw, format!("{e}")))?;
        }
        if let Some(name) = get(env::SERVER_NAME) {
            config.server_name = name;
        }
        if let Some(host) = get(env::SERVER_HOST) {
            config.host = host;
        }
        if let Some(level) = get(env::LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(mode) = get(env::TRANSPORT) {
            config.transport = TransportMode::parse_lenient(&mode);
        }

        Ok(config)
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Graph API root, e.g. `https://api.semanticscholar.org/graph/v1`.
    #[must_use]
    pub fn graph_api_url(&self) -> String {
        format!("{}{}", self.base_url, api::GRAPH_API_PATH)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("has_api_key", &self.has_api_key())
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .field("pacing_delay", &self.pacing_delay)
            .field("transport", &self.transport)
            .finish()
    }
}

fn invalid_number(var: &'static str, raw: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidNumber { var, value: raw.to_string(), reason: reason.into() }
}

fn parse_seconds(var: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let secs: f64 = raw.parse().map_err(|e| invalid_number(var, raw, format!("{e}")))?;
    Duration::try_from_secs_f64(secs)
        .map_err(|_| invalid_number(var, raw, "must be a non-negative number of seconds"))
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        var: env::BASE_URL,
        value: raw.to_string(),
        reason,
    };
    let url = url::Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.api_key.is_none());
        assert!(!config.has_api_key());
        assert_eq!(config.pacing_delay, api::PACING_DELAY);
    }

    #[test]
    fn test_config_with_api_key() {
        let config = Config::new(Some("test-key".to_string()));
        assert!(config.has_api_key());
        assert_eq!(config.pacing_delay, api::PACING_DELAY_WITH_KEY);
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let config = Config::new(Some("   ".to_string()));
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_fractional_seconds() {
        let config = Config::from_lookup(lookup(&[("RETRY_DELAY", "0.25")])).unwrap();
        assert_eq!(config.retry_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_negative_delay_rejected() {
        let err = Config::from_lookup(lookup(&[("RETRY_DELAY", "-1")])).unwrap_err();
        assert!(err.to_string().contains("RETRY_DELAY"));
    }

    #[test]
    fn test_transport_parse() {
        assert_eq!(TransportMode::parse_lenient("STDIO"), TransportMode::Stdio);
        assert_eq!(TransportMode::parse_lenient("http"), TransportMode::StreamableHttp);
        assert_eq!(TransportMode::parse_lenient("sse"), TransportMode::StreamableHttp);
    }

    #[test]
    fn test_fields() {
        assert!(fields::PAPER.contains(&"paperId"));
        assert!(fields::AUTHOR.contains(&"hIndex"));
        assert!(fields::CITATION.contains(&"contexts"));
    }
}

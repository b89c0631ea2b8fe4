//! Configuration tests.
//!
//! Tests actual behavior, not constants.

use std::collections::HashMap;
use std::time::Duration;

use scholar_graph_mcp::SemanticScholarClient;
use scholar_graph_mcp::config::{Config, TransportMode};
use scholar_graph_mcp::error::ConfigError;

fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let map: HashMap<String, String> =
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    Config::from_lookup(move |name: &str| map.get(name).cloned())
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn test_empty_environment_uses_defaults() {
    let config = from_pairs(&[]).unwrap();

    assert!(!config.has_api_key());
    assert_eq!(config.base_url, "https://api.semanticscholar.org");
    assert_eq!(config.graph_api_url(), "https://api.semanticscholar.org/graph/v1");
    assert_eq!(config.request_timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.retry_delay, Duration::from_secs(1));
    assert_eq!(config.pacing_delay, Duration::from_secs(3));
    assert_eq!(config.server_name, "SemanticSearch");
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 5002);
    assert_eq!(config.transport, TransportMode::StreamableHttp);
}

#[test]
fn test_api_key_shortens_pacing() {
    let config = from_pairs(&[("SEMANTIC_SCHOLAR_API_KEY", "abc")]).unwrap();
    assert!(config.has_api_key());
    assert_eq!(config.pacing_delay, Duration::from_secs(1));
}

#[test]
fn test_blank_api_key_is_absent() {
    let config = from_pairs(&[("SEMANTIC_SCHOLAR_API_KEY", "   ")]).unwrap();
    assert!(!config.has_api_key());
    assert_eq!(config.pacing_delay, Duration::from_secs(3));
}

// =============================================================================
// Overrides
// =============================================================================

#[test]
fn test_overrides_are_applied() {
    let config = from_pairs(&[
        ("SEMANTIC_SCHOLAR_BASE_URL", "http://localhost:8080/"),
        ("REQUEST_TIMEOUT", "12.5"),
        ("MAX_RETRIES", "0"),
        ("RETRY_DELAY", "0.25"),
        ("MCP_SERVER_NAME", "Scholar"),
        ("MCP_SERVER_PORT", "9000"),
        ("MCP_TRANSPORT", "stdio"),
    ])
    .unwrap();

    assert_eq!(config.base_url, "http://localhost:8080");
    assert_eq!(config.request_timeout, Duration::from_millis(12_500));
    assert_eq!(config.max_retries, 0);
    assert_eq!(config.retry_delay, Duration::from_millis(250));
    assert_eq!(config.server_name, "Scholar");
    assert_eq!(config.port, 9000);
    assert_eq!(config.transport, TransportMode::Stdio);
}

#[test]
fn test_unknown_transport_means_http() {
    let config = from_pairs(&[("MCP_TRANSPORT", "sse")]).unwrap();
    assert_eq!(config.transport, TransportMode::StreamableHttp);
}

#[test]
fn test_invalid_values_are_rejected() {
    for (var, value) in [
        ("MAX_RETRIES", "-1"),
        ("MAX_RETRIES", "three"),
        ("RETRY_DELAY", "-0.5"),
        ("REQUEST_TIMEOUT", "0"),
        ("MCP_SERVER_PORT", "70000"),
        ("SEMANTIC_SCHOLAR_BASE_URL", "ftp://example.com"),
        ("SEMANTIC_SCHOLAR_BASE_URL", "not a url"),
    ] {
        assert!(from_pairs(&[(var, value)]).is_err(), "{var}={value} should be rejected");
    }
}

// =============================================================================
// Client construction
// =============================================================================

#[test]
fn test_debug_output_hides_api_key() {
    let config = Config::new(Some("super-secret".to_string()));
    assert!(!format!("{config:?}").contains("super-secret"));

    let client = SemanticScholarClient::new(config).unwrap();
    assert!(client.has_api_key());
    assert!(!format!("{client:?}").contains("super-secret"));
}

#[test]
fn test_client_exposes_retry_policy() {
    let mut config = Config::for_testing("http://127.0.0.1:1/");
    config.max_retries = 5;
    let client = SemanticScholarClient::new(config).unwrap();

    assert_eq!(client.base_url(), "http://127.0.0.1:1");
    assert_eq!(client.retry_policy().max_retries, 5);
    assert_eq!(client.retry_policy().delay, Duration::ZERO);
}

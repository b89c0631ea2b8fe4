//! Read-only MCP resources.

use serde::Serialize;
use serde_json::{Value, json};

use crate::config::{Config, fields};
use crate::error::ErrorKind;

pub const API_INFO_URI: &str = "semantic-scholar://api-info";
pub const AVAILABLE_FIELDS_URI: &str = "semantic-scholar://available-fields";
pub const GUIDELINES_URI: &str = "semantic-scholar://ai-agent-guidelines";

/// Configuration snapshot exposed through `semantic-scholar://api-info`.
///
/// Never carries the API key itself.
#[derive(Debug, Clone, Serialize)]
pub struct ApiInfo {
    pub api_base_url: String,
    pub has_api_key: bool,
    /// Seconds waited before each logical call.
    pub rate_limit_delay: f64,
    pub request_timeout: f64,
    pub max_retries: u32,
    pub retry_delay: f64,
    pub server_name: String,
}

impl ApiInfo {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_base_url: config.base_url.clone(),
            has_api_key: config.has_api_key(),
            rate_limit_delay: config.pacing_delay.as_secs_f64(),
            request_timeout: config.request_timeout.as_secs_f64(),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay.as_secs_f64(),
            server_name: config.server_name.clone(),
        }
    }
}

/// Entries for `resources/list`.
#[must_use]
pub fn list() -> Value {
    json!({
        "resources": [
            {
                "uri": API_INFO_URI,
                "name": "api-info",
                "description": "Server configuration and API status",
                "mimeType": "application/json"
            },
            {
                "uri": AVAILABLE_FIELDS_URI,
                "name": "available-fields",
                "description": "Valid field names for paper, author and citation requests",
                "mimeType": "application/json"
            },
            {
                "uri": GUIDELINES_URI,
                "name": "ai-agent-guidelines",
                "description": "Parameter formats, error kinds and suggested workflows",
                "mimeType": "application/json"
            }
        ]
    })
}

/// Resource body for `uri`, or `None` when unknown.
#[must_use]
pub fn read(uri: &str, info: &ApiInfo) -> Option<Value> {
    let body = match uri {
        API_INFO_URI => serde_json::to_value(info).ok()?,
        AVAILABLE_FIELDS_URI => json!({
            "paper_fields": fields::PAPER,
            "author_fields": fields::AUTHOR,
            "citation_fields": fields::CITATION,
        }),
        GUIDELINES_URI => guidelines(info),
        _ => return None,
    };
    Some(body)
}

fn guidelines(info: &ApiInfo) -> Value {
    let kinds = [
        (ErrorKind::InvalidParameter, "Fix the named parameter; the request was never sent"),
        (
            ErrorKind::RateLimited,
            "Upstream answered 429 on every attempt; wait, or configure an API key",
        ),
        (ErrorKind::ServerError, "Upstream answered 5xx on every attempt; usually temporary"),
        (ErrorKind::NetworkError, "Upstream unreachable or timed out on every attempt"),
        (
            ErrorKind::UpstreamClientError,
            "Upstream rejected the request (400/401/403/404); not retried",
        ),
        (ErrorKind::InvalidResponse, "Upstream answered 2xx with a body that is not JSON"),
    ];
    let error_kinds: serde_json::Map<String, Value> =
        kinds.into_iter().map(|(kind, hint)| (kind.as_str().to_string(), json!(hint))).collect();

    json!({
        "overview": {
            "description": "Semantic Scholar Academic Graph API exposed as MCP tools",
            "api_version": "Graph API v1",
            "base_url": info.api_base_url,
            "has_api_key": info.has_api_key,
            "pacing_seconds": info.rate_limit_delay,
            "max_retries": info.max_retries
        },
        "parameters": {
            "fields": "Array or comma-separated string of field names; see semantic-scholar://available-fields",
            "limit": "search_papers and search_authors: 1-100 (default 10); paginated lists: 1-1000 (default 100)",
            "offset": "Non-negative integer, default 0",
            "year": ["2019", "2016-2020", "2010-", "-2015"],
            "publication_date_or_year": {
                "single_year": "2024",
                "year_range": "2023:2024",
                "month_range": "2024-01:2024-06",
                "date_range": "2024-01-01:2024-12-31",
                "note": "Use ':' for ranges; '2024-2025' is rewritten to '2024:2025'"
            },
            "paper_id": ["649def34f8be52c8b66281af98ae884c09aef38b", "DOI:10.1038/nature14539", "ARXIV:1506.02142", "CorpusId:215416146"]
        },
        "error_kinds": error_kinds,
        "workflow_examples": {
            "basic_search": [
                "search_papers with a specific query and a few fields",
                "get_paper_details for interesting results",
                "get_paper_citations or get_paper_references for related work"
            ],
            "author_profile": [
                "search_authors by name",
                "get_author_details for the matching authorId",
                "get_author_papers to page through their work"
            ]
        },
        "performance_tips": [
            "Request only the fields you need",
            "Use offset to page through large result sets",
            "Each call waits a fixed pacing delay before it is sent"
        ]
    })
}

//! MCP tool implementations.
//!
//! Each tool:
//! 1. Parses and validates its arguments
//! 2. Builds a [`RequestSpec`](crate::client::RequestSpec) for one Graph API endpoint
//! 3. Hands the upstream result back unchanged

mod endpoints;

pub use endpoints::{
    ENDPOINTS, EndpointKind, EndpointSpec, EndpointTool, GET_AUTHOR_DETAILS, GET_AUTHOR_PAPERS,
    GET_PAPER_AUTHORS, GET_PAPER_CITATIONS, GET_PAPER_DETAILS, GET_PAPER_REFERENCES, IdParam,
    SEARCH_AUTHORS, SEARCH_PAPERS, get_author_details, get_author_papers, get_paper_authors,
    get_paper_citations, get_paper_details, get_paper_references, invoke, search_authors,
    search_papers,
};

use std::sync::Arc;

use crate::client::{ApiResponse, SemanticScholarClient};
use crate::error::ToolResult;

/// Tool execution context.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// API client.
    pub client: Arc<SemanticScholarClient>,
}

impl ToolContext {
    /// Create a new tool context.
    #[must_use]
    pub fn new(client: Arc<SemanticScholarClient>) -> Self {
        Self { client }
    }
}

/// Trait for MCP tools.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Tool name (e.g., "search_papers").
    fn name(&self) -> &'static str;

    /// Tool description for LLM.
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with given input.
    async fn execute(
        &self,
        ctx: &ToolContext,
        input: serde_json::Value,
    ) -> ToolResult<ApiResponse>;
}

/// Register all tools.
#[must_use]
pub fn register_all_tools() -> Vec<Box<dyn McpTool>> {
    ENDPOINTS
        .iter()
        .copied()
        .map(|spec| Box::new(EndpointTool::new(spec)) as Box<dyn McpTool>)
        .collect()
}

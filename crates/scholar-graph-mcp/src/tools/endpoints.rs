//! Graph API endpoint tools.
//!
//! The eight tools differ only in their descriptor: path, identifier, paging
//! and which filters they take. One generic operation does the rest
//! (validate → build request → delegate to the client).

use serde_json::{Map, Value, json};

use super::{McpTool, ToolContext};
use crate::client::{ApiResponse, RequestSpec};
use crate::config::{api, fields};
use crate::error::{ToolError, ToolResult};
use crate::models::{
    SearchFilters, StringList, ToolArguments, normalize_publication_date, normalize_year,
};

/// Shape of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    /// Free-text search, paginated.
    Search,
    /// Single resource by ID.
    Lookup,
    /// Paginated sub-resource of an ID.
    Paginated,
}

/// Identifier embedded in the endpoint path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdParam {
    Paper,
    Author,
}

impl IdParam {
    /// Argument name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Paper => "paper_id",
            Self::Author => "author_id",
        }
    }

    const fn description(self) -> &'static str {
        match self {
            Self::Paper => {
                "Semantic Scholar paper ID or prefixed external ID \
                 (e.g. 'DOI:10.1038/nature14539', 'ARXIV:1506.02142', 'CorpusId:215416146')"
            }
            Self::Author => "Semantic Scholar author ID (e.g. '1741101')",
        }
    }
}

/// Per-endpoint descriptor.
#[derive(Debug)]
pub struct EndpointSpec {
    /// Tool name.
    pub name: &'static str,
    /// Tool description for LLM.
    pub description: &'static str,
    /// Path under the Graph API root; `{id}` is replaced by the identifier.
    pub path: &'static str,
    pub kind: EndpointKind,
    pub id_param: Option<IdParam>,
    /// Fields documented for this endpoint.
    pub field_catalog: &'static [&'static str],
    /// Reject fields outside `field_catalog`.
    pub strict_fields: bool,
    /// Accepts the paper search filters.
    pub filters: bool,
    pub default_limit: u32,
    pub max_limit: u32,
}

const FILTER_ARGS: &[&str] = &[
    "year",
    "publication_date_or_year",
    "venue",
    "fields_of_study",
    "publication_types",
    "min_citation_count",
    "open_access_pdf",
];

pub static SEARCH_PAPERS: EndpointSpec = EndpointSpec {
    name: "search_papers",
    description: "Search for academic papers by keyword. Supports filtering by year, \
                  publication date range, venue, field of study, publication type, minimum \
                  citation count and open access availability. Returns the Semantic Scholar \
                  search response (total, offset, next, data).",
    path: "/paper/search",
    kind: EndpointKind::Search,
    id_param: None,
    field_catalog: fields::PAPER,
    strict_fields: true,
    filters: true,
    default_limit: 10,
    max_limit: 100,
};

pub static GET_PAPER_DETAILS: EndpointSpec = EndpointSpec {
    name: "get_paper_details",
    description: "Get detailed information about a single paper by Semantic Scholar ID or \
                  external ID (DOI, ArXiv, CorpusId, ...).",
    path: "/paper/{id}",
    kind: EndpointKind::Lookup,
    id_param: Some(IdParam::Paper),
    field_catalog: fields::PAPER,
    strict_fields: false,
    filters: false,
    default_limit: 0,
    max_limit: 0,
};

pub static GET_PAPER_AUTHORS: EndpointSpec = EndpointSpec {
    name: "get_paper_authors",
    description: "List the authors of a paper, paginated with limit/offset.",
    path: "/paper/{id}/authors",
    kind: EndpointKind::Paginated,
    id_param: Some(IdParam::Paper),
    field_catalog: fields::AUTHOR,
    strict_fields: false,
    filters: false,
    default_limit: 100,
    max_limit: 1000,
};

pub static GET_PAPER_CITATIONS: EndpointSpec = EndpointSpec {
    name: "get_paper_citations",
    description: "List papers that cite the given paper, paginated with limit/offset. \
                  Citation fields such as contexts, intents and isInfluential are available.",
    path: "/paper/{id}/citations",
    kind: EndpointKind::Paginated,
    id_param: Some(IdParam::Paper),
    field_catalog: fields::CITATION,
    strict_fields: false,
    filters: false,
    default_limit: 100,
    max_limit: 1000,
};

pub static GET_PAPER_REFERENCES: EndpointSpec = EndpointSpec {
    name: "get_paper_references",
    description: "List papers referenced by the given paper, paginated with limit/offset.",
    path: "/paper/{id}/references",
    kind: EndpointKind::Paginated,
    id_param: Some(IdParam::Paper),
    field_catalog: fields::CITATION,
    strict_fields: false,
    filters: false,
    default_limit: 100,
    max_limit: 1000,
};

pub static SEARCH_AUTHORS: EndpointSpec = EndpointSpec {
    name: "search_authors",
    description: "Search for authors by name. Returns the Semantic Scholar search response \
                  (total, offset, next, data).",
    path: "/author/search",
    kind: EndpointKind::Search,
    id_param: None,
    field_catalog: fields::AUTHOR,
    strict_fields: false,
    filters: false,
    default_limit: 10,
    max_limit: 100,
};

pub static GET_AUTHOR_DETAILS: EndpointSpec = EndpointSpec {
    name: "get_author_details",
    description: "Get profile information about an author: name, affiliations, paper and \
                  citation counts, h-index.",
    path: "/author/{id}",
    kind: EndpointKind::Lookup,
    id_param: Some(IdParam::Author),
    field_catalog: fields::AUTHOR,
    strict_fields: false,
    filters: false,
    default_limit: 0,
    max_limit: 0,
};

pub static GET_AUTHOR_PAPERS: EndpointSpec = EndpointSpec {
    name: "get_author_papers",
    description: "List papers written by an author, paginated with limit/offset.",
    path: "/author/{id}/papers",
    kind: EndpointKind::Paginated,
    id_param: Some(IdParam::Author),
    field_catalog: fields::PAPER,
    strict_fields: false,
    filters: false,
    default_limit: 100,
    max_limit: 1000,
};

/// All endpoint descriptors, in registration order.
pub static ENDPOINTS: [&EndpointSpec; 8] = [
    &SEARCH_PAPERS,
    &GET_PAPER_DETAILS,
    &GET_PAPER_AUTHORS,
    &GET_PAPER_CITATIONS,
    &GET_PAPER_REFERENCES,
    &SEARCH_AUTHORS,
    &GET_AUTHOR_DETAILS,
    &GET_AUTHOR_PAPERS,
];

impl EndpointSpec {
    const fn paginated(&self) -> bool {
        matches!(self.kind, EndpointKind::Search | EndpointKind::Paginated)
    }

    /// Whether the tool takes an argument of this name.
    #[must_use]
    pub fn accepts(&self, arg: &str) -> bool {
        match arg {
            "fields" => true,
            "query" => self.kind == EndpointKind::Search,
            "limit" | "offset" => self.paginated(),
            _ if self.id_param.is_some_and(|id| id.name() == arg) => true,
            _ => self.filters && FILTER_ARGS.contains(&arg),
        }
    }

    /// Validate arguments and build the upstream request.
    ///
    /// Nothing is sent; a validation failure means no network call happens.
    pub fn build_request(&self, args: &ToolArguments) -> ToolResult<RequestSpec> {
        if let Some(name) = args.present().into_iter().find(|name| !self.accepts(name)) {
            return Err(ToolError::validation(
                name,
                format!("is not a parameter of {}", self.name),
            ));
        }

        let path = match self.id_param {
            Some(param) => self.path.replace("{id}", &required_id(param, args)?),
            None => self.path.to_string(),
        };
        let mut request = RequestSpec::get(format!("{}{}", api::GRAPH_API_PATH, path));

        if self.kind == EndpointKind::Search {
            let query = args
                .query
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .ok_or_else(|| {
                    ToolError::validation("query", "is required and cannot be empty")
                })?;
            request = request.with_query("query", query);
        }

        if let Some(list) = &args.fields {
            request = request.with_query("fields", self.validate_fields(list)?);
        }

        if self.paginated() {
            let limit = args.limit.unwrap_or(i64::from(self.default_limit));
            if !(1..=i64::from(self.max_limit)).contains(&limit) {
                return Err(ToolError::validation(
                    "limit",
                    format!("must be between 1 and {} (got {limit})", self.max_limit),
                ));
            }
            let offset = args.offset.unwrap_or(0);
            if offset < 0 {
                return Err(ToolError::validation(
                    "offset",
                    format!("must be non-negative (got {offset})"),
                ));
            }
            request = request.with_query("limit", limit).with_query("offset", offset);
        }

        if self.filters {
            request = apply_filters(request, args)?;
        }

        Ok(request)
    }

    fn validate_fields(&self, list: &StringList) -> ToolResult<Vec<String>> {
        let requested = list.validate_tokens("fields")?;
        if self.strict_fields {
            let invalid: Vec<&str> = requested
                .iter()
                .map(String::as_str)
                .filter(|f| !self.field_catalog.contains(f))
                .collect();
            if !invalid.is_empty() {
                let mut valid = self.field_catalog.to_vec();
                valid.sort_unstable();
                return Err(ToolError::validation(
                    "fields",
                    format!("invalid field names {invalid:?}; valid fields: {}", valid.join(", ")),
                ));
            }
        }
        Ok(requested)
    }

    /// JSON Schema for `tools/list`.
    #[must_use]
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        if self.kind == EndpointKind::Search {
            properties.insert(
                "query".into(),
                json!({"type": "string", "description": "Search terms (e.g. 'graph neural networks')"}),
            );
            required.push("query");
        }

        if let Some(param) = self.id_param {
            properties.insert(
                param.name().into(),
                json!({"type": "string", "description": param.description()}),
            );
            required.push(param.name());
        }

        properties.insert(
            "fields".into(),
            json!({
                "type": "array",
                "items": {"type": "string"},
                "description": format!(
                    "Fields to return, in order (a comma-separated string is also accepted). \
                     Documented fields: {}",
                    self.field_catalog.join(", ")
                )
            }),
        );

        if self.paginated() {
            properties.insert(
                "limit".into(),
                json!({
                    "type": "integer",
                    "minimum": 1,
                    "maximum": self.max_limit,
                    "default": self.default_limit,
                    "description": "Number of results to return"
                }),
            );
            properties.insert(
                "offset".into(),
                json!({"type": "integer", "minimum": 0, "default": 0, "description": "Offset for pagination"}),
            );
        }

        if self.filters {
            properties.insert(
                "year".into(),
                json!({"type": "string", "description": "Year or range: 2019, 2016-2020, 2010-, -2015"}),
            );
            properties.insert(
                "publication_date_or_year".into(),
                json!({
                    "type": "string",
                    "description": "Date or range using ':' (2024, 2023:2024, 2024-01:2024-06, 2024-01-01:2024-12-31)"
                }),
            );
            for (name, description) in [
                ("venue", "Venue names (e.g. 'Nature', 'NeurIPS')"),
                ("fields_of_study", "Fields of study (e.g. 'Computer Science', 'Medicine')"),
                ("publication_types", "Publication types (e.g. 'JournalArticle', 'Conference')"),
            ] {
                properties.insert(
                    name.into(),
                    json!({"type": "array", "items": {"type": "string"}, "description": description}),
                );
            }
            properties.insert(
                "min_citation_count".into(),
                json!({"type": "integer", "minimum": 0, "description": "Minimum citation count"}),
            );
            properties.insert(
                "open_access_pdf".into(),
                json!({"type": "boolean", "description": "Only papers with a public PDF"}),
            );
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false
        })
    }
}

fn required_id(param: IdParam, args: &ToolArguments) -> ToolResult<String> {
    let raw = match param {
        IdParam::Paper => args.paper_id.as_deref(),
        IdParam::Author => args.author_id.as_deref(),
    };
    let id = raw
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ToolError::validation(param.name(), "is required and cannot be empty"))?;

    if id.chars().any(|c| c.is_whitespace() || c.is_control() || c == '?' || c == '#') {
        return Err(ToolError::validation(
            param.name(),
            format!("'{id}' must not contain whitespace, '?' or '#'"),
        ));
    }
    if param == IdParam::Author && id.contains('/') {
        return Err(ToolError::validation(param.name(), format!("'{id}' must not contain '/'")));
    }
    if id.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(ToolError::validation(
            param.name(),
            format!("'{id}' must not contain '.' or '..' path segments"),
        ));
    }
    Ok(encode_id(id))
}

/// Percent-encodes everything outside the unreserved set, keeping `:` for
/// prefixed IDs and `/` for DOIs and URLs.
fn encode_id(id: &str) -> String {
    let mut encoded = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b':' | b'/' => {
                encoded.push(char::from(byte));
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

fn apply_filters(mut request: RequestSpec, args: &ToolArguments) -> ToolResult<RequestSpec> {
    if let Some(year) = &args.year {
        request = request.with_query("year", normalize_year(year)?);
    }
    if let Some(date) = &args.publication_date_or_year {
        request = request.with_query("publicationDateOrYear", normalize_publication_date(date)?);
    }
    if let Some(venue) = &args.venue {
        request = request.with_query("venue", venue.validate_labels("venue")?);
    }
    if let Some(study) = &args.fields_of_study {
        request = request.with_query("fieldsOfStudy", study.validate_labels("fields_of_study")?);
    }
    if let Some(types) = &args.publication_types {
        request =
            request.with_query("publicationTypes", types.validate_tokens("publication_types")?);
    }
    if let Some(min) = args.min_citation_count {
        if min < 0 {
            return Err(ToolError::validation(
                "min_citation_count",
                format!("must be non-negative (got {min})"),
            ));
        }
        request = request.with_query("minCitationCount", min);
    }
    if args.open_access_pdf == Some(true) {
        request = request.with_query("openAccessPdf", "");
    }
    Ok(request)
}

/// Run one endpoint: validate, call upstream, hand back the response untouched.
pub async fn invoke(
    spec: &EndpointSpec,
    ctx: &ToolContext,
    args: &ToolArguments,
) -> ToolResult<ApiResponse> {
    let request = spec.build_request(args).inspect_err(|e| {
        tracing::info!(tool = spec.name, error = %e, "Parameter validation failed");
    })?;

    tracing::debug!(
        tool = spec.name,
        path = %request.path,
        query = ?request.query_pairs(),
        "Built request"
    );

    let response = ctx.client.execute(&request).await?;

    // The tracing macros bring their own `Value` into scope, so extract first.
    match spec.kind {
        EndpointKind::Search | EndpointKind::Paginated => {
            let total = response.body.get("total").and_then(Value::as_u64);
            let returned = response.body.get("data").and_then(Value::as_array).map(Vec::len);
            tracing::info!(
                tool = spec.name,
                total,
                returned,
                attempts = response.attempts,
                "Tool call succeeded"
            );
        }
        EndpointKind::Lookup => {
            let label = response
                .body
                .get("title")
                .or_else(|| response.body.get("name"))
                .and_then(Value::as_str)
                .unwrap_or("Unknown");
            tracing::info!(
                tool = spec.name,
                label,
                attempts = response.attempts,
                "Tool call succeeded"
            );
        }
    }

    Ok(response)
}

/// Generic MCP tool backed by an [`EndpointSpec`].
#[derive(Debug, Clone, Copy)]
pub struct EndpointTool {
    spec: &'static EndpointSpec,
}

impl EndpointTool {
    #[must_use]
    pub const fn new(spec: &'static EndpointSpec) -> Self {
        Self { spec }
    }

    #[must_use]
    pub const fn spec(&self) -> &'static EndpointSpec {
        self.spec
    }
}

#[async_trait::async_trait]
impl McpTool for EndpointTool {
    fn name(&self) -> &'static str {
        self.spec.name
    }

    fn description(&self) -> &'static str {
        self.spec.description
    }

    fn input_schema(&self) -> Value {
        self.spec.input_schema()
    }

    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<ApiResponse> {
        let args = ToolArguments::from_value(input)?;
        invoke(self.spec, ctx, &args).await
    }
}

fn field_list(fields: &[&str]) -> Option<StringList> {
    (!fields.is_empty()).then(|| StringList::from(fields))
}

fn page_arguments(param: IdParam, id: &str, limit: u32, offset: u32) -> ToolArguments {
    let mut args = ToolArguments {
        limit: Some(i64::from(limit)),
        offset: Some(i64::from(offset)),
        ..ToolArguments::default()
    };
    match param {
        IdParam::Paper => args.paper_id = Some(id.to_string()),
        IdParam::Author => args.author_id = Some(id.to_string()),
    }
    args
}

/// Search papers by keyword with optional filters.
pub async fn search_papers(
    ctx: &ToolContext,
    query: &str,
    filters: SearchFilters,
) -> ToolResult<ApiResponse> {
    invoke(&SEARCH_PAPERS, ctx, &filters.into_arguments(query)).await
}

/// Fetch one paper. An empty `fields` slice uses the upstream default fields.
pub async fn get_paper_details(
    ctx: &ToolContext,
    paper_id: &str,
    fields: &[&str],
) -> ToolResult<ApiResponse> {
    let args = ToolArguments {
        paper_id: Some(paper_id.to_string()),
        fields: field_list(fields),
        ..ToolArguments::default()
    };
    invoke(&GET_PAPER_DETAILS, ctx, &args).await
}

pub async fn get_paper_authors(
    ctx: &ToolContext,
    paper_id: &str,
    limit: u32,
    offset: u32,
) -> ToolResult<ApiResponse> {
    invoke(&GET_PAPER_AUTHORS, ctx, &page_arguments(IdParam::Paper, paper_id, limit, offset)).await
}

pub async fn get_paper_citations(
    ctx: &ToolContext,
    paper_id: &str,
    limit: u32,
    offset: u32,
) -> ToolResult<ApiResponse> {
    invoke(&GET_PAPER_CITATIONS, ctx, &page_arguments(IdParam::Paper, paper_id, limit, offset))
        .await
}

pub async fn get_paper_references(
    ctx: &ToolContext,
    paper_id: &str,
    limit: u32,
    offset: u32,
) -> ToolResult<ApiResponse> {
    invoke(&GET_PAPER_REFERENCES, ctx, &page_arguments(IdParam::Paper, paper_id, limit, offset))
        .await
}

/// Search authors by name with default paging.
pub async fn search_authors(ctx: &ToolContext, query: &str) -> ToolResult<ApiResponse> {
    let args = ToolArguments { query: Some(query.to_string()), ..ToolArguments::default() };
    invoke(&SEARCH_AUTHORS, ctx, &args).await
}

pub async fn get_author_details(
    ctx: &ToolContext,
    author_id: &str,
    fields: &[&str],
) -> ToolResult<ApiResponse> {
    let args = ToolArguments {
        author_id: Some(author_id.to_string()),
        fields: field_list(fields),
        ..ToolArguments::default()
    };
    invoke(&GET_AUTHOR_DETAILS, ctx, &args).await
}

pub async fn get_author_papers(
    ctx: &ToolContext,
    author_id: &str,
    limit: u32,
    offset: u32,
) -> ToolResult<ApiResponse> {
    invoke(&GET_AUTHOR_PAPERS, ctx, &page_arguments(IdParam::Author, author_id, limit, offset))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::QueryValue;

    fn args(value: Value) -> ToolArguments {
        ToolArguments::from_value(value).unwrap()
    }

    #[test]
    fn test_every_endpoint_has_unique_name() {
        let mut names: Vec<&str> = ENDPOINTS.iter().map(|e| e.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_paths_are_under_graph_api() {
        let request = GET_PAPER_CITATIONS.build_request(&args(json!({"paper_id": "abc"}))).unwrap();
        assert_eq!(request.path, "/graph/v1/paper/abc/citations");
        assert_eq!(request.query_value("limit"), Some(&QueryValue::Number(100)));
        assert_eq!(request.query_value("offset"), Some(&QueryValue::Number(0)));
    }

    #[test]
    fn test_lookup_has_no_paging() {
        let request = GET_AUTHOR_DETAILS.build_request(&args(json!({"author_id": "42"}))).unwrap();
        assert!(request.query_value("limit").is_none());
        assert!(!GET_AUTHOR_DETAILS.accepts("limit"));
    }

    #[test]
    fn test_filters_only_on_paper_search() {
        assert!(SEARCH_PAPERS.accepts("venue"));
        assert!(!SEARCH_AUTHORS.accepts("venue"));
        assert!(!GET_PAPER_DETAILS.accepts("query"));
        assert!(GET_PAPER_DETAILS.accepts("paper_id"));
        assert!(!GET_PAPER_DETAILS.accepts("author_id"));
    }

    #[test]
    fn test_doi_ids_keep_their_slash() {
        let request = GET_PAPER_DETAILS
            .build_request(&args(json!({"paper_id": "DOI:10.1038/nature14539"})))
            .unwrap();
        assert_eq!(request.path, "/graph/v1/paper/DOI:10.1038/nature14539");
    }

    #[test]
    fn test_ids_cannot_leave_their_endpoint() {
        for (spec, value) in [
            (&GET_AUTHOR_DETAILS, json!({"author_id": "1741101/papers"})),
            (&GET_PAPER_DETAILS, json!({"paper_id": "../author/42"})),
            (&GET_PAPER_DETAILS, json!({"paper_id": "abc/./citations"})),
            (&GET_PAPER_CITATIONS, json!({"paper_id": "DOI:10.1/.."})),
        ] {
            assert!(spec.build_request(&args(value.clone())).is_err(), "{value}");
        }
    }

    #[test]
    fn test_reserved_id_characters_are_encoded() {
        let request = GET_PAPER_DETAILS
            .build_request(&args(json!({"paper_id": "DOI:10.1002/(SICI)1097;x%2e"})))
            .unwrap();
        assert_eq!(request.path, "/graph/v1/paper/DOI:10.1002/%28SICI%291097%3Bx%252e");

        let request = GET_PAPER_DETAILS
            .build_request(&args(json!({"paper_id": "URL:https://arxiv.org/abs/2106.15928v1"})))
            .unwrap();
        assert_eq!(request.path, "/graph/v1/paper/URL:https://arxiv.org/abs/2106.15928v1");
    }

    #[test]
    fn test_schema_lists_required_arguments() {
        let schema = GET_PAPER_REFERENCES.input_schema();
        assert_eq!(schema["required"], json!(["paper_id"]));
        assert_eq!(schema["properties"]["limit"]["maximum"], 1000);
        assert!(schema["properties"].get("query").is_none());

        let schema = SEARCH_PAPERS.input_schema();
        assert_eq!(schema["required"], json!(["query"]));
        assert!(schema["properties"].get("publication_date_or_year").is_some());
    }

    #[test]
    fn test_strict_fields_reports_invalid_names() {
        let err = SEARCH_PAPERS
            .build_request(&args(json!({"query": "x", "fields": "title,tldr"})))
            .unwrap_err();
        assert!(err.to_string().contains("tldr"));

        // Lookups pass field names through.
        assert!(
            GET_PAPER_DETAILS
                .build_request(&args(json!({"paper_id": "abc", "fields": ["tldr"]})))
                .is_ok()
        );
    }
}

//! Input models for MCP tool parameters.
//!
//! All eight endpoint tools share one argument struct; which names a given
//! tool accepts is decided by its descriptor in `tools::endpoints`.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ToolError, ToolResult};

/// Ordered list of strings, accepted either as a JSON array or a
/// comma-separated string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawList", into = "Vec<String>")]
pub struct StringList(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawList {
    Joined(String),
    Items(Vec<String>),
}

impl From<RawList> for StringList {
    fn from(raw: RawList) -> Self {
        match raw {
            RawList::Joined(s) => Self(s.split(',').map(|p| p.trim().to_string()).collect()),
            RawList::Items(items) => {
                Self(items.into_iter().map(|p| p.trim().to_string()).collect())
            }
        }
    }
}

impl From<StringList> for Vec<String> {
    fn from(list: StringList) -> Self {
        list.0
    }
}

impl<S: AsRef<str>> From<&[S]> for StringList {
    fn from(items: &[S]) -> Self {
        Self(items.iter().map(|s| s.as_ref().trim().to_string()).collect())
    }
}

impl StringList {
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reject empty entries and entries containing whitespace.
    pub fn validate_tokens(&self, field: &str) -> ToolResult<Vec<String>> {
        if self.0.is_empty() {
            return Err(ToolError::validation(field, "must contain at least one value"));
        }
        for item in &self.0 {
            if item.is_empty() {
                return Err(ToolError::validation(field, "contains an empty entry"));
            }
            if item.chars().any(char::is_whitespace) {
                return Err(ToolError::validation(
                    field,
                    format!("'{item}' must not contain whitespace"),
                ));
            }
        }
        Ok(self.0.clone())
    }

    /// Reject empty entries; inner whitespace is allowed (venue names, study fields).
    pub fn validate_labels(&self, field: &str) -> ToolResult<Vec<String>> {
        if self.0.is_empty() || self.0.iter().any(String::is_empty) {
            return Err(ToolError::validation(field, "must not contain empty entries"));
        }
        Ok(self.0.clone())
    }
}

/// Arguments of every endpoint tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolArguments {
    /// Search query (search tools).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// Paper ID: S2 ID or prefixed external ID (`DOI:`, `ARXIV:`, `CorpusId:` ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_id: Option<String>,

    /// Semantic Scholar author ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,

    /// Requested fields, order preserved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<StringList>,

    /// Page size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,

    /// Page offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    /// Publication year or range (`2019`, `2016-2020`, `2010-`, `-2015`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,

    /// Publication date/year, `:` separated range (`2023:2024`, `2024-01:2024-06`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date_or_year: Option<String>,

    /// Venue names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<StringList>,

    /// Fields of study (e.g. `Computer Science`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_of_study: Option<StringList>,

    /// Publication types (e.g. `JournalArticle`, `Conference`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_types: Option<StringList>,

    /// Minimum citation count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_citation_count: Option<i64>,

    /// Only papers with a public PDF.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_access_pdf: Option<bool>,
}

impl ToolArguments {
    /// Parse raw `tools/call` arguments. `null` counts as no arguments.
    pub fn from_value(value: serde_json::Value) -> ToolResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|e| ToolError::validation("arguments", e.to_string()))
    }

    /// Names of the arguments that were supplied.
    #[must_use]
    pub fn present(&self) -> Vec<&'static str> {
        let flags = [
            ("query", self.query.is_some()),
            ("paper_id", self.paper_id.is_some()),
            ("author_id", self.author_id.is_some()),
            ("fields", self.fields.is_some()),
            ("limit", self.limit.is_some()),
            ("offset", self.offset.is_some()),
            ("year", self.year.is_some()),
            ("publication_date_or_year", self.publication_date_or_year.is_some()),
            ("venue", self.venue.is_some()),
            ("fields_of_study", self.fields_of_study.is_some()),
            ("publication_types", self.publication_types.is_some()),
            ("min_citation_count", self.min_citation_count.is_some()),
            ("open_access_pdf", self.open_access_pdf.is_some()),
        ];
        flags.into_iter().filter(|(_, set)| *set).map(|(name, _)| name).collect()
    }
}

/// Optional filters of `search_papers`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub fields: Option<Vec<String>>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub year: Option<String>,
    pub publication_date_or_year: Option<String>,
    pub venue: Option<Vec<String>>,
    pub fields_of_study: Option<Vec<String>>,
    pub publication_types: Option<Vec<String>>,
    pub min_citation_count: Option<u32>,
    pub open_access_pdf: bool,
}

impl SearchFilters {
    /// Merge the filters with a query into tool arguments.
    #[must_use]
    pub fn into_arguments(self, query: &str) -> ToolArguments {
        ToolArguments {
            query: Some(query.to_string()),
            fields: self.fields.as_deref().map(StringList::from),
            limit: self.limit.map(i64::from),
            offset: self.offset.map(i64::from),
            year: self.year,
            publication_date_or_year: self.publication_date_or_year,
            venue: self.venue.as_deref().map(StringList::from),
            fields_of_study: self.fields_of_study.as_deref().map(StringList::from),
            publication_types: self.publication_types.as_deref().map(StringList::from),
            min_citation_count: self.min_citation_count.map(i64::from),
            open_access_pdf: self.open_access_pdf.then_some(true),
            ..ToolArguments::default()
        }
    }
}

static YEAR_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})?(-(\d{4})?)?$").expect("valid year regex"));

static DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    let date = r"\d{4}(-\d{2}(-\d{2})?)?";
    Regex::new(&format!(r"^({date})?(:({date})?)?$")).expect("valid date regex")
});

static HYPHEN_YEAR_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{4})$").expect("valid year range regex"));

/// Validate a `year` filter: `2019`, `2016-2020`, `2010-` or `-2015`.
pub fn normalize_year(raw: &str) -> ToolResult<String> {
    let value = raw.trim();
    let caps = YEAR_RANGE
        .captures(value)
        .filter(|_| !value.is_empty() && value != "-")
        .ok_or_else(|| {
            ToolError::validation(
                "year",
                format!("'{raw}' is not a year or year range like 2016-2020"),
            )
        })?;

    if let (Some(start), Some(end)) = (caps.get(1), caps.get(3)) {
        if start.as_str() > end.as_str() {
            return Err(ToolError::validation(
                "year",
                format!("range '{value}' ends before it starts"),
            ));
        }
    }
    Ok(value.to_string())
}

/// Validate a `publication_date_or_year` filter, rewriting `2024-2025` to `2024:2025`.
pub fn normalize_publication_date(raw: &str) -> ToolResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ToolError::validation("publication_date_or_year", "cannot be empty"));
    }

    let value = match HYPHEN_YEAR_RANGE.captures(trimmed) {
        Some(caps) => {
            let rewritten = format!("{}:{}", &caps[1], &caps[2]);
            tracing::debug!(from = trimmed, to = %rewritten, "Converted date range format");
            rewritten
        }
        None => trimmed.to_string(),
    };

    if value == ":" || !DATE_RANGE.is_match(&value) {
        return Err(ToolError::validation(
            "publication_date_or_year",
            format!(
                "'{raw}' is not a valid date or range; use 2024, 2023:2024, \
                 2024-01:2024-06 or 2024-01-01:2024-12-31"
            ),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_string_list_from_comma_string() {
        let list: StringList = serde_json::from_value(json!("title, year,authors")).unwrap();
        assert_eq!(list.as_slice(), ["title", "year", "authors"]);
    }

    #[test]
    fn test_string_list_from_array_keeps_order() {
        let list: StringList = serde_json::from_value(json!(["year", "title"])).unwrap();
        assert_eq!(list.as_slice(), ["year", "title"]);
    }

    #[test]
    fn test_empty_token_rejected() {
        let list: StringList = serde_json::from_value(json!("title,,year")).unwrap();
        assert!(list.validate_tokens("fields").is_err());
    }

    #[test]
    fn test_unknown_argument_rejected() {
        let err = ToolArguments::from_value(json!({"query": "x", "limt": 5})).unwrap_err();
        assert!(err.to_string().contains("limt"));
    }

    #[test]
    fn test_null_arguments_are_empty() {
        assert_eq!(
            ToolArguments::from_value(serde_json::Value::Null).unwrap(),
            ToolArguments::default()
        );
    }

    #[test]
    fn test_present_lists_supplied_names() {
        let args = ToolArguments::from_value(json!({"paper_id": "abc", "limit": 5})).unwrap();
        assert_eq!(args.present(), vec!["paper_id", "limit"]);
    }

    #[test]
    fn test_year_forms() {
        for ok in ["2019", "2016-2020", "2010-", "-2015"] {
            assert_eq!(normalize_year(ok).unwrap(), ok);
        }
        for bad in ["", "-", "19", "2020-2010", "2020:2021", "abcd"] {
            assert!(normalize_year(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_publication_date_hyphen_range_rewritten() {
        assert_eq!(normalize_publication_date("2024-2025").unwrap(), "2024:2025");
        assert_eq!(normalize_publication_date(" 2024 ").unwrap(), "2024");
    }

    #[test]
    fn test_publication_date_forms() {
        for ok in
            ["2023:2024", "2024-01:2024-06", "2024-01-01:2024-12-31", "2020:", ":2021", "2024-05"]
        {
            assert!(normalize_publication_date(ok).is_ok(), "{ok} should be accepted");
        }
        for bad in ["", ":", "last year", "2024/01", "20-01"] {
            assert!(normalize_publication_date(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_search_filters_into_arguments() {
        let filters = SearchFilters {
            limit: Some(5),
            venue: Some(vec!["Nature".to_string()]),
            open_access_pdf: true,
            ..SearchFilters::default()
        };
        let args = filters.into_arguments("protein folding");
        assert_eq!(args.query.as_deref(), Some("protein folding"));
        assert_eq!(args.limit, Some(5));
        assert_eq!(args.open_access_pdf, Some(true));
        assert!(args.offset.is_none());
    }
}

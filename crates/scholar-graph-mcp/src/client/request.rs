//! Per-call request description consumed by [`SemanticScholarClient::execute`].
//!
//! [`SemanticScholarClient::execute`]: super::SemanticScholarClient::execute

use serde_json::Value;

/// HTTP method supported by the Graph API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Text(String),
    Number(i64),
    /// Rendered comma-joined, order preserved.
    List(Vec<String>),
}

impl QueryValue {
    /// Wire representation.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::List(items) => items.join(","),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Everything needed to perform one logical API call.
///
/// `path` is relative to the configured base URL and starts with `/`.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, QueryValue)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestSpec {
    /// A GET request with no parameters.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// A POST request carrying a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self { method: HttpMethod::Post, body: Some(body), ..Self::get(path) }
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Append a per-request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a query parameter by name.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&QueryValue> {
        self.query.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Query parameters rendered for the wire.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query.iter().map(|(k, v)| (k.clone(), v.render())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_renders_comma_joined_in_order() {
        let value = QueryValue::from(vec!["year".to_string(), "title".to_string()]);
        assert_eq!(value.render(), "year,title");
    }

    #[test]
    fn test_query_pairs_preserve_insertion_order() {
        let spec = RequestSpec::get("/graph/v1/paper/search")
            .with_query("query", "graph neural networks")
            .with_query("limit", 10u32)
            .with_query("offset", 0i64);

        assert_eq!(
            spec.query_pairs(),
            vec![
                ("query".to_string(), "graph neural networks".to_string()),
                ("limit".to_string(), "10".to_string()),
                ("offset".to_string(), "0".to_string()),
            ]
        );
        assert_eq!(spec.query_value("limit"), Some(&QueryValue::Number(10)));
    }

    #[test]
    fn test_post_carries_body() {
        let spec = RequestSpec::post("/graph/v1/paper/batch", serde_json::json!({"ids": ["a"]}));
        assert_eq!(spec.method, HttpMethod::Post);
        assert!(spec.body.is_some());
    }
}

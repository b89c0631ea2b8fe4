//! Property-based tests for tool argument validation.

use proptest::prelude::*;
use serde_json::json;

use scholar_graph_mcp::client::QueryValue;
use scholar_graph_mcp::models::{ToolArguments, normalize_publication_date, normalize_year};
use scholar_graph_mcp::tools::{GET_PAPER_CITATIONS, SEARCH_PAPERS};

fn args(value: serde_json::Value) -> ToolArguments {
    ToolArguments::from_value(value).expect("valid arguments")
}

proptest! {
    /// Search limits inside 1..=100 are sent as given; everything else is rejected.
    #[test]
    fn search_limit_bounds(limit in -50i64..300) {
        let result = SEARCH_PAPERS.build_request(&args(json!({"query": "q", "limit": limit})));
        if (1..=100).contains(&limit) {
            let request = result.expect("limit in range");
            prop_assert_eq!(request.query_value("limit"), Some(&QueryValue::Number(limit)));
        } else {
            prop_assert!(result.is_err());
        }
    }

    /// Paginated endpoints accept up to 1000.
    #[test]
    fn paginated_limit_bounds(limit in -10i64..2000, offset in -10i64..10_000) {
        let result = GET_PAPER_CITATIONS
            .build_request(&args(json!({"paper_id": "abc", "limit": limit, "offset": offset})));
        prop_assert_eq!(result.is_ok(), (1..=1000).contains(&limit) && offset >= 0);
    }

    /// Field order survives from arguments to the wire.
    #[test]
    fn fields_keep_order(fields in proptest::sample::subsequence(
        vec!["title", "year", "authors", "venue", "citationCount", "abstract"], 1..6,
    ).prop_shuffle()) {
        let request = SEARCH_PAPERS
            .build_request(&args(json!({"query": "q", "fields": fields.clone()})))
            .expect("catalog fields");
        let rendered = request.query_value("fields").map(QueryValue::render);
        prop_assert_eq!(rendered, Some(fields.join(",")));
    }

    /// Any ordered four-digit year range is accepted unchanged.
    #[test]
    fn ordered_year_ranges(start in 1900u32..2100, span in 0u32..50) {
        let value = format!("{start}-{}", start + span);
        prop_assert_eq!(normalize_year(&value).unwrap(), value);
    }

    /// `YYYY-YYYY` always becomes `YYYY:YYYY`.
    #[test]
    fn hyphen_ranges_become_colon(a in 1900u32..2100, b in 1900u32..2100) {
        let normalized = normalize_publication_date(&format!("{a}-{b}")).unwrap();
        prop_assert_eq!(normalized, format!("{a}:{b}"));
    }

    /// Identifiers with whitespace never produce a request.
    #[test]
    fn ids_with_whitespace_rejected(left in "[a-z0-9]{1,8}", right in "[a-z0-9]{1,8}") {
        let id = format!("{left} {right}");
        let result = GET_PAPER_CITATIONS.build_request(&args(json!({"paper_id": id})));
        prop_assert!(result.is_err());
    }
}

//! Argument models for the endpoint tools.
//!
//! Upstream payloads are passed through as `serde_json::Value`, so there are
//! no response models here.

mod inputs;

pub use inputs::{
    SearchFilters, StringList, ToolArguments, normalize_publication_date, normalize_year,
};

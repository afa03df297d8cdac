//! Generic array and object helpers over `serde_json::Value` and slices.
//!
//! Everything here is pure: inputs are borrowed and results are new values.

pub mod arr;
pub mod obj;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a search query is compared against candidate text.
///
/// Comparisons ignore ASCII case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Exact,
    #[default]
    Contains,
    StartsWith,
    EndsWith,
}

impl SearchMode {
    pub fn matches(self, candidate: &str, query: &str) -> bool {
        let candidate = candidate.to_ascii_lowercase();
        let query = query.to_ascii_lowercase();
        match self {
            SearchMode::Exact => candidate == query,
            SearchMode::Contains => candidate.contains(&query),
            SearchMode::StartsWith => candidate.starts_with(&query),
            SearchMode::EndsWith => candidate.ends_with(&query),
        }
    }
}

/// Which side of an object's entries [`obj::search`] looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchTarget {
    Keys,
    #[default]
    Values,
}

/// Text used when searching a value: strings as-is, scalars in JSON form.
/// Arrays, objects and null are not searchable.
pub(crate) fn search_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

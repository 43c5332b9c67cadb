use serde::{Deserialize, Serialize};

/// A deduplicated reference to a retrieved document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub url: String,
}

/// Outcome of a submit-query call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub response: String,
    pub sources: Vec<Citation>,
    pub conversation_id: String,
}

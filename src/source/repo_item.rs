//! Wire model for the repository-search API.
//!
//! The search endpoint answers with a single JSON object wrapping the result
//! rows.  Every field is defaulted so a sparse or trimmed-down response still
//! deserializes: missing numbers become `0`, missing flags `false`, a missing
//! item list is empty, and a missing or `null` description is `None`.

use serde::Deserialize;

/// One repository row from a search response.
///
/// Only the fields the UI consumes are modelled; everything else in the
/// (large) API payload is ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoItem {
    /// Numeric repository id.
    #[serde(default)]
    pub id: i64,

    /// Opaque node identifier.
    #[serde(default)]
    pub node_id: String,

    /// Browser URL of the repository; opened when the row is activated.
    #[serde(default)]
    pub html_url: String,

    /// Free-text description.  `null` for repositories without one.
    #[serde(default)]
    pub description: Option<String>,
}

/// Top-level search response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResponse {
    /// Total number of matches on the server, across all pages.
    #[serde(default)]
    pub total_count: i64,

    /// Whether the server cut the search short.
    #[serde(default)]
    pub incomplete_results: bool,

    /// The rows of the returned page.
    #[serde(default)]
    pub items: Vec<RepoItem>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

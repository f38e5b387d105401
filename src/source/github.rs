//! GitHub repository-search backend.
//!
//! Issues `GET <endpoint>?q=<query>` against the repository-search API and
//! decodes the JSON body into [`RepoItem`]s.  Status handling and decoding
//! live in [`GithubSource::decode_response`], a pure function, so tests can
//! exercise every error path without hitting the network.

use reqwest::blocking::Client;

use super::{RepoItem, SearchError, SearchResponse, SearchSource};

/// Default endpoint for repository search.
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/search/repositories";

/// The API rejects requests without a User-Agent header.
const USER_AGENT: &str = concat!("repofind/", env!("CARGO_PKG_VERSION"));

/// A repository-search backend over HTTP.
pub struct GithubSource {
    /// Endpoint the query is appended to.  Overridable so tests and
    /// GitHub Enterprise installations can point elsewhere.
    endpoint: String,
    client: Client,
}

impl GithubSource {
    /// Create a backend talking to `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SearchError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Turn a raw HTTP response into result rows.
    ///
    /// A non-success status maps to [`SearchError::Http`] and the body is
    /// ignored.  A success status with a body that does not decode maps to
    /// [`SearchError::Transport`].  An empty item list is a success.
    pub fn decode_response(status: u16, body: &str) -> Result<Vec<RepoItem>, SearchError> {
        if !(200..300).contains(&status) {
            return Err(SearchError::Http(status));
        }
        let response: SearchResponse = serde_json::from_str(body)?;
        tracing::debug!(
            total_count = response.total_count,
            incomplete = response.incomplete_results,
            items = response.items.len(),
            "decoded search response"
        );
        Ok(response.items)
    }
}

impl SearchSource for GithubSource {
    fn name(&self) -> &str {
        "github"
    }

    fn search(&self, query: &str) -> Result<Vec<RepoItem>, SearchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Self::decode_response(status, &body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

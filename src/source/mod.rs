//! Search backend abstraction layer.
//!
//! This module defines the [`SearchSource`] trait, the shared [`RepoItem`]
//! wire model, and the [`SearchError`] taxonomy.  The concrete GitHub
//! implementation lives in [`github`]; the rest of the application only ever
//! sees the trait.
//!
//! ## For contributors — adding a new backend
//!
//! 1. Create a new file in this directory (e.g. `gitlab.rs`).
//! 2. Define a struct (e.g. `GitlabSource`) and implement [`SearchSource`]
//!    for it, converting the backend's native payload into [`RepoItem`]s.
//! 3. Add the `mod` line below and re-export your struct in the `pub use`
//!    block.
//! 4. Construct an instance in `main.rs` instead of [`GithubSource`].
//!
//! The fetch worker, sequencing, and UI are all backend-agnostic.

mod github;
mod repo_item;

pub use github::{GithubSource, DEFAULT_ENDPOINT};
pub use repo_item::{RepoItem, SearchResponse};

use thiserror::Error;

/// Why a search request failed.
///
/// Both variants surface to the user as the same generic error rendering;
/// the distinction exists for logs and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The server answered with a non-success status code.
    #[error("search returned HTTP status {0}")]
    Http(u16),

    /// The request never produced a usable response: connection failure,
    /// timeout, or a body that did not parse.
    #[error("search request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Trait that every search backend must implement.
///
/// The fetch worker calls [`search`](SearchSource::search) on a background
/// thread, so implementations must be [`Send`].
pub trait SearchSource: Send {
    /// Human-readable label used in logs.
    fn name(&self) -> &str;

    /// Run one search and return the parsed result rows.
    ///
    /// Implementations do their own HTTP/IO work.  Failures come back as
    /// [`SearchError`] values and reach the user as a generic error state,
    /// never as a panic of the UI loop.
    fn search(&self, query: &str) -> Result<Vec<RepoItem>, SearchError>;
}

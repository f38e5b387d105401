//! Collapsible search-bar state.
//!
//! The bar is either collapsed ([`SearchBarState::Closed`]) or expanded with
//! an editable query ([`SearchBarState::Opened`]).  A close request on a
//! non-empty query only clears the text; a second one collapses the bar.
//! The machine has no terminal state and is reused for the whole run.

/// Whether the search input is collapsed or expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchBarState {
    /// Collapsed; keys act as navigation commands.
    #[default]
    Closed,
    /// Expanded; printable keys edit the query.
    Opened,
}

/// What a close request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The query was non-empty; it was cleared and the bar stays open.
    Cleared,
    /// The query was already empty; the bar collapsed.
    Closed,
}

/// The search bar: collapsed/expanded state plus the current query text.
#[derive(Debug, Default)]
pub struct SearchBar {
    state: SearchBarState,
    query: String,
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SearchBarState {
        self.state
    }

    pub fn set_state(&mut self, state: SearchBarState) {
        self.state = state;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Append one typed character to the query.
    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
    }

    /// Delete the last query character (no-op on an empty query).
    pub fn pop_char(&mut self) {
        self.query.pop();
    }

    /// Handle a close request: a non-empty query is cleared first and the bar
    /// stays open; only an empty query collapses the bar.
    ///
    /// On [`CloseOutcome::Closed`] the caller must drop its result list in
    /// the same event-handling step, so no stale rows flash while the bar is
    /// collapsed.
    pub fn close_or_clear(&mut self) -> CloseOutcome {
        if self.query.is_empty() {
            self.state = SearchBarState::Closed;
            CloseOutcome::Closed
        } else {
            self.query.clear();
            CloseOutcome::Cleared
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

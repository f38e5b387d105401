use ratatui::widgets::ListState;

use crate::fetch::{FetchController, FetchMsg, FetchState};
use crate::search_bar::{CloseOutcome, SearchBar, SearchBarState};
use crate::source::RepoItem;

/// Every user interaction, as an explicit event.
///
/// Keys are translated into these in [`crate::input`]; tests drive
/// [`App::handle`] with them directly, no terminal required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Expand the search bar.
    SearchTriggered,
    /// A character was typed into the open search bar.
    InputChar(char),
    /// Delete the last query character.
    Backspace,
    /// Submit the current query.
    SearchSubmitted,
    /// Close request on the open search bar: clear the text first, collapse
    /// only once it is empty.
    CloseClicked,
    /// Open the selected row's repository URL.
    ItemClicked,
    SelectNext,
    SelectPrevious,
    SelectFirst,
    SelectLast,
    Quit,
}

pub struct App {
    /// Collapsible search input.
    pub search_bar: SearchBar,
    /// The single in-flight request and its result state.
    pub fetch: FetchController,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last outcome message, shown in the status bar.
    pub status: String,
    /// URL the user asked to open.  Drained by the main loop, which hands it
    /// to the system opener; state handling itself never does IO.
    pub open_request: Option<String>,
}

const IDLE_STATUS: &str = "Press / to search";

impl App {
    pub fn new(fetch: FetchController) -> Self {
        Self {
            search_bar: SearchBar::new(),
            fetch,
            list_state: ListState::default(),
            quit: false,
            status: IDLE_STATUS.into(),
            open_request: None,
        }
    }

    /// The rows currently on screen.
    pub fn items(&self) -> &[RepoItem] {
        self.fetch.items()
    }

    /// Apply one user event.
    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchTriggered => self.search_bar.set_state(SearchBarState::Opened),
            AppEvent::InputChar(c) => {
                self.search_bar.push_char(c);
                // Typing signals edit intent; Enter then re-submits instead
                // of opening a row.
                self.list_state.select(None);
            }
            AppEvent::Backspace => {
                self.search_bar.pop_char();
                self.list_state.select(None);
            }
            AppEvent::SearchSubmitted => {
                let query = self.search_bar.query().to_string();
                tracing::info!(query = %query, "search submitted");
                self.fetch.search(&query);
                self.status = format!("Searching for \"{query}\"…");
                self.list_state.select(None);
            }
            AppEvent::CloseClicked => {
                if self.search_bar.close_or_clear() == CloseOutcome::Closed {
                    // Results vanish together with the bar, in the same
                    // event-handling step; anything still in flight is
                    // invalidated by the same call.
                    self.fetch.clear();
                    self.list_state.select(None);
                    self.status = IDLE_STATUS.into();
                }
            }
            AppEvent::ItemClicked => {
                let url = self
                    .list_state
                    .selected()
                    .and_then(|i| self.items().get(i))
                    .map(|item| item.html_url.clone());
                if let Some(url) = url {
                    tracing::info!(url = %url, "opening repository");
                    self.open_request = Some(url);
                }
            }
            AppEvent::SelectNext => self.select_next(),
            AppEvent::SelectPrevious => self.select_previous(),
            AppEvent::SelectFirst => self.select_first(),
            AppEvent::SelectLast => self.select_last(),
            AppEvent::Quit => self.quit = true,
        }
    }

    /// Apply a fetch completion: updates the controller, the status line,
    /// and the selection bounds.
    pub fn on_fetch_msg(&mut self, msg: FetchMsg) {
        if !self.fetch.apply(msg) {
            return;
        }
        match self.fetch.state() {
            FetchState::Success(items) => {
                self.status = format!("Fetched {} repositories", items.len());
                // The new list may be shorter than the old selection.
                if self.list_state.selected().is_some_and(|i| i >= items.len()) {
                    self.list_state.select(None);
                }
            }
            FetchState::Failure(err) => {
                self.status = format!("Error: {err}");
            }
            FetchState::Idle | FetchState::Loading => {}
        }
    }

    // -- navigation ----------------------------------------------------------

    fn select_next(&mut self) {
        let len = self.items().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn select_previous(&mut self) {
        if self.items().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn select_first(&mut self) {
        if !self.items().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        let len = self.items().len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::mpsc::Receiver;
    use std::time::Duration;

    use super::*;
    use crate::source::{SearchError, SearchSource};

    /// Replies to every search with a canned result.
    struct StubSource(Result<Vec<RepoItem>, SearchError>);

    impl SearchSource for StubSource {
        fn name(&self) -> &str {
            "stub"
        }

        fn search(&self, _query: &str) -> Result<Vec<RepoItem>, SearchError> {
            self.0.clone()
        }
    }

    fn make_item(id: i64, url: &str) -> RepoItem {
        RepoItem {
            id,
            node_id: format!("node-{id}"),
            html_url: url.to_string(),
            description: Some(format!("repository {id}")),
        }
    }

    fn sample_items() -> Vec<RepoItem> {
        vec![
            make_item(1, "https://github.com/a/one"),
            make_item(2, "https://github.com/b/two"),
            make_item(3, "https://github.com/c/three"),
        ]
    }

    fn test_app(result: Result<Vec<RepoItem>, SearchError>) -> (App, Receiver<FetchMsg>) {
        let (fetch, rx) = FetchController::new(Box::new(StubSource(result)));
        (App::new(fetch), rx)
    }

    /// Run a full search round-trip so the app displays `items`.
    fn app_with_items(items: Vec<RepoItem>) -> App {
        let (mut app, rx) = test_app(Ok(items));
        app.handle(AppEvent::SearchTriggered);
        app.search_bar.set_query("query");
        app.handle(AppEvent::SearchSubmitted);
        let msg = rx.recv_timeout(Duration::from_secs(5)).expect("worker reply");
        app.on_fetch_msg(msg);
        app
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_starts_closed_and_idle() {
        let (app, _rx) = test_app(Ok(vec![]));
        assert_eq!(app.search_bar.state(), SearchBarState::Closed);
        assert_eq!(*app.fetch.state(), FetchState::Idle);
        assert!(app.items().is_empty());
        assert!(!app.quit);
        assert!(app.list_state.selected().is_none());
    }

    // -- search bar events ---------------------------------------------------

    #[test]
    fn search_triggered_opens_the_bar() {
        let (mut app, _rx) = test_app(Ok(vec![]));
        app.handle(AppEvent::SearchTriggered);
        assert_eq!(app.search_bar.state(), SearchBarState::Opened);
    }

    #[test]
    fn typing_edits_the_query() {
        let (mut app, _rx) = test_app(Ok(vec![]));
        app.handle(AppEvent::SearchTriggered);
        app.handle(AppEvent::InputChar('r'));
        app.handle(AppEvent::InputChar('s'));
        app.handle(AppEvent::Backspace);
        assert_eq!(app.search_bar.query(), "r");
    }

    #[test]
    fn close_with_empty_query_collapses_the_bar() {
        let (mut app, _rx) = test_app(Ok(vec![]));
        app.handle(AppEvent::SearchTriggered);
        app.handle(AppEvent::CloseClicked);
        assert_eq!(app.search_bar.state(), SearchBarState::Closed);
        assert_eq!(app.search_bar.query(), "");
    }

    #[test]
    fn close_with_text_clears_but_stays_open() {
        let (mut app, _rx) = test_app(Ok(vec![]));
        app.handle(AppEvent::SearchTriggered);
        app.handle(AppEvent::InputChar('a'));
        app.handle(AppEvent::InputChar('b'));
        app.handle(AppEvent::InputChar('c'));

        app.handle(AppEvent::CloseClicked);
        assert_eq!(app.search_bar.state(), SearchBarState::Opened);
        assert_eq!(app.search_bar.query(), "");
    }

    #[test]
    fn closing_the_bar_drops_the_results() {
        let mut app = app_with_items(sample_items());
        assert_eq!(app.items().len(), 3);

        // Query is "query": the first close only clears the text.
        app.handle(AppEvent::CloseClicked);
        assert_eq!(app.search_bar.state(), SearchBarState::Opened);
        assert_eq!(app.items().len(), 3, "results stay while the bar is open");

        // The second close collapses the bar and empties the list with it.
        app.handle(AppEvent::CloseClicked);
        assert_eq!(app.search_bar.state(), SearchBarState::Closed);
        assert_eq!(*app.fetch.state(), FetchState::Success(vec![]));
        assert!(app.list_state.selected().is_none());
    }

    // -- fetch round-trip ----------------------------------------------------

    #[test]
    fn submit_sets_loading_before_the_reply_arrives() {
        let (mut app, _rx) = test_app(Ok(vec![]));
        app.handle(AppEvent::SearchTriggered);
        app.search_bar.set_query("rust");
        app.handle(AppEvent::SearchSubmitted);
        assert_eq!(*app.fetch.state(), FetchState::Loading);
    }

    #[test]
    fn successful_search_updates_items_and_status() {
        let app = app_with_items(sample_items());
        assert_eq!(app.items().len(), 3);
        assert_eq!(app.status, "Fetched 3 repositories");
    }

    #[test]
    fn failed_search_reports_an_error_status() {
        let (mut app, rx) = test_app(Err(SearchError::Http(500)));
        app.handle(AppEvent::SearchTriggered);
        app.search_bar.set_query("x");
        app.handle(AppEvent::SearchSubmitted);

        let msg = rx.recv_timeout(Duration::from_secs(5)).expect("worker reply");
        app.on_fetch_msg(msg);

        assert_eq!(*app.fetch.state(), FetchState::Failure(SearchError::Http(500)));
        assert!(app.status.starts_with("Error:"), "status was {:?}", app.status);
    }

    #[test]
    fn shrinking_results_drops_an_out_of_range_selection() {
        let mut app = app_with_items(sample_items());

        // Swap in a fetch pipeline that answers with a single row, select the
        // end of the old list, then re-submit.
        let (fetch, rx) = FetchController::new(Box::new(StubSource(Ok(vec![make_item(
            9,
            "https://github.com/z/nine",
        )]))));
        app.fetch = fetch;
        app.handle(AppEvent::SelectLast);
        assert_eq!(app.list_state.selected(), None, "fresh controller has no rows yet");
        app.search_bar.set_query("nine");
        app.handle(AppEvent::SearchSubmitted);
        let msg = rx.recv_timeout(Duration::from_secs(5)).expect("worker reply");
        app.on_fetch_msg(msg);

        assert_eq!(app.items().len(), 1);
        assert!(app.list_state.selected().is_none());
    }

    // -- item activation -----------------------------------------------------

    #[test]
    fn item_clicked_requests_the_selected_url() {
        let mut app = app_with_items(sample_items());
        app.handle(AppEvent::SelectNext);
        app.handle(AppEvent::SelectNext);

        app.handle(AppEvent::ItemClicked);
        assert_eq!(app.open_request.as_deref(), Some("https://github.com/b/two"));
    }

    #[test]
    fn item_clicked_without_selection_is_a_noop() {
        let mut app = app_with_items(sample_items());
        app.handle(AppEvent::ItemClicked);
        assert!(app.open_request.is_none());
    }

    // -- navigation ----------------------------------------------------------

    #[test]
    fn navigation_on_empty_list_is_a_noop() {
        let (mut app, _rx) = test_app(Ok(vec![]));
        app.handle(AppEvent::SelectNext);
        app.handle(AppEvent::SelectPrevious);
        app.handle(AppEvent::SelectFirst);
        app.handle(AppEvent::SelectLast);
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn select_next_starts_at_zero_then_advances_and_clamps() {
        let mut app = app_with_items(sample_items());

        app.handle(AppEvent::SelectNext);
        assert_eq!(app.list_state.selected(), Some(0));

        app.handle(AppEvent::SelectNext);
        app.handle(AppEvent::SelectNext);
        app.handle(AppEvent::SelectNext);
        assert_eq!(app.list_state.selected(), Some(2), "clamps at the last row");
    }

    #[test]
    fn select_previous_moves_up_and_clamps_at_zero() {
        let mut app = app_with_items(sample_items());

        app.handle(AppEvent::SelectLast);
        app.handle(AppEvent::SelectPrevious);
        assert_eq!(app.list_state.selected(), Some(1));

        app.handle(AppEvent::SelectFirst);
        app.handle(AppEvent::SelectPrevious);
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn select_first_and_last_jump_to_the_ends() {
        let mut app = app_with_items(sample_items());

        app.handle(AppEvent::SelectLast);
        assert_eq!(app.list_state.selected(), Some(2));

        app.handle(AppEvent::SelectFirst);
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn typing_drops_the_selection() {
        let mut app = app_with_items(sample_items());
        app.handle(AppEvent::SelectNext);
        assert!(app.list_state.selected().is_some());

        app.handle(AppEvent::InputChar('x'));
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn quit_sets_the_flag() {
        let (mut app, _rx) = test_app(Ok(vec![]));
        app.handle(AppEvent::Quit);
        assert!(app.quit);
    }
}

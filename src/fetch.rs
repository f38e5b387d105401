//! Background search fetching.
//!
//! One long-lived worker thread executes blocking HTTP searches so the UI
//! thread never stalls.  Jobs flow worker-ward over one [`mpsc`] channel,
//! completion messages flow back over another, and the main loop drains
//! completions on every tick.
//!
//! Overlapping requests are sequenced: every `search` (and `clear`) bumps a
//! sequence number, each job carries the number it was issued under, and a
//! completion whose number no longer matches is discarded on arrival.  The
//! displayed state therefore always belongs to the most recently issued
//! request, no matter in which order responses come back.  Superseded
//! requests are not cancelled at the transport level; they run to completion
//! and their results are dropped.

use std::sync::mpsc;
use std::thread;

use crate::source::{RepoItem, SearchError, SearchSource};

/// Lifecycle of the most recent search request.
#[derive(Debug, PartialEq, Eq, Default)]
pub enum FetchState {
    /// No search has been issued yet.
    #[default]
    Idle,
    /// A request is outstanding.
    Loading,
    /// The last request finished with these rows (possibly none).
    Success(Vec<RepoItem>),
    /// The last request failed.
    Failure(SearchError),
}

/// A search job handed to the worker thread.
struct Job {
    seq: u64,
    query: String,
}

/// Completion message sent from the worker back to the UI thread.
///
/// Exactly one of these is produced per job, success or failure; an issued
/// request never goes silent and never panics the UI loop.
pub struct FetchMsg {
    seq: u64,
    result: Result<Vec<RepoItem>, SearchError>,
}

/// Orchestrates one in-flight search request.
///
/// Owns the [`FetchState`] exclusively; the UI reads it through
/// [`state`](Self::state) and [`items`](Self::items).
pub struct FetchController {
    state: FetchState,
    /// Sequence number of the most recently issued request.  Bumped by
    /// [`search`](Self::search) and [`clear`](Self::clear); completions
    /// carrying an older number are stale.
    seq: u64,
    jobs: mpsc::Sender<Job>,
}

impl FetchController {
    /// Spawn the worker thread and return the controller plus the receiver
    /// the main loop drains each tick.
    ///
    /// The worker runs until the controller (and with it the job sender) is
    /// dropped.
    pub fn new(source: Box<dyn SearchSource>) -> (Self, mpsc::Receiver<FetchMsg>) {
        let (jobs_tx, jobs_rx) = mpsc::channel::<Job>();
        let (results_tx, results_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(job) = jobs_rx.recv() {
                let result = source.search(&job.query);
                if let Err(err) = &result {
                    tracing::warn!(source = source.name(), error = %err, "search failed");
                }
                let msg = FetchMsg {
                    seq: job.seq,
                    result,
                };
                // If the receiver is gone the main thread has exited;
                // silently stop working.
                if results_tx.send(msg).is_err() {
                    return;
                }
            }
        });

        let controller = Self {
            state: FetchState::Idle,
            seq: 0,
            jobs: jobs_tx,
        };
        (controller, results_rx)
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// The current result rows; empty unless the state is `Success`.
    pub fn items(&self) -> &[RepoItem] {
        match &self.state {
            FetchState::Success(items) => items,
            _ => &[],
        }
    }

    /// Begin a new search.
    ///
    /// `Loading` is observable from the moment this returns, before the
    /// worker picks the job up; the matching completion arrives through the
    /// receiver.  An empty query is allowed — the server decides what it
    /// means.
    pub fn search(&mut self, query: &str) {
        self.seq += 1;
        self.state = FetchState::Loading;
        tracing::debug!(seq = self.seq, query, "search issued");

        let job = Job {
            seq: self.seq,
            query: query.to_string(),
        };
        if self.jobs.send(job).is_err() {
            // Worker gone; resolve immediately instead of loading forever.
            self.state = FetchState::Failure(SearchError::Transport(
                "search worker is not running".into(),
            ));
        }
    }

    /// Reset to an empty result list, invalidating any in-flight request.
    pub fn clear(&mut self) {
        self.seq += 1;
        self.state = FetchState::Success(Vec::new());
    }

    /// Apply a completion message from the worker.
    ///
    /// Returns `false` when the message was stale (superseded by a newer
    /// [`search`](Self::search) or [`clear`](Self::clear)) and the state was
    /// left untouched.
    pub fn apply(&mut self, msg: FetchMsg) -> bool {
        if msg.seq != self.seq {
            tracing::debug!(stale = msg.seq, current = self.seq, "discarding stale completion");
            return false;
        }
        self.state = match msg.result {
            Ok(items) => FetchState::Success(items),
            Err(err) => FetchState::Failure(err),
        };
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

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
            description: None,
        }
    }

    fn recv(rx: &mpsc::Receiver<FetchMsg>) -> FetchMsg {
        rx.recv_timeout(Duration::from_secs(5)).expect("worker reply")
    }

    // -- state transitions ---------------------------------------------------

    #[test]
    fn starts_idle() {
        let (controller, _rx) = FetchController::new(Box::new(StubSource(Ok(vec![]))));
        assert_eq!(*controller.state(), FetchState::Idle);
        assert!(controller.items().is_empty());
    }

    #[test]
    fn search_sets_loading_synchronously() {
        let (mut controller, _rx) = FetchController::new(Box::new(StubSource(Ok(vec![]))));
        controller.search("rust");
        assert_eq!(*controller.state(), FetchState::Loading);
    }

    #[test]
    fn empty_result_list_is_success_not_failure() {
        let (mut controller, rx) = FetchController::new(Box::new(StubSource(Ok(vec![]))));
        controller.search("rust");

        assert!(controller.apply(recv(&rx)));
        assert_eq!(*controller.state(), FetchState::Success(vec![]));
        assert!(controller.items().is_empty());
    }

    #[test]
    fn successful_search_exposes_items() {
        let items = vec![make_item(1, "https://github.com/a/b")];
        let (mut controller, rx) = FetchController::new(Box::new(StubSource(Ok(items.clone()))));
        controller.search("rust");

        controller.apply(recv(&rx));
        assert_eq!(controller.items(), items.as_slice());
    }

    #[test]
    fn http_failure_resolves_to_failure_state() {
        let (mut controller, rx) =
            FetchController::new(Box::new(StubSource(Err(SearchError::Http(500)))));
        controller.search("x");

        controller.apply(recv(&rx));
        assert_eq!(*controller.state(), FetchState::Failure(SearchError::Http(500)));
        assert!(controller.items().is_empty());
    }

    #[test]
    fn transport_failure_resolves_to_failure_state() {
        let err = SearchError::Transport("connection reset".into());
        let (mut controller, rx) = FetchController::new(Box::new(StubSource(Err(err.clone()))));
        controller.search("x");

        controller.apply(recv(&rx));
        assert_eq!(*controller.state(), FetchState::Failure(err));
    }

    #[test]
    fn controller_is_usable_after_a_failure() {
        let (mut controller, rx) =
            FetchController::new(Box::new(StubSource(Err(SearchError::Http(500)))));
        controller.search("x");
        controller.apply(recv(&rx));

        controller.search("y");
        assert_eq!(*controller.state(), FetchState::Loading);
        assert!(controller.apply(recv(&rx)));
    }

    // -- clear ---------------------------------------------------------------

    #[test]
    fn clear_resets_to_empty_success_synchronously() {
        let (mut controller, _rx) = FetchController::new(Box::new(StubSource(Ok(vec![]))));
        controller.clear();
        assert_eq!(*controller.state(), FetchState::Success(vec![]));
    }

    #[test]
    fn clear_invalidates_an_in_flight_request() {
        let items = vec![make_item(1, "https://github.com/a/b")];
        let (mut controller, rx) = FetchController::new(Box::new(StubSource(Ok(items))));

        controller.search("rust");
        controller.clear();

        // The request still completes, but its result must not resurface.
        assert!(!controller.apply(recv(&rx)));
        assert_eq!(*controller.state(), FetchState::Success(vec![]));
    }

    // -- sequencing ----------------------------------------------------------

    #[test]
    fn stale_completion_is_discarded() {
        let items = vec![make_item(1, "https://github.com/a/b")];
        let (mut controller, rx) = FetchController::new(Box::new(StubSource(Ok(items))));

        controller.search("first");
        controller.search("second");

        // The worker answers jobs in order, so the first completion is the
        // superseded one.
        assert!(!controller.apply(recv(&rx)));
        assert_eq!(*controller.state(), FetchState::Loading, "stale reply must not resolve");

        assert!(controller.apply(recv(&rx)));
        assert!(matches!(controller.state(), FetchState::Success(_)));
    }

    #[test]
    fn direct_apply_with_wrong_seq_is_ignored() {
        let (mut controller, _rx) = FetchController::new(Box::new(StubSource(Ok(vec![]))));
        controller.search("rust");

        let stale = FetchMsg {
            seq: 0,
            result: Ok(vec![make_item(9, "https://github.com/x/y")]),
        };
        assert!(!controller.apply(stale));
        assert_eq!(*controller.state(), FetchState::Loading);
    }
}

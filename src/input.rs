//! Keyboard input handling.
//!
//! Maps terminal key events to [`AppEvent`]s.  The mapping is modal on the
//! search-bar state: an open bar captures printable characters as query
//! edits, a closed bar treats them as commands.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a variant to [`AppEvent`] and handle it in [`App::handle`]
//!    (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in the mode's map function below.
//! 3. Update the hint text in [`crate::ui`] and the keybindings table in
//!    `README.md`.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{App, AppEvent};
use crate::search_bar::SearchBarState;

/// Translate one key event into an application event, if it is bound.
///
/// Reads `app` without mutating it, so tests can assert the mapping in
/// isolation.  Only key-press events map; release and repeat events would
/// double-fire actions on some terminals.
pub fn map_key(app: &App, key: KeyEvent) -> Option<AppEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match app.search_bar.state() {
        SearchBarState::Closed => map_key_closed(key.code),
        SearchBarState::Opened => map_key_opened(app, key.code),
    }
}

fn map_key_closed(code: KeyCode) -> Option<AppEvent> {
    match code {
        KeyCode::Char('/') => Some(AppEvent::SearchTriggered),
        KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
        KeyCode::Down | KeyCode::Char('j') => Some(AppEvent::SelectNext),
        KeyCode::Up | KeyCode::Char('k') => Some(AppEvent::SelectPrevious),
        KeyCode::Home | KeyCode::Char('g') => Some(AppEvent::SelectFirst),
        KeyCode::End | KeyCode::Char('G') => Some(AppEvent::SelectLast),
        KeyCode::Enter => Some(AppEvent::ItemClicked),
        _ => None,
    }
}

fn map_key_opened(app: &App, code: KeyCode) -> Option<AppEvent> {
    match code {
        KeyCode::Esc => Some(AppEvent::CloseClicked),
        KeyCode::Backspace => Some(AppEvent::Backspace),
        KeyCode::Down => Some(AppEvent::SelectNext),
        KeyCode::Up => Some(AppEvent::SelectPrevious),
        // Enter targets the highlighted row when there is one; with no
        // selection it submits the query.
        KeyCode::Enter => {
            if app.list_state.selected().is_some() {
                Some(AppEvent::ItemClicked)
            } else {
                Some(AppEvent::SearchSubmitted)
            }
        }
        KeyCode::Char(c) => Some(AppEvent::InputChar(c)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

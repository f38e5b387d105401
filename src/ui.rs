//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  The layout is a three-row split:
//! the search bar on top, the result area in the middle, and a one-line
//! status bar at the bottom.  The result area renders whichever fetch state
//! is current — a prompt, a loading notice, an error notice, an empty-result
//! notice, or the scrollable list.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::fetch::FetchState;
use crate::search_bar::SearchBarState;
use crate::text;

/// Draw the complete UI for one frame.
///
/// Called once per tick from the main loop.  Delegates to helper functions
/// for each screen region.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [bar_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_search_bar(app, frame, bar_area);
    draw_body(app, frame, body_area);
    draw_status_bar(app, frame, status_area);
}

/// Render the top bar: a title with a hint while closed, the query with a
/// cursor block while open.
fn draw_search_bar(app: &App, frame: &mut Frame, area: Rect) {
    let line = match app.search_bar.state() {
        SearchBarState::Closed => Line::from(vec![
            Span::styled(
                " Repository search",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("   / to search", Style::default().fg(Color::DarkGray)),
        ]),
        SearchBarState::Opened => Line::from(vec![
            Span::styled(" Search: ", Style::default().fg(Color::Cyan)),
            Span::raw(app.search_bar.query()),
            Span::styled("█", Style::default().fg(Color::Cyan)),
        ]),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the result area for the current fetch state.
fn draw_body(app: &mut App, frame: &mut Frame, area: Rect) {
    let notice = match app.fetch.state() {
        FetchState::Idle => Some(("Enter a query to search repositories", Color::DarkGray)),
        FetchState::Loading => Some(("Loading…", Color::Yellow)),
        FetchState::Failure(_) => Some(("Error, please try again.", Color::Red)),
        FetchState::Success(items) if items.is_empty() => Some((
            "No repositories found. Change the query and search again.",
            Color::DarkGray,
        )),
        FetchState::Success(_) => None,
    };

    match notice {
        Some((message, color)) => draw_notice(frame, area, message, color),
        None => draw_result_list(app, frame, area),
    }
}

/// Render a single centered message line.
fn draw_notice(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);

    let notice = Paragraph::new(message)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center);
    frame.render_widget(notice, middle);
}

/// Render the scrollable result list: two lines per repository, description
/// over URL, both trimmed for row display.
fn draw_result_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let rows: Vec<ListItem> = app
        .items()
        .iter()
        .map(|item| {
            let description = text::truncate_display(item.description.as_deref());
            let url = text::truncate_required(&item.html_url);

            ListItem::new(vec![
                Line::from(Span::styled(description, Style::default().fg(Color::White))),
                Line::from(Span::styled(url, Style::default().fg(Color::DarkGray))),
            ])
        })
        .collect();

    let list = List::new(rows)
        .block(Block::default().title(" Repositories ").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let hints = match app.search_bar.state() {
        SearchBarState::Closed => "q: quit  /: search  ↑/↓: scroll  Enter: open",
        SearchBarState::Opened => "Esc: clear/close  Enter: search  ↑/↓ then Enter: open",
    };

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} repositories", app.items().len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(status, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! repofind — search GitHub repositories from the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  FetchMsg  ┌──────────┐  draw()  ┌──────────┐
//! │ fetch.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (worker) │  (channel) │ (state)  │          │ (render) │
//! └──────────┘            └──────────┘          └──────────┘
//!      │                       ▲
//!      │ search()              │ AppEvent
//! ┌──────────┐            ┌──────────┐
//! │ source/  │            │ input.rs │
//! │ (HTTP)   │            └──────────┘
//! └──────────┘
//! ```
//!
//! * **`source/`** — the `SearchSource` trait, the GitHub backend, the wire
//!   model, and the error taxonomy.
//! * **`fetch`** — the fetch controller: one worker thread, sequence-numbered
//!   jobs, loading/success/failure state.
//! * **`search_bar`** — the collapsible search-bar state machine.
//! * **`app`** — owns all application state and applies `AppEvent`s.
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `AppEvent`s.
//! * **`text`** — display truncation for list rows.
//! * **`main`** — wires everything together: parse args, set up tracing and
//!   the terminal, and run the event loop.

mod app;
mod fetch;
mod input;
mod search_bar;
mod source;
mod text;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use app::{App, AppEvent};
use fetch::FetchController;
use source::GithubSource;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Search GitHub repositories from the terminal")]
struct Cli {
    /// Search query to submit immediately on startup.
    query: Option<String>,

    /// Repository-search endpoint to query.
    #[arg(long, value_name = "URL", default_value = source::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Append logs to this file.  Without it logging stays off — the
    /// terminal itself is taken by the UI.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.  This prevents the common TUI bug where a panic leaves the
/// terminal in a broken state.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.  Without this, a panic inside the event loop would leave
/// raw mode enabled and the alternate screen active.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Send tracing output to `path`, if one was given.
///
/// The subscriber writes plain (non-ANSI) lines and honours `RUST_LOG`;
/// without a log file no subscriber is installed and all events are dropped.
fn init_tracing(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;
    install_panic_hook();

    // -- fetch pipeline ------------------------------------------------------
    let github = GithubSource::new(&cli.endpoint).context("building the search client")?;
    let (fetch, fetch_rx) = FetchController::new(Box::new(github));

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(fetch);

    // A query on the command line behaves as if the user had opened the bar,
    // typed it, and pressed Enter.
    if let Some(query) = cli.query {
        app.handle(AppEvent::SearchTriggered);
        app.search_bar.set_query(query);
        app.handle(AppEvent::SearchSubmitted);
    }

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Drain fetch completions into the controller.
    //   2. Hand any requested URL to the system opener.
    //   3. Render the UI.
    //   4. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        // 1. Apply fetch completions
        while let Ok(msg) = fetch_rx.try_recv() {
            app.on_fetch_msg(msg);
        }

        // 2. Open requested URLs
        if let Some(url) = app.open_request.take() {
            if let Err(err) = open::that_detached(&url) {
                tracing::warn!(url = %url, error = %err, "failed to open URL");
                app.status = format!("Could not open {url}");
            }
        }

        // 3. Render
        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        // 4. Handle input
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if let Some(app_event) = input::map_key(&app, key) {
                    app.handle(app_event);
                }
            }
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}

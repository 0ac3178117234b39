//! episodetui - Episode details dialog for the terminal
//!
//! Shows one episode, lets the user pick quality and subtitles, and prints
//! the resulting stream request on play.
//!
//! # Usage
//!
//! ```bash
//! episodetui pilot.json
//! episodetui pilot.json --json --locale de_DE
//! ```
//!
//! The dialog draws on stderr so stdout only ever carries the request.

use std::fs::OpenOptions;
use std::io::{stderr, Stderr, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use episodetui::api::{StremioSubsProvider, TmdbMetaProvider};
use episodetui::app::App;
use episodetui::cli::{Cli, ExitCode, Output};
use episodetui::config::Config;
use episodetui::dialog::{DialogDeps, EpisodeDialog};
use episodetui::locale;
use episodetui::models::StreamRequest;
use episodetui::ui;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stderr>>;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let output = Output::new(&cli);

    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    let args = match cli.dialog_args() {
        Ok(args) => args,
        Err(e) => return output.error(format!("{:#}", e), ExitCode::InvalidArgs).into(),
    };

    let deps = build_deps(&cli, config);
    let dialog = match EpisodeDialog::open(args, deps) {
        Ok(dialog) => dialog,
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs).into(),
    };

    match run_tui(dialog).await {
        Ok(Some(request)) => match output.print(&request) {
            Ok(()) => ExitCode::Success.into(),
            Err(e) => output.error(e.to_string(), ExitCode::Error).into(),
        },
        Ok(None) => {
            output.info("Closed without playing");
            ExitCode::NoStream.into()
        }
        Err(e) => {
            error!("TUI failed: {:#}", e);
            output.error(format!("{:#}", e), ExitCode::Error).into()
        }
    }
}

/// Log to a file under the cache dir; the terminal belongs to the TUI
fn init_logging(verbose: bool) {
    let Some(dir) = dirs::cache_dir().map(|d| d.join("episodetui")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("episodetui.log"))
    else {
        return;
    };

    let default = if verbose { "episodetui=debug" } else { "episodetui=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

/// Wire providers and preferences from config and flags
fn build_deps(cli: &Cli, config: Config) -> DialogDeps {
    let meta = match &config.tmdb_base_url {
        Some(url) => TmdbMetaProvider::with_base_url(config.tmdb_api_key(), url.clone()),
        None => TmdbMetaProvider::new(config.tmdb_api_key()),
    };
    let subs = match &config.subtitles_base_url {
        Some(url) => StremioSubsProvider::with_base_url(url.clone()),
        None => StremioSubsProvider::new(),
    };
    let locale = locale::current_locale(cli.locale.as_deref().or(config.locale.as_deref()));

    DialogDeps {
        meta: Arc::new(meta),
        subs: Arc::new(subs),
        prefs: Arc::new(config),
        locale,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let backend = enter_screen(stderr())?;
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Switch `out` to the alternate screen and draw on it from then on
fn enter_screen<W: Write>(mut out: W) -> Result<CrosstermBackend<W>> {
    execute!(out, EnterAlternateScreen)?;
    Ok(CrosstermBackend::new(out))
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the dialog until it closes; returns the stream request if play was pressed
async fn run_tui(dialog: EpisodeDialog) -> Result<Option<StreamRequest>> {
    let mut terminal = init_terminal()?;
    let mut app = App::new(dialog);

    info!("Showing {} {}", app.dialog.show(), app.dialog.episode());
    let result = run_event_loop(&mut terminal, &mut app).await;

    // Always restore terminal, even on error
    let restored = restore_terminal(&mut terminal);
    session_outcome(result, restored, app.take_stream())
}

/// Result of a finished session. A failed restore is logged and never
/// costs the user the stream they asked for.
fn session_outcome<T>(
    result: Result<()>,
    restored: Result<()>,
    stream: Option<T>,
) -> Result<Option<T>> {
    if let Err(e) = restored {
        error!("Failed to restore terminal: {:#}", e);
    }
    result.map(|()| stream)
}

/// Main event loop - handles input, applies lookup results, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    while app.running {
        app.tick();
        terminal.draw(|frame| render_ui(frame, app))?;

        // crossterm polling blocks; keep the lookup task's worker free
        let key = tokio::task::block_in_place(|| -> Result<_> {
            if event::poll(TICK_RATE)? {
                if let Event::Key(key) = event::read()? {
                    return Ok(Some(key));
                }
            }
            Ok(None)
        })?;

        // Only handle key press events (ignore releases on Windows)
        if let Some(key) = key.filter(|k| k.kind == KeyEventKind::Press) {
            app.handle_key(key);
        }
    }

    Ok(())
}

fn render_ui(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    ui::episode::render(frame, area, &mut app.dialog);
}

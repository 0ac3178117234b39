//! episodetui - Episode details dialog for the terminal
//!
//! Title, air date, artwork and synopsis for one episode, a quality
//! selector, a subtitle selector, and a play action that produces a
//! stream request.
//!
//! # Modules
//!
//! - `models` - Shows, episodes, torrents, subtitle choice, stream request
//! - `api` - Metadata and subtitle providers (TMDB, Stremio)
//! - `dialog` - The episode dialog state machine
//! - `ui` - TUI components
//! - `app` - Application state
//! - `cli` - Command line and JSON output
//! - `config` - Config file and stored preferences
//! - `locale` - Dates and language names

pub mod models;
pub mod api;
pub mod config;
pub mod locale;
pub mod dialog;
pub mod ui;
pub mod app;
pub mod cli;

// Re-export commonly used types
pub use models::{
    DialogArgs, Episode, EpisodeMeta, MetaImages, PaletteColor, Show, StreamRequest,
    SubtitleChoice, SubtitleMap, Torrent,
};

pub use api::{MetaProvider, ProviderError, StremioSubsProvider, SubsProvider, TmdbMetaProvider};
pub use app::App;
pub use config::{Config, Preferences};
pub use dialog::{DialogAction, DialogDeps, DialogError, DialogEvent, EpisodeDialog, Lifecycle};

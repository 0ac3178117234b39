//! App state and core application logic
//!
//! Owns the episode dialog for the lifetime of the TUI and turns the
//! dialog's key actions into app-level effects: quitting, and handing the
//! stream request to whoever launched us.

use crossterm::event::KeyEvent;
use tracing::info;

use crate::dialog::{DialogAction, EpisodeDialog};
use crate::models::StreamRequest;

/// Main application state
pub struct App {
    /// The dialog being shown
    pub dialog: EpisodeDialog,
    /// Whether the app is running
    pub running: bool,
    /// Request emitted by play, if any
    pub stream: Option<StreamRequest>,
}

impl App {
    pub fn new(dialog: EpisodeDialog) -> Self {
        Self {
            dialog,
            running: true,
            stream: None,
        }
    }

    /// Route a key press to the dialog
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.dialog.handle_key(key) {
            DialogAction::Play(request) => self.start_stream(request),
            DialogAction::Close => self.quit(),
            DialogAction::None => {}
        }
    }

    /// Apply finished lookups. Called once per tick.
    pub fn tick(&mut self) -> usize {
        self.dialog.poll_events()
    }

    /// Playback entry point: keep the request and close the dialog
    pub fn start_stream(&mut self, request: StreamRequest) {
        info!("Starting stream {}", request);
        self.stream = Some(request);
        self.quit();
    }

    /// Dismiss the dialog and stop the event loop
    pub fn quit(&mut self) {
        self.dialog.dismiss();
        self.running = false;
    }

    pub fn take_stream(&mut self) -> Option<StreamRequest> {
        self.stream.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dialog::Lifecycle;
    use crate::models::{DialogArgs, Episode, PaletteColor, Show, Torrent};
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn app() -> App {
        let mut torrents = BTreeMap::new();
        for quality in ["480p", "720p"] {
            torrents.insert(
                quality.to_string(),
                Torrent {
                    url: format!("magnet:?xt={}", quality),
                    seeds: 10,
                    peers: 2,
                    size_bytes: None,
                },
            );
        }
        let args = DialogArgs {
            show: Show {
                imdb_id: "tt0903747".into(),
                tmdb_id: None,
                title: "Breaking Bad".into(),
                year: Some(2008),
                poster: None,
                backdrop: None,
            },
            episode: Episode {
                title: "Pilot".into(),
                overview: "Walter White.".into(),
                aired: 1_200_794_400,
                season: 1,
                episode: 1,
                imdb_id: "tt0903747".into(),
                tvdb_id: None,
                header_image: None,
                torrents,
            },
            color: PaletteColor::default(),
        };
        let dialog = EpisodeDialog::new(args, Arc::new(Config::default()), "en_US").unwrap();
        App::new(dialog)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_quit_on_q() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.running);
        assert!(app.stream.is_none());
        assert_eq!(app.dialog.lifecycle(), Lifecycle::Detached);
    }

    #[test]
    fn test_quit_on_ctrl_c() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn test_play_keeps_request_and_quits() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('p')));

        assert!(!app.running);
        let request = app.take_stream().unwrap();
        assert_eq!(request.quality, "720p");
        assert_eq!(request.video_url, "magnet:?xt=720p");
        assert!(app.take_stream().is_none());
    }

    #[test]
    fn test_pick_quality_then_play() {
        let mut app = app();
        // Play -> Quality
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.running);
        assert_eq!(app.dialog.selected_quality(), "480p");

        app.handle_key(key(KeyCode::Char('p')));
        assert_eq!(app.stream.as_ref().map(|s| s.quality.as_str()), Some("480p"));
    }
}

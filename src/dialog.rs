//! Episode details dialog
//!
//! Holds everything the dialog shows and the choices the user makes:
//! quality, subtitle language, read-more overlay and the play action.
//!
//! Opening the dialog spawns one task that runs the metadata and subtitle
//! lookups side by side. Their results come back as [`DialogEvent`]s over a
//! channel and are applied on the UI thread by [`EpisodeDialog::poll_events`].
//! Once the dialog is dismissed or detached, late events are dropped.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{MetaProvider, ProviderError, SubsProvider};
use crate::config::Preferences;
use crate::locale;
use crate::models::{
    DialogArgs, Episode, EpisodeMeta, PaletteColor, Show, StreamRequest, SubtitleChoice,
    SubtitleMap,
};
use crate::ui::selector::OptionSelector;
use crate::ui::synopsis::{self, SynopsisOverlay, OVERLAY_TAG};

pub const QUALITY_TITLE: &str = "Quality";
pub const SUBTITLES_TITLE: &str = "Subtitles";
pub const LOADING_SUBS: &str = "Loading subtitles...";
pub const NO_SUBS: &str = "No subtitles";

/// Dialog errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    #[error("Episode has no torrents to play")]
    NoQualities,
}

/// Collaborators the dialog needs, injected by the host
#[derive(Clone)]
pub struct DialogDeps {
    pub meta: Arc<dyn MetaProvider>,
    pub subs: Arc<dyn SubsProvider>,
    pub prefs: Arc<dyn Preferences>,
    /// Locale for date formatting, e.g. "en_US"
    pub locale: String,
}

/// Result of an async lookup, delivered to the UI thread
#[derive(Debug)]
pub enum DialogEvent {
    Subtitles(Result<SubtitleMap, ProviderError>),
    Meta(Result<EpisodeMeta, ProviderError>),
}

/// Whether the dialog may still update its widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Detached,
}

/// Focusable controls, in tab order
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Quality,
    Subtitles,
    ReadMore,
    #[default]
    Play,
}

impl Focus {
    fn next(self, read_more: bool) -> Self {
        match self {
            Focus::Quality => Focus::Subtitles,
            Focus::Subtitles if read_more => Focus::ReadMore,
            Focus::Subtitles => Focus::Play,
            Focus::ReadMore => Focus::Play,
            Focus::Play => Focus::Quality,
        }
    }

    fn prev(self, read_more: bool) -> Self {
        match self {
            Focus::Quality => Focus::Play,
            Focus::Subtitles => Focus::Quality,
            Focus::ReadMore => Focus::Subtitles,
            Focus::Play if read_more => Focus::ReadMore,
            Focus::Play => Focus::Subtitles,
        }
    }
}

/// What the host should do after a key press
#[derive(Debug, Clone, PartialEq)]
pub enum DialogAction {
    None,
    Play(StreamRequest),
    Close,
}

/// Poster image slot; records the last URL it was asked to load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PosterView {
    url: Option<String>,
    loads: usize,
}

impl PosterView {
    pub fn load(&mut self, url: Option<String>) {
        self.url = url;
        self.loads += 1;
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Number of load attempts so far
    pub fn loads(&self) -> usize {
        self.loads
    }
}

/// The episode details dialog
pub struct EpisodeDialog {
    show: Show,
    episode: Episode,
    color: PaletteColor,
    locale: String,
    prefs: Arc<dyn Preferences>,

    selected_quality: String,
    selected_subtitle: SubtitleChoice,
    /// Choice behind each subtitle selector row
    subtitle_choices: Vec<SubtitleChoice>,

    quality: OptionSelector,
    subtitles: OptionSelector,
    poster: PosterView,
    synopsis: Option<SynopsisOverlay>,
    read_more_visible: bool,
    focus: Focus,
    lifecycle: Lifecycle,

    events_tx: UnboundedSender<DialogEvent>,
    events_rx: UnboundedReceiver<DialogEvent>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl EpisodeDialog {
    /// Open the dialog and start both lookups. Must be called inside a tokio runtime.
    pub fn open(args: DialogArgs, deps: DialogDeps) -> Result<Self, DialogError> {
        let mut dialog = Self::new(args, deps.prefs, deps.locale)?;
        dialog.start_lookups(deps.meta, deps.subs);
        Ok(dialog)
    }

    /// Build the dialog state without starting any lookup
    pub fn new(
        args: DialogArgs,
        prefs: Arc<dyn Preferences>,
        locale: impl Into<String>,
    ) -> Result<Self, DialogError> {
        let DialogArgs { show, episode, color } = args;

        let qualities = episode.qualities();
        let Some(highest) = qualities.last().cloned() else {
            return Err(DialogError::NoQualities);
        };

        let mut quality = OptionSelector::new(QUALITY_TITLE);
        let default_index = qualities.len() - 1;
        quality.set_data(qualities);
        quality.set_default(default_index);
        quality.set_text(highest.clone());

        let mut subtitles = OptionSelector::new(SUBTITLES_TITLE);
        subtitles.set_text(LOADING_SUBS);
        subtitles.set_clickable(false);

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        debug!("Opened dialog for {} {}", show.title, episode);

        Ok(Self {
            show,
            episode,
            color,
            locale: locale.into(),
            prefs,
            selected_quality: highest,
            selected_subtitle: SubtitleChoice::NoSubtitle,
            subtitle_choices: Vec::new(),
            quality,
            subtitles,
            poster: PosterView::default(),
            synopsis: None,
            read_more_visible: false,
            focus: Focus::default(),
            lifecycle: Lifecycle::Active,
            events_tx,
            events_rx,
            cancel: CancellationToken::new(),
            task: None,
        })
    }

    /// Spawn the metadata and subtitle lookups; results arrive through `poll_events`
    pub fn start_lookups(&mut self, meta: Arc<dyn MetaProvider>, subs: Arc<dyn SubsProvider>) {
        let tx = self.events_tx.clone();
        let cancel = self.cancel.clone();
        let show = self.show.clone();
        let episode = self.episode.clone();

        self.task = Some(tokio::spawn(async move {
            let subtitles = async {
                let result = subs.subtitles(&show, &episode).await;
                let _ = tx.send(DialogEvent::Subtitles(result));
            };
            let metadata = async {
                let result = meta
                    .episode_meta(&episode.imdb_id, episode.season, episode.episode)
                    .await;
                let _ = tx.send(DialogEvent::Meta(result));
            };

            tokio::select! {
                _ = cancel.cancelled() => debug!("Episode lookups cancelled"),
                _ = futures::future::join(subtitles, metadata) => debug!("Episode lookups finished"),
            }
        }));
    }

    /// Apply every lookup result that has arrived. Returns how many were applied.
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Apply one lookup result. Dropped (returns false) once the dialog is detached.
    pub fn apply(&mut self, event: DialogEvent) -> bool {
        if self.lifecycle != Lifecycle::Active {
            debug!("Dialog detached, dropping {:?}", event);
            return false;
        }

        match event {
            DialogEvent::Subtitles(Ok(map)) => self.on_subtitles(map),
            DialogEvent::Subtitles(Err(e)) => {
                warn!("Subtitle lookup failed for {}: {}", self.episode, e);
                self.on_subtitles_failed();
            }
            DialogEvent::Meta(result) => self.on_meta(result),
        }
        true
    }

    fn on_subtitles(&mut self, map: SubtitleMap) {
        let mut choices = vec![SubtitleChoice::NoSubtitle];
        choices.extend(map.keys().cloned().map(SubtitleChoice::Language));

        let names = choices.iter().map(choice_label).collect();
        self.subtitles.set_data(names);
        self.subtitles.set_clickable(true);
        self.subtitle_choices = choices;

        // Provider keys are canonical codes, the preference must match one exactly
        let choice = match self.prefs.subtitle_default() {
            Some(pref) if map.contains_key(&pref) => SubtitleChoice::Language(pref),
            _ => SubtitleChoice::NoSubtitle,
        };

        debug!("{} subtitle languages, default {}", map.len(), choice);
        if let Some(index) = self.subtitle_choices.iter().position(|c| *c == choice) {
            self.subtitles.set_default(index);
        }
        self.select_subtitle(choice);
    }

    fn on_subtitles_failed(&mut self) {
        self.subtitles.set_data(Vec::new());
        self.subtitles.set_clickable(true);
        self.subtitle_choices.clear();
        self.select_subtitle(SubtitleChoice::NoSubtitle);
    }

    fn on_meta(&mut self, result: Result<EpisodeMeta, ProviderError>) {
        let url = match result {
            Ok(meta) => meta.images.poster.or_else(|| self.episode.header_image.clone()),
            Err(e) => {
                warn!("Metadata lookup failed for {}: {}", self.episode, e);
                self.episode.header_image.clone()
            }
        };
        debug!("Loading poster {:?}", url);
        self.poster.load(url);
    }

    fn select_subtitle(&mut self, choice: SubtitleChoice) {
        let text = match choice.language() {
            Some(code) => locale::uppercase_first(&locale::display_name(code)),
            None => NO_SUBS.to_string(),
        };
        self.subtitles.set_text(text);
        self.selected_subtitle = choice;
    }

    /// User picked a row in the quality selector
    pub fn select_quality(&mut self, index: usize) {
        if let Some(value) = self.quality.data().get(index).cloned() {
            self.quality.set_default(index);
            self.quality.set_text(value.clone());
            self.selected_quality = value;
        }
    }

    /// User picked a row in the subtitle selector
    pub fn select_subtitle_index(&mut self, index: usize) {
        if let Some(choice) = self.subtitle_choices.get(index).cloned() {
            self.subtitles.set_default(index);
            self.select_subtitle(choice);
        }
    }

    /// Build the stream-start request for the selected quality.
    ///
    /// Falls back to the first torrent if the selected quality is missing.
    pub fn play(&self) -> Result<StreamRequest, DialogError> {
        let (quality, torrent) = match self.episode.torrents.get_key_value(&self.selected_quality) {
            Some(found) => found,
            None => {
                let first = self
                    .episode
                    .torrents
                    .iter()
                    .next()
                    .ok_or(DialogError::NoQualities)?;
                warn!(
                    "Quality {} not in torrents, falling back to {}",
                    self.selected_quality, first.0
                );
                first
            }
        };

        info!("Play {} {} [{}]", self.show.title, self.episode, quality);
        Ok(StreamRequest::new(
            self.episode.clone(),
            self.show.clone(),
            torrent.url.clone(),
            self.selected_subtitle.clone(),
            quality.clone(),
        ))
    }

    /// Open the full synopsis. No-op if the overlay is already showing.
    pub fn open_read_more(&mut self) -> bool {
        if self.has_overlay(OVERLAY_TAG) {
            return false;
        }
        self.synopsis = Some(SynopsisOverlay::new(self.episode.overview.clone()));
        true
    }

    pub fn close_read_more(&mut self) {
        self.synopsis = None;
    }

    pub fn has_overlay(&self, tag: &str) -> bool {
        tag == OVERLAY_TAG && self.synopsis.is_some()
    }

    /// Record the synopsis area after layout; decides whether "read more" shows
    pub fn set_synopsis_layout(&mut self, width: u16, height: u16) {
        self.read_more_visible = synopsis::is_truncated(&self.episode.overview, width, height);
        if !self.read_more_visible && self.focus == Focus::ReadMore {
            self.focus = Focus::Play;
        }
    }

    /// Stop lookups and detach. Late results are ignored from here on.
    pub fn dismiss(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.detach();
    }

    pub fn detach(&mut self) {
        if self.lifecycle == Lifecycle::Active {
            debug!("Dialog for {} detached", self.episode);
        }
        self.lifecycle = Lifecycle::Detached;
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogAction {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return DialogAction::Close;
        }

        if let Some(overlay) = self.synopsis.as_mut() {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => self.synopsis = None,
                KeyCode::Up | KeyCode::Char('k') => overlay.up(),
                KeyCode::Down | KeyCode::Char('j') => overlay.down(),
                _ => {}
            }
            return DialogAction::None;
        }

        if self.quality.is_open() {
            if let Some(index) = handle_picker_key(&mut self.quality, key) {
                self.select_quality(index);
            }
            return DialogAction::None;
        }

        if self.subtitles.is_open() {
            if let Some(index) = handle_picker_key(&mut self.subtitles, key) {
                self.select_subtitle_index(index);
            }
            return DialogAction::None;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => DialogAction::Close,
            KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => {
                self.focus = self.focus.next(self.read_more_visible);
                DialogAction::None
            }
            KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => {
                self.focus = self.focus.prev(self.read_more_visible);
                DialogAction::None
            }
            KeyCode::Char('p') => self.play_action(),
            KeyCode::Char('r') if self.read_more_visible => {
                self.open_read_more();
                DialogAction::None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            _ => DialogAction::None,
        }
    }

    fn activate(&mut self) -> DialogAction {
        match self.focus {
            Focus::Quality => {
                self.quality.open();
                DialogAction::None
            }
            Focus::Subtitles => {
                self.subtitles.open();
                DialogAction::None
            }
            Focus::ReadMore => {
                self.open_read_more();
                DialogAction::None
            }
            Focus::Play => self.play_action(),
        }
    }

    fn play_action(&self) -> DialogAction {
        match self.play() {
            Ok(request) => DialogAction::Play(request),
            Err(e) => {
                warn!("Cannot play: {}", e);
                DialogAction::None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn show(&self) -> &Show {
        &self.show
    }

    pub fn episode(&self) -> &Episode {
        &self.episode
    }

    pub fn color(&self) -> PaletteColor {
        self.color
    }

    /// "Aired: Jan 20, 2008"
    pub fn aired_text(&self) -> String {
        format!("Aired: {}", locale::format_aired(self.episode.aired, &self.locale))
    }

    pub fn selected_quality(&self) -> &str {
        &self.selected_quality
    }

    pub fn selected_subtitle(&self) -> &SubtitleChoice {
        &self.selected_subtitle
    }

    pub fn subtitle_choices(&self) -> &[SubtitleChoice] {
        &self.subtitle_choices
    }

    pub fn quality_selector(&self) -> &OptionSelector {
        &self.quality
    }

    pub fn quality_selector_mut(&mut self) -> &mut OptionSelector {
        &mut self.quality
    }

    pub fn subtitle_selector(&self) -> &OptionSelector {
        &self.subtitles
    }

    pub fn subtitle_selector_mut(&mut self) -> &mut OptionSelector {
        &mut self.subtitles
    }

    pub fn poster(&self) -> &PosterView {
        &self.poster
    }

    pub fn synopsis(&self) -> Option<&SynopsisOverlay> {
        self.synopsis.as_ref()
    }

    pub fn read_more_visible(&self) -> bool {
        self.read_more_visible
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for EpisodeDialog {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Picker navigation; returns the chosen index on Enter
fn handle_picker_key(selector: &mut OptionSelector, key: KeyEvent) -> Option<usize> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => selector.up(),
        KeyCode::Down | KeyCode::Char('j') => selector.down(),
        KeyCode::Home | KeyCode::Char('g') => selector.first(),
        KeyCode::End | KeyCode::Char('G') => selector.last(),
        KeyCode::Esc | KeyCode::Char('q') => selector.close(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            let chosen = selector.choose().map(|(index, _)| index);
            // Choosing from an empty list still closes the picker
            selector.close();
            return chosen;
        }
        _ => {}
    }
    None
}

/// Row label for a subtitle choice
fn choice_label(choice: &SubtitleChoice) -> String {
    choice.language().map_or_else(|| NO_SUBS.to_string(), locale::display_name)
}

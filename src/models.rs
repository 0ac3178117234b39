//! Data structures and types for episodetui
//!
//! Contains the shared models used across the application organized by domain:
//! - **Media**: shows, episodes and the torrents attached to them
//! - **Metadata**: artwork returned by the metadata provider
//! - **Subtitles**: language map and the user's subtitle choice
//! - **Playback**: the stream-start request handed to the host

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// =============================================================================
// Media Models
// =============================================================================

/// TV show the episode belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub imdb_id: String,
    #[serde(default)]
    pub tmdb_id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub backdrop: Option<String>,
}

impl fmt::Display for Show {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{} ({})", self.title, year),
            None => write!(f, "{}", self.title),
        }
    }
}

/// A torrent for one quality of an episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Torrent {
    /// Magnet link or .torrent URL
    pub url: String,
    #[serde(default)]
    pub seeds: u32,
    #[serde(default)]
    pub peers: u32,
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

impl Torrent {
    /// Format size as human-readable string (e.g., "1.2 GB")
    pub fn format_size(&self) -> String {
        match self.size_bytes {
            Some(bytes) => format_bytes(bytes),
            None => "?".to_string(),
        }
    }
}

/// TV episode with its available torrents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub title: String,
    #[serde(default)]
    pub overview: String,
    /// Air date as unix seconds
    #[serde(default)]
    pub aired: i64,
    pub season: u16,
    pub episode: u16,
    /// IMDB id of the show (episodes are looked up by show + numbers)
    pub imdb_id: String,
    #[serde(default)]
    pub tvdb_id: Option<String>,
    /// Artwork already known for the episode, used when metadata lookup fails
    #[serde(default)]
    pub header_image: Option<String>,
    /// Quality label -> torrent
    pub torrents: BTreeMap<String, Torrent>,
}

impl Episode {
    /// Quality labels in ascending (lexicographic) order
    pub fn qualities(&self) -> Vec<String> {
        self.torrents.keys().cloned().collect()
    }
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:02}E{:02} - {}", self.season, self.episode, self.title)
    }
}

/// Dialog accent color as an ARGB integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawColor", into = "u32")]
pub struct PaletteColor(pub u32);

/// Accepted JSON forms: signed or unsigned integer, or a color string
#[derive(Deserialize)]
#[serde(untagged)]
enum RawColor {
    Int(i64),
    Text(String),
}

impl TryFrom<RawColor> for PaletteColor {
    type Error = String;

    fn try_from(raw: RawColor) -> Result<Self, Self::Error> {
        match raw {
            RawColor::Int(v) => Ok(PaletteColor(v as u32)),
            RawColor::Text(s) => PaletteColor::parse(&s).ok_or_else(|| format!("invalid color '{}'", s)),
        }
    }
}

impl From<PaletteColor> for u32 {
    fn from(color: PaletteColor) -> u32 {
        color.0
    }
}

impl PaletteColor {
    /// Parse "#rrggbb", "#aarrggbb", "0x..." or a plain decimal integer
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#').or_else(|| s.strip_prefix("0x")) {
            let value = u32::from_str_radix(hex, 16).ok()?;
            return match hex.len() {
                6 => Some(PaletteColor(0xff00_0000 | value)),
                8 => Some(PaletteColor(value)),
                _ => None,
            };
        }
        s.parse::<i64>().ok().map(|v| PaletteColor(v as u32))
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        let v = self.0;
        (((v >> 16) & 0xff) as u8, ((v >> 8) & 0xff) as u8, (v & 0xff) as u8)
    }

    pub fn to_color(&self) -> Color {
        let (r, g, b) = self.rgb();
        Color::Rgb(r, g, b)
    }
}

impl Default for PaletteColor {
    fn default() -> Self {
        // Hot pink, the theme highlight
        PaletteColor(0xffff_0080)
    }
}

/// Navigation arguments the dialog is opened with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogArgs {
    pub show: Show,
    pub episode: Episode,
    #[serde(default)]
    pub color: PaletteColor,
}

// =============================================================================
// Metadata Models
// =============================================================================

/// Artwork for an episode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaImages {
    pub poster: Option<String>,
    pub fanart: Option<String>,
    pub banner: Option<String>,
}

/// Result of a metadata lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeMeta {
    pub images: MetaImages,
}

// =============================================================================
// Subtitle Models
// =============================================================================

/// Language code -> subtitle URL
pub type SubtitleMap = BTreeMap<String, String>;

/// What to play subtitles with
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "code", rename_all = "snake_case")]
pub enum SubtitleChoice {
    #[default]
    NoSubtitle,
    Language(String),
}

impl SubtitleChoice {
    pub fn language(&self) -> Option<&str> {
        match self {
            SubtitleChoice::NoSubtitle => None,
            SubtitleChoice::Language(code) => Some(code),
        }
    }
}

impl fmt::Display for SubtitleChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubtitleChoice::NoSubtitle => write!(f, "none"),
            SubtitleChoice::Language(code) => write!(f, "{}", code),
        }
    }
}

// =============================================================================
// Playback Models
// =============================================================================

/// Request to start streaming, handed to the hosting screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamRequest {
    pub id: Uuid,
    pub episode: Episode,
    pub show: Show,
    pub video_url: String,
    pub subtitle: SubtitleChoice,
    pub quality: String,
}

impl StreamRequest {
    pub fn new(
        episode: Episode,
        show: Show,
        video_url: impl Into<String>,
        subtitle: SubtitleChoice,
        quality: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            episode,
            show,
            video_url: video_url.into(),
            subtitle,
            quality: quality.into(),
        }
    }
}

impl fmt::Display for StreamRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] subs={}",
            self.show.title, self.episode, self.quality, self.subtitle
        )
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.0} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.0} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! Configuration management for episodetui
//!
//! Handles config file loading, API key lookup and the stored user
//! preferences the dialog reads. The file is only ever read.
//! Config is stored at ~/.config/episodetui/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Read access to stored user preferences
pub trait Preferences: Send + Sync {
    /// Last chosen default subtitle language code
    fn subtitle_default(&self) -> Option<String>;
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// TMDB API read access token
    pub tmdb_api_key: Option<String>,
    /// Default subtitle language code (e.g. "en", "fr")
    pub subtitle_default: Option<String>,
    /// UI locale for dates (e.g. "fr_FR"), falls back to $LANG
    pub locale: Option<String>,
    /// Override for the TMDB API base URL
    pub tmdb_base_url: Option<String>,
    /// Override for the subtitles addon base URL
    pub subtitles_base_url: Option<String>,
}

impl Config {
    /// Get config file path (~/.config/episodetui/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("episodetui").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from a file, or return default if missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(s) => toml::from_str(&s).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Get TMDB API key:
    /// 1. Environment variable TMDB_API_KEY
    /// 2. Key from config file
    pub fn tmdb_api_key(&self) -> Option<String> {
        std::env::var("TMDB_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.tmdb_api_key.clone())
    }
}

impl Preferences for Config {
    fn subtitle_default(&self) -> Option<String> {
        self.subtitle_default.clone()
    }
}

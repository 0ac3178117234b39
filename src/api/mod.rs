//! Providers for the episode dialog
//!
//! - TMDB: episode artwork by show IMDB id + season/episode
//! - Stremio: subtitle languages via the OpenSubtitles v3 addon
//!
//! The dialog only sees the [`MetaProvider`] and [`SubsProvider`] traits.
//! Lookups are plain futures: dropping one cancels it.

pub mod subtitles;
pub mod tmdb;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Episode, EpisodeMeta, Show, SubtitleMap};

pub use subtitles::StremioSubsProvider;
pub use tmdb::TmdbMetaProvider;

/// Provider lookup errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Rate limited (429), retries exhausted")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No TMDB API key configured")]
    MissingApiKey,

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// Looks up episode metadata (artwork)
#[async_trait]
pub trait MetaProvider: Send + Sync {
    async fn episode_meta(
        &self,
        imdb_id: &str,
        season: u16,
        episode: u16,
    ) -> Result<EpisodeMeta, ProviderError>;
}

/// Looks up available subtitle languages for an episode
#[async_trait]
pub trait SubsProvider: Send + Sync {
    async fn subtitles(&self, show: &Show, episode: &Episode) -> Result<SubtitleMap, ProviderError>;
}

/// Normalize IMDB ID to have "tt" prefix
pub(crate) fn normalize_imdb_id(imdb_id: &str) -> String {
    if imdb_id.starts_with("tt") {
        imdb_id.to_string()
    } else {
        format!("tt{}", imdb_id)
    }
}

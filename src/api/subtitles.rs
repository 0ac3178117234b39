//! Stremio subtitle provider
//!
//! Free subtitle search using Stremio's public addon endpoint.
//! No API key required - uses Stremio's OpenSubtitles v3 addon.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{normalize_imdb_id, ProviderError, SubsProvider};
use crate::locale;
use crate::models::{Episode, Show, SubtitleMap};

const DEFAULT_BASE_URL: &str = "https://opensubtitles-v3.strem.io";

/// Subtitle provider backed by Stremio's free public endpoint
pub struct StremioSubsProvider {
    base_url: String,
    client: reqwest::Client,
}

/// Stremio subtitle response
#[derive(Debug, Deserialize)]
struct StremioResponse {
    #[serde(default)]
    subtitles: Vec<StremioSubtitle>,
}

/// Single subtitle from Stremio
#[derive(Debug, Deserialize)]
struct StremioSubtitle {
    url: String,
    lang: String,
}

impl StremioSubsProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create with custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Endpoint for a series episode: /subtitles/series/{imdb}:{season}:{episode}.json
    fn episode_url(&self, imdb_id: &str, season: u16, episode: u16) -> String {
        format!(
            "{}/subtitles/series/{}:{}:{}.json",
            self.base_url,
            normalize_imdb_id(imdb_id),
            season,
            episode
        )
    }
}

impl Default for StremioSubsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubsProvider for StremioSubsProvider {
    async fn subtitles(&self, show: &Show, episode: &Episode) -> Result<SubtitleMap, ProviderError> {
        let imdb_id = if show.imdb_id.is_empty() {
            &episode.imdb_id
        } else {
            &show.imdb_id
        };
        let url = self.episode_url(imdb_id, episode.season, episode.episode);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound);
        }
        if !response.status().is_success() {
            return Err(ProviderError::ServerError(response.status().as_u16()));
        }

        let body = response.text().await?;
        let parsed: StremioResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        Ok(into_subtitle_map(parsed.subtitles))
    }
}

/// Collapse the result list to one URL per language (first one wins).
///
/// Keys are canonical codes, so "eng" and "en" land on the same entry.
fn into_subtitle_map(subtitles: Vec<StremioSubtitle>) -> SubtitleMap {
    let mut map = SubtitleMap::new();
    for sub in subtitles {
        let lang = sub.lang.trim();
        if lang.is_empty() {
            continue;
        }
        map.entry(locale::canonical_code(lang)).or_insert(sub.url);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(lang: &str, url: &str) -> StremioSubtitle {
        StremioSubtitle {
            url: url.to_string(),
            lang: lang.to_string(),
        }
    }

    #[test]
    fn test_first_url_per_language_wins() {
        let map = into_subtitle_map(vec![
            sub("eng", "https://subs.io/1"),
            sub("fre", "https://subs.io/2"),
            sub("ENG", "https://subs.io/3"),
            sub("", "https://subs.io/4"),
        ]);

        assert_eq!(map.len(), 2);
        assert_eq!(map["en"], "https://subs.io/1");
        assert_eq!(map["fr"], "https://subs.io/2");
    }

    #[test]
    fn test_language_keys_are_canonical() {
        let map = into_subtitle_map(vec![
            sub("fre", "https://subs.io/1"),
            sub("fr", "https://subs.io/2"),
            sub("pt_BR", "https://subs.io/3"),
            sub("pob", "https://subs.io/4"),
        ]);

        assert_eq!(map.keys().collect::<Vec<_>>(), ["fr", "pt-br"]);
        assert_eq!(map["fr"], "https://subs.io/1");
        assert!(!map.contains_key("fre"));
    }

    #[test]
    fn test_episode_url() {
        let provider = StremioSubsProvider::with_base_url("http://localhost");
        assert_eq!(
            provider.episode_url("0903747", 1, 5),
            "http://localhost/subtitles/series/tt0903747:1:5.json"
        );
    }
}

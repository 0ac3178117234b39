//! TMDB (The Movie Database) metadata provider
//!
//! Resolves a show by IMDB id, then fetches the episode still as poster.
//! API docs: https://developer.themoviedb.org/docs

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{normalize_imdb_id, MetaProvider, ProviderError};
use crate::models::{EpisodeMeta, MetaImages};

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// TMDB episode metadata provider
pub struct TmdbMetaProvider {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl TmdbMetaProvider {
    /// Create a new provider; without a key every lookup fails with `MissingApiKey`
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a provider with a custom base URL (for testing)
    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            max_retries: 3,
        }
    }

    /// Make an authenticated GET request with retry logic for rate limits
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;
        let url = format!("{}{}", self.base_url, endpoint);
        let mut retries = 0;

        loop {
            let response = self
                .client
                .get(&url)
                .header("Authorization", format!("Bearer {}", api_key))
                .header("Accept", "application/json")
                .send()
                .await?;

            match response.status() {
                StatusCode::OK => {
                    let body = response.text().await?;
                    return serde_json::from_str(&body).map_err(|e| {
                        ProviderError::InvalidResponse(format!("JSON parse error: {}", e))
                    });
                }
                StatusCode::NOT_FOUND => {
                    return Err(ProviderError::NotFound);
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    retries += 1;
                    if retries >= self.max_retries {
                        return Err(ProviderError::RateLimited);
                    }

                    // Retry-After header or exponential backoff
                    let wait_secs = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(2u64.pow(retries));

                    debug!("TMDB rate limited, retrying in {}s", wait_secs);
                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                    continue;
                }
                status => {
                    return Err(ProviderError::ServerError(status.as_u16()));
                }
            }
        }
    }

    /// Find the TMDB show matching an IMDB id
    async fn find_show(&self, imdb_id: &str) -> Result<ShowRaw, ProviderError> {
        let endpoint = format!(
            "/find/{}?external_source=imdb_id",
            urlencoding::encode(&normalize_imdb_id(imdb_id))
        );
        let response: FindResponse = self.get(&endpoint).await?;
        response.tv_results.into_iter().next().ok_or(ProviderError::NotFound)
    }
}

#[async_trait]
impl MetaProvider for TmdbMetaProvider {
    async fn episode_meta(
        &self,
        imdb_id: &str,
        season: u16,
        episode: u16,
    ) -> Result<EpisodeMeta, ProviderError> {
        let show = self.find_show(imdb_id).await?;
        debug!("Resolved {} to TMDB show {}", imdb_id, show.id);

        let endpoint = format!("/tv/{}/season/{}/episode/{}", show.id, season, episode);
        let raw: EpisodeRaw = self.get(&endpoint).await?;

        Ok(EpisodeMeta {
            images: MetaImages {
                poster: raw.still_path.as_deref().map(|p| image_url("w500", p)),
                fanart: show.backdrop_path.as_deref().map(|p| image_url("w1280", p)),
                banner: show.poster_path.as_deref().map(|p| image_url("w342", p)),
            },
        })
    }
}

/// Build a full image URL from a TMDB file path
fn image_url(size: &str, path: &str) -> String {
    format!("{}/{}{}", IMAGE_BASE_URL, size, path)
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    tv_results: Vec<ShowRaw>,
}

#[derive(Debug, Deserialize)]
struct ShowRaw {
    id: u64,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EpisodeRaw {
    still_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url() {
        assert_eq!(
            image_url("w500", "/abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn test_missing_key_fails_without_request() {
        let provider = TmdbMetaProvider::with_base_url(None, "http://127.0.0.1:1");
        let result = tokio_test::block_on(provider.episode_meta("tt0903747", 1, 1));
        assert!(matches!(result, Err(ProviderError::MissingApiKey)));
    }

    #[test]
    fn test_find_response_without_tv_results() {
        let response: FindResponse = serde_json::from_str(r#"{"movie_results": []}"#).unwrap();
        assert!(response.tv_results.is_empty());
    }
}

//! Stremio subtitle provider tests
//!
//! Tests the language map built from the addon response and error handling.

use std::collections::BTreeMap;

use mockito::Server;
use episodetui::api::{ProviderError, StremioSubsProvider, SubsProvider};
use episodetui::models::{Episode, Show};

fn show(imdb_id: &str) -> Show {
    Show {
        imdb_id: imdb_id.into(),
        tmdb_id: None,
        title: "Breaking Bad".into(),
        year: Some(2008),
        poster: None,
        backdrop: None,
    }
}

fn episode(season: u16, number: u16) -> Episode {
    Episode {
        title: "Pilot".into(),
        overview: String::new(),
        aired: 0,
        season,
        episode: number,
        imdb_id: "tt0903747".into(),
        tvdb_id: None,
        header_image: None,
        torrents: BTreeMap::new(),
    }
}

#[tokio::test]
async fn test_subtitles_one_url_per_language() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/subtitles/series/tt0903747:1:2.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "subtitles": [
                    {"id": "1", "url": "https://subs.example/en-1.srt", "lang": "eng"},
                    {"id": "2", "url": "https://subs.example/fr-1.srt", "lang": "fre"},
                    {"id": "3", "url": "https://subs.example/en-2.srt", "lang": "eng"},
                    {"id": "4", "url": "https://subs.example/pb.srt", "lang": "pob"}
                ]
            }"#,
        )
        .create_async()
        .await;

    let provider = StremioSubsProvider::with_base_url(server.url());
    let subs = provider.subtitles(&show("tt0903747"), &episode(1, 2)).await.unwrap();

    mock.assert_async().await;

    assert_eq!(subs.len(), 3);
    // Three-letter addon codes come back as the codes preferences use
    assert_eq!(subs["en"], "https://subs.example/en-1.srt");
    assert_eq!(subs["fr"], "https://subs.example/fr-1.srt");
    assert_eq!(subs["pt-br"], "https://subs.example/pb.srt");
    assert!(!subs.contains_key("fre"));
    // BTreeMap keeps codes sorted
    assert_eq!(subs.keys().collect::<Vec<_>>(), ["en", "fr", "pt-br"]);
}

#[tokio::test]
async fn test_falls_back_to_episode_imdb_id() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/subtitles/series/tt0903747:3:7.json")
        .with_status(200)
        .with_body(r#"{"subtitles": []}"#)
        .create_async()
        .await;

    let provider = StremioSubsProvider::with_base_url(server.url());
    let subs = provider.subtitles(&show(""), &episode(3, 7)).await.unwrap();

    mock.assert_async().await;
    assert!(subs.is_empty());
}

#[tokio::test]
async fn test_missing_subtitles_field_is_empty() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/subtitles/series/tt0903747:1:1.json")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let provider = StremioSubsProvider::with_base_url(server.url());
    let subs = provider.subtitles(&show("tt0903747"), &episode(1, 1)).await.unwrap();

    assert!(subs.is_empty());
}

#[tokio::test]
async fn test_not_found() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/subtitles/series/tt0903747:1:1.json")
        .with_status(404)
        .create_async()
        .await;

    let provider = StremioSubsProvider::with_base_url(server.url());
    let result = provider.subtitles(&show("tt0903747"), &episode(1, 1)).await;

    assert!(matches!(result, Err(ProviderError::NotFound)));
}

#[tokio::test]
async fn test_server_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/subtitles/series/tt0903747:1:1.json")
        .with_status(502)
        .create_async()
        .await;

    let provider = StremioSubsProvider::with_base_url(server.url());
    let result = provider.subtitles(&show("tt0903747"), &episode(1, 1)).await;

    assert!(matches!(result, Err(ProviderError::ServerError(502))));
}

#[tokio::test]
async fn test_invalid_json() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/subtitles/series/tt0903747:1:1.json")
        .with_status(200)
        .with_body("<html>")
        .create_async()
        .await;

    let provider = StremioSubsProvider::with_base_url(server.url());
    let result = provider.subtitles(&show("tt0903747"), &episode(1, 1)).await;

    assert!(matches!(result, Err(ProviderError::InvalidResponse(_))));
}

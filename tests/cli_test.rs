//! CLI Tests
//!
//! Episode file loading, flag overrides, and JSON output shape.

use std::io::Write;

use clap::Parser;
use episodetui::cli::{read_episode_file, Cli, ExitCode, JsonOutput};
use episodetui::models::{PaletteColor, StreamRequest, SubtitleChoice};

const EPISODE_FILE: &str = r#"{
    "show": {"imdb_id": "tt0903747", "title": "Breaking Bad", "year": 2008},
    "episode": {
        "title": "Pilot",
        "overview": "Walter White, a chemistry teacher, discovers he has cancer.",
        "aired": 1200794400,
        "season": 1,
        "episode": 1,
        "imdb_id": "tt0903747",
        "header_image": "https://img.example/header.jpg",
        "torrents": {
            "480p": {"url": "magnet:?xt=urn:btih:480", "seeds": 12},
            "720p": {"url": "magnet:?xt=urn:btih:720", "seeds": 80, "size_bytes": 734003200}
        }
    },
    "color": -12625154
}"#;

fn episode_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_read_episode_file() {
    let file = episode_file(EPISODE_FILE);
    let args = read_episode_file(file.path()).unwrap();

    assert_eq!(args.show.title, "Breaking Bad");
    assert_eq!(args.episode.qualities(), vec!["480p", "720p"]);
    assert_eq!(args.episode.torrents["720p"].seeds, 80);
    // -12625154 is 0xff3f5afe as a signed ARGB int
    assert_eq!(args.color.rgb(), (0x3f, 0x5a, 0xfe));
}

#[test]
fn test_color_flag_overrides_file() {
    let file = episode_file(EPISODE_FILE);
    let path = file.path().to_str().unwrap();
    let cli = Cli::parse_from(["episodetui", path, "--color", "#112233"]);

    let args = cli.dialog_args().unwrap();
    assert_eq!(args.color, PaletteColor(0xff112233));
}

#[test]
fn test_missing_file_is_error() {
    let err = read_episode_file(std::path::Path::new("/nonexistent/episode.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read"));
}

#[test]
fn test_invalid_file_is_error() {
    let file = episode_file(r#"{"show": {}}"#);
    let err = read_episode_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Invalid episode file"));
}

#[test]
fn test_stream_request_json_output() {
    let file = episode_file(EPISODE_FILE);
    let args = read_episode_file(file.path()).unwrap();
    let torrent = &args.episode.torrents["720p"];
    let request = StreamRequest::new(
        args.episode.clone(),
        args.show.clone(),
        torrent.url.clone(),
        SubtitleChoice::Language("en".into()),
        "720p",
    );

    let json = serde_json::to_value(JsonOutput::success(&request)).unwrap();
    assert_eq!(json["data"]["video_url"], "magnet:?xt=urn:btih:720");
    assert_eq!(json["data"]["quality"], "720p");
    assert_eq!(json["data"]["subtitle"]["type"], "language");
    assert_eq!(json["data"]["subtitle"]["code"], "en");
    assert!(json.get("exit_code").is_none());
}

#[test]
fn test_exit_code_conversion() {
    let code: i32 = ExitCode::NoStream.into();
    assert_eq!(code, 3);
}

//! CLI - Command Line Interface for episodetui
//!
//! Opens the episode dialog for one episode file. When the user presses
//! play, the stream request is printed to stdout as JSON so a player or
//! script can pick it up.
//!
//! # Examples
//!
//! ```bash
//! episodetui pilot.json
//! episodetui pilot.json --color "#e50914" --locale fr_FR
//! episodetui pilot.json --json | jq .data.video_url
//! ```

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::models::{DialogArgs, PaletteColor};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Play was pressed, request printed
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments or episode file
    InvalidArgs = 2,
    /// Dialog closed without playing
    NoStream = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// episodetui - Episode details dialog for the terminal
#[derive(Parser, Debug)]
#[command(
    name = "episodetui",
    version,
    author = "Gorka & Hermes",
    about = "Episode details dialog: pick quality and subtitles, start the stream",
    long_about = "Shows an episode's title, air date, artwork and synopsis, lets you \
                  pick a video quality and a subtitle language, and prints the \
                  resulting stream request as JSON when you press play.",
    after_help = "EXAMPLES:\n\
                  episodetui pilot.json                    Open the dialog\n\
                  episodetui pilot.json --color '#e50914'  Tint with a palette color\n\
                  episodetui pilot.json --json             Wrap output in a JSON envelope"
)]
pub struct Cli {
    /// Episode file: JSON with "show", "episode" and optional "color"
    pub episode_file: PathBuf,

    /// Palette color for the play button (#rrggbb, #aarrggbb or ARGB integer)
    #[arg(long, value_parser = parse_color)]
    pub color: Option<PaletteColor>,

    /// Locale for dates, e.g. fr_FR (default: config, then $LANG)
    #[arg(long, short = 'l')]
    pub locale: Option<String>,

    /// Path to config file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j')]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }

    /// Read the episode file, applying the --color override
    pub fn dialog_args(&self) -> anyhow::Result<DialogArgs> {
        let mut args = read_episode_file(&self.episode_file)?;
        if let Some(color) = self.color {
            args.color = color;
        }
        Ok(args)
    }
}

fn parse_color(s: &str) -> Result<PaletteColor, String> {
    PaletteColor::parse(s).ok_or_else(|| format!("invalid color '{}'", s))
}

/// Load dialog arguments from a JSON episode file
pub fn read_episode_file(path: &Path) -> anyhow::Result<DialogArgs> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid episode file {}", path.display()))
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_episode_file_required() {
        assert!(Cli::try_parse_from(["episodetui"]).is_err());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "episodetui",
            "pilot.json",
            "--color",
            "#e50914",
            "-l",
            "fr_FR",
            "--json",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.episode_file, PathBuf::from("pilot.json"));
        assert_eq!(cli.color, Some(PaletteColor(0xffe50914)));
        assert_eq!(cli.locale.as_deref(), Some("fr_FR"));
        assert!(cli.json);
        assert!(cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_invalid_color_rejected() {
        assert!(Cli::try_parse_from(["episodetui", "e.json", "--color", "teal"]).is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NoStream), 3);
    }

    #[test]
    fn test_json_output_error_shape() {
        let output = JsonOutput::<()>::error_msg("boom", ExitCode::InvalidArgs);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["error"], "boom");
        assert_eq!(json["exit_code"], 2);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_json_output_success_omits_exit_code() {
        let json = serde_json::to_value(JsonOutput::success(42)).unwrap();
        assert_eq!(json["data"], 42);
        assert!(json.get("exit_code").is_none());
    }
}

//! Terminal UI components
//!
//! Built with ratatui for a neon aesthetic.
//! Keyboard-first navigation throughout.

pub mod theme;
pub mod selector;
pub mod synopsis;
pub mod episode;

pub use theme::Theme;

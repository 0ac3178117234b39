//! Neon theme for episodetui
//!
//! Color palette and style helpers for the dialog.

use ratatui::style::{Color, Modifier, Style};

use crate::models::PaletteColor;

/// Neon color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #0a0a0f (deep black-blue)
    pub const BACKGROUND: Color = Color::Rgb(0x0a, 0x0a, 0x0f);

    /// Primary: #00fff2 (cyan neon)
    pub const PRIMARY: Color = Color::Rgb(0x00, 0xff, 0xf2);

    /// Secondary: #ff00ff (magenta)
    pub const SECONDARY: Color = Color::Rgb(0xff, 0x00, 0xff);

    /// Accent: #ffff00 (yellow)
    pub const ACCENT: Color = Color::Rgb(0xff, 0xff, 0x00);

    /// Text: #e0e0e0 (soft white)
    pub const TEXT: Color = Color::Rgb(0xe0, 0xe0, 0xe0);

    /// Dim: #404050 (muted)
    pub const DIM: Color = Color::Rgb(0x40, 0x40, 0x50);

    /// Slightly lighter background for overlays
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x14, 0x14, 0x1e);

    /// Border color (dim cyan)
    pub const BORDER: Color = Color::Rgb(0x00, 0x80, 0x78);

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn accent() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn loading() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC)
    }

    pub fn list_item_selected() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn overlay() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn keybind_desc() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Selector value text; dimmed while the selector can't be opened
    pub fn selector_value(clickable: bool) -> Style {
        if clickable {
            Style::default().fg(Self::TEXT).add_modifier(Modifier::BOLD)
        } else {
            Self::loading()
        }
    }

    /// Play button tinted with the show's palette color.
    ///
    /// The glyph uses whichever of background/text reads better on the tint.
    pub fn play_button(palette: PaletteColor) -> Style {
        let bg = palette.rgb();
        let dark = contrast_ratio(rgb_of(Self::BACKGROUND), bg);
        let light = contrast_ratio(rgb_of(Self::TEXT), bg);
        let fg = if dark >= light { Self::BACKGROUND } else { Self::TEXT };

        Style::default()
            .fg(fg)
            .bg(palette.to_color())
            .add_modifier(Modifier::BOLD)
    }
}

fn rgb_of(color: Color) -> (u8, u8, u8) {
    color_to_rgb(color).unwrap_or((0, 0, 0))
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Calculate relative luminance for a color (used in contrast ratio)
/// Formula: https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel_luminance(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel_luminance(r) + 0.7152 * channel_luminance(g) + 0.0722 * channel_luminance(b)
}

/// Contrast ratio between two colors, from 1 (same) to 21 (black/white)
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let l1 = relative_luminance(fg.0, fg.1, fg.2);
    let l2 = relative_luminance(bg.0, bg.1, bg.2);

    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };

    (lighter + 0.05) / (darker + 0.05)
}

/// Extract RGB tuple from ratatui Color (only works for Rgb variant)
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_contrast_against_background() {
        let ratio = contrast_ratio(rgb_of(Theme::TEXT), rgb_of(Theme::BACKGROUND));
        assert!(ratio >= 4.5, "got {:.2}:1", ratio);
    }

    #[test]
    fn test_contrast_extremes() {
        let black_white = contrast_ratio((0, 0, 0), (255, 255, 255));
        assert!((black_white - 21.0).abs() < 0.01);
        assert!((contrast_ratio((10, 20, 30), (10, 20, 30)) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_play_button_on_light_tint_uses_dark_glyph() {
        let style = Theme::play_button(PaletteColor(0xffffff00));
        assert_eq!(style.fg, Some(Theme::BACKGROUND));
        assert_eq!(style.bg, Some(Color::Rgb(0xff, 0xff, 0x00)));
    }

    #[test]
    fn test_play_button_on_dark_tint_uses_light_glyph() {
        let style = Theme::play_button(PaletteColor(0xff101040));
        assert_eq!(style.fg, Some(Theme::TEXT));
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Theme::PRIMARY), Some((0x00, 0xff, 0xf2)));
        assert_eq!(color_to_rgb(Color::Red), None);
    }
}

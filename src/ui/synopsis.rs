//! Synopsis overlay ("read more")
//!
//! Full episode overview in a scrollable pop-up, plus the wrapping helpers
//! the dialog uses to decide whether the inline synopsis was cut off.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::ui::selector::centered;
use crate::ui::Theme;

/// Tag of the single overlay the dialog may show at a time
pub const OVERLAY_TAG: &str = "overlay_fragment";

/// Full-text synopsis overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynopsisOverlay {
    pub text: String,
    pub scroll: u16,
}

impl SynopsisOverlay {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            scroll: 0,
        }
    }

    pub fn up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = (area.width * 3 / 4).max(20).min(area.width);
        let inner_width = width.saturating_sub(2).max(1);
        let lines = u16::try_from(wrapped_line_count(&self.text, inner_width)).unwrap_or(u16::MAX);
        let height = lines.saturating_add(2).max(5).min(area.height);
        let popup = centered(area, width, height);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::border_focused())
            .style(Theme::overlay())
            .title(Span::styled(" SYNOPSIS ", Theme::title()))
            .title_bottom(Line::from(vec![
                Span::styled(" [Esc] ", Theme::keybind()),
                Span::styled("Close ", Theme::keybind_desc()),
            ]));

        let paragraph = Paragraph::new(self.text.as_str())
            .style(Theme::text())
            .wrap(Wrap { trim: true })
            .scroll((self.scroll, 0))
            .block(block);

        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }
}

/// Number of rows `text` takes when word-wrapped to `width` columns.
///
/// Measured by the same wrapper that draws the synopsis, so wide glyphs
/// count by display width.
pub fn wrapped_line_count(text: &str, width: u16) -> usize {
    if width == 0 {
        return 0;
    }
    Paragraph::new(text).wrap(Wrap { trim: true }).line_count(width)
}

/// Whether `text` overflows a `width` x `max_lines` area
pub fn is_truncated(text: &str, width: u16, max_lines: u16) -> bool {
    wrapped_line_count(text, width) > usize::from(max_lines)
}

//! Option selector widget
//!
//! A labelled field showing the current value. When clickable, Enter opens a
//! picker listing every option; choosing one hands `(index, value)` back to
//! the owner, which decides what the selection means.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph},
};

use crate::ui::Theme;

// =============================================================================
// List State
// =============================================================================

/// Cursor and scroll state for a list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Scroll offset for viewport
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    /// Move selection up
    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    /// Move selection down
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Jump to first item
    pub fn first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Jump to last item
    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Select an index, clamped to the list
    pub fn select(&mut self, index: usize) {
        self.selected = if self.len == 0 { 0 } else { index.min(self.len - 1) };
    }

    /// Update offset to keep selected item visible
    pub fn scroll_into_view(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + visible_height {
            self.offset = self.selected - visible_height + 1;
        }
    }
}

// =============================================================================
// OptionSelector
// =============================================================================

/// Selector field with a pop-up picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSelector {
    title: String,
    text: String,
    data: Vec<String>,
    default: Option<usize>,
    clickable: bool,
    picker: Option<ListState>,
}

impl OptionSelector {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: String::new(),
            data: Vec::new(),
            default: None,
            clickable: true,
            picker: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current display text of the field
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn data(&self) -> &[String] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Replace the options; closes the picker and forgets the default
    pub fn set_data(&mut self, data: Vec<String>) {
        self.data = data;
        self.default = None;
        self.picker = None;
    }

    /// Mark the option the picker opens on; ignored if out of range
    pub fn set_default(&mut self, index: usize) {
        if index < self.data.len() {
            self.default = Some(index);
        }
    }

    pub fn default_index(&self) -> Option<usize> {
        self.default
    }

    pub fn set_clickable(&mut self, clickable: bool) {
        self.clickable = clickable;
    }

    pub fn is_clickable(&self) -> bool {
        self.clickable
    }

    pub fn is_open(&self) -> bool {
        self.picker.is_some()
    }

    /// Open the picker on the default option. Returns false if not clickable.
    pub fn open(&mut self) -> bool {
        if !self.clickable {
            return false;
        }
        let mut state = ListState::new(self.data.len());
        state.select(self.default.unwrap_or(0));
        self.picker = Some(state);
        true
    }

    pub fn close(&mut self) {
        self.picker = None;
    }

    pub fn up(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            picker.up();
        }
    }

    pub fn down(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            picker.down();
        }
    }

    pub fn first(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            picker.first();
        }
    }

    pub fn last(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            picker.last();
        }
    }

    /// Index under the picker cursor
    pub fn cursor(&self) -> Option<usize> {
        self.picker.as_ref().map(|p| p.selected)
    }

    /// Confirm the option under the cursor and close the picker.
    ///
    /// The chosen option becomes the new default.
    pub fn choose(&mut self) -> Option<(usize, String)> {
        let picker = self.picker.take()?;
        let value = self.data.get(picker.selected)?.clone();
        self.default = Some(picker.selected);
        Some((picker.selected, value))
    }

    /// Render the field (title + current value)
    pub fn render_field(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused { Theme::border_focused() } else { Theme::border() })
            .title(Span::styled(format!(" {} ", self.title.to_uppercase()), Theme::title()));

        let marker = if self.clickable { " ▾" } else { "" };
        let line = Line::from(vec![
            Span::styled(self.text.clone(), Theme::selector_value(self.clickable)),
            Span::styled(marker, Theme::accent()),
        ]);

        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    /// Render the open picker centered in `area`
    pub fn render_picker(&mut self, frame: &mut Frame, area: Rect) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };

        let width = self
            .data
            .iter()
            .map(|d| d.chars().count() as u16)
            .max()
            .unwrap_or(0)
            .max(self.title.chars().count() as u16)
            .saturating_add(8)
            .max(20)
            .min(area.width);
        let height = (self.data.len() as u16).saturating_add(2).max(3).min(area.height);
        let popup = centered(area, width, height);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::border_focused())
            .style(Theme::overlay())
            .title(Span::styled(format!(" {} ", self.title), Theme::title()));

        frame.render_widget(Clear, popup);

        if self.data.is_empty() {
            let empty = Paragraph::new("Nothing to choose")
                .style(Theme::dimmed())
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, popup);
            return;
        }

        let visible = block.inner(popup).height as usize;
        picker.scroll_into_view(visible);

        let items: Vec<ListItem> = self
            .data
            .iter()
            .enumerate()
            .skip(picker.offset)
            .take(visible)
            .map(|(i, value)| {
                let is_selected = i == picker.selected;
                let marker = if is_selected { "▸ " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, if is_selected { Theme::accent() } else { Theme::dimmed() }),
                    Span::styled(
                        value.clone(),
                        if is_selected { Theme::list_item_selected() } else { Theme::text() },
                    ),
                ]))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), popup);
    }
}

/// A `width` x `height` rect centered in `area`
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(values: &[&str]) -> OptionSelector {
        let mut sel = OptionSelector::new("Quality");
        sel.set_data(values.iter().map(|v| v.to_string()).collect());
        sel
    }

    #[test]
    fn test_list_state_navigation() {
        let mut state = ListState::new(3);
        state.down();
        state.down();
        state.down();
        assert_eq!(state.selected, 2);
        state.up();
        assert_eq!(state.selected, 1);
        state.first();
        assert_eq!(state.selected, 0);
        state.last();
        assert_eq!(state.selected, 2);
    }

    #[test]
    fn test_list_state_empty() {
        let mut state = ListState::new(0);
        state.down();
        state.last();
        state.select(4);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_list_state_scroll_into_view() {
        let mut state = ListState::new(10);
        state.select(7);
        state.scroll_into_view(3);
        assert_eq!(state.offset, 5);
        state.select(1);
        state.scroll_into_view(3);
        assert_eq!(state.offset, 1);
    }

    #[test]
    fn test_open_starts_on_default() {
        let mut sel = selector(&["1080p", "480p", "720p"]);
        sel.set_default(2);
        assert!(sel.open());
        assert_eq!(sel.cursor(), Some(2));
    }

    #[test]
    fn test_choose_returns_value_and_closes() {
        let mut sel = selector(&["1080p", "480p", "720p"]);
        sel.open();
        sel.down();
        assert_eq!(sel.choose(), Some((1, "480p".to_string())));
        assert!(!sel.is_open());
        assert_eq!(sel.default_index(), Some(1));
    }

    #[test]
    fn test_not_clickable_refuses_to_open() {
        let mut sel = selector(&["en"]);
        sel.set_clickable(false);
        assert!(!sel.open());
        assert!(!sel.is_open());
        assert_eq!(sel.choose(), None);
    }

    #[test]
    fn test_choose_on_empty_data() {
        let mut sel = selector(&[]);
        assert!(sel.open());
        assert_eq!(sel.choose(), None);
    }

    #[test]
    fn test_set_default_out_of_range_ignored() {
        let mut sel = selector(&["a", "b"]);
        sel.set_default(5);
        assert_eq!(sel.default_index(), None);
    }

    #[test]
    fn test_set_data_closes_picker() {
        let mut sel = selector(&["a", "b"]);
        sel.set_default(1);
        sel.open();
        sel.set_data(vec!["c".into()]);
        assert!(!sel.is_open());
        assert_eq!(sel.default_index(), None);
    }

    #[test]
    fn test_centered() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered(area, 20, 10), Rect::new(40, 15, 20, 10));
        assert_eq!(centered(area, 200, 10).width, 100);
    }
}

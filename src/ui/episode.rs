//! Episode dialog rendering
//!
//! Draws an [`EpisodeDialog`] as a centered card: title, air date, poster,
//! synopsis, the two selectors and the play button. Open pickers and the
//! synopsis overlay are drawn on top.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::dialog::{EpisodeDialog, Focus};
use crate::ui::selector::centered;
use crate::ui::Theme;

const DIALOG_WIDTH: u16 = 72;
const DIALOG_HEIGHT: u16 = 24;

/// Render the dialog into `area`.
///
/// Takes `&mut` because layout decides whether "read more" is offered.
pub fn render(frame: &mut Frame, area: Rect, dialog: &mut EpisodeDialog) {
    let card = centered(area, DIALOG_WIDTH, DIALOG_HEIGHT);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(dialog.color().to_color()))
        .style(Style::default().bg(Theme::BACKGROUND))
        .title(Span::styled(format!(" {} ", dialog.show().title), Theme::title()));

    let inner = block.inner(card);
    frame.render_widget(Clear, card);
    frame.render_widget(block, card);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Aired
            Constraint::Length(1), // Poster
            Constraint::Length(1),
            Constraint::Min(2),    // Synopsis
            Constraint::Length(1), // Read more
            Constraint::Length(3), // Selectors
            Constraint::Length(3), // Play
            Constraint::Length(1), // Keybinds
        ])
        .split(inner);

    render_heading(frame, chunks[0], chunks[1], dialog);
    render_poster(frame, chunks[2], dialog);

    dialog.set_synopsis_layout(chunks[4].width, chunks[4].height);
    let synopsis = Paragraph::new(dialog.episode().overview.as_str())
        .style(Theme::text())
        .wrap(Wrap { trim: true });
    frame.render_widget(synopsis, chunks[4]);

    if dialog.read_more_visible() {
        let style = if dialog.focus() == Focus::ReadMore {
            Theme::list_item_selected()
        } else {
            Theme::secondary()
        };
        let read_more = Paragraph::new(Span::styled(" Read more ", style)).alignment(Alignment::Right);
        frame.render_widget(read_more, chunks[5]);
    }

    let selectors = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[6]);
    dialog
        .quality_selector()
        .render_field(frame, selectors[0], dialog.focus() == Focus::Quality);
    dialog
        .subtitle_selector()
        .render_field(frame, selectors[1], dialog.focus() == Focus::Subtitles);

    render_play_button(frame, chunks[7], dialog);
    render_keybinds(frame, chunks[8], dialog);

    // Overlays, at most one is open at a time
    dialog.quality_selector_mut().render_picker(frame, area);
    dialog.subtitle_selector_mut().render_picker(frame, area);
    if let Some(overlay) = dialog.synopsis() {
        overlay.render(frame, area);
    }
}

fn render_heading(frame: &mut Frame, title_area: Rect, aired_area: Rect, dialog: &EpisodeDialog) {
    let episode = dialog.episode();

    let title = Line::from(vec![
        Span::styled(
            format!("S{:02}E{:02} ", episode.season, episode.episode),
            Theme::accent(),
        ),
        Span::styled(episode.title.clone(), Theme::title()),
    ]);
    frame.render_widget(Paragraph::new(title), title_area);

    let aired = Paragraph::new(Span::styled(dialog.aired_text(), Theme::dimmed()));
    frame.render_widget(aired, aired_area);
}

fn render_poster(frame: &mut Frame, area: Rect, dialog: &EpisodeDialog) {
    let poster = dialog.poster();
    let line = match (poster.loads(), poster.url()) {
        (0, _) => Line::from(Span::styled("Loading artwork...", Theme::loading())),
        (_, Some(url)) => Line::from(vec![
            Span::styled("Poster ", Theme::dimmed()),
            Span::styled(url.to_string(), Theme::secondary()),
        ]),
        (_, None) => Line::from(Span::styled("No artwork", Theme::dimmed())),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_play_button(frame: &mut Frame, area: Rect, dialog: &EpisodeDialog) {
    let focused = dialog.focus() == Focus::Play;
    let quality = dialog.selected_quality();
    let label = match dialog.episode().torrents.get(quality) {
        Some(torrent) if torrent.size_bytes.is_some() => {
            format!("▶ PLAY {}  {}", quality, torrent.format_size())
        }
        _ => format!("▶ PLAY {}", quality),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if focused { BorderType::Double } else { BorderType::Rounded })
        .border_style(if focused { Theme::border_focused() } else { Theme::border() });

    let button = Paragraph::new(Span::raw(label))
        .style(Theme::play_button(dialog.color()))
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(button, area);
}

fn render_keybinds(frame: &mut Frame, area: Rect, dialog: &EpisodeDialog) {
    let mut spans = vec![
        Span::styled("[Tab]", Theme::keybind()),
        Span::styled(" Focus  ", Theme::keybind_desc()),
        Span::styled("[Enter]", Theme::keybind()),
        Span::styled(" Select  ", Theme::keybind_desc()),
        Span::styled("[p]", Theme::keybind()),
        Span::styled(" Play  ", Theme::keybind_desc()),
    ];
    if dialog.read_more_visible() {
        spans.push(Span::styled("[r]", Theme::keybind()));
        spans.push(Span::styled(" Read more  ", Theme::keybind_desc()));
    }
    spans.push(Span::styled("[q]", Theme::keybind()));
    spans.push(Span::styled(" Close", Theme::keybind_desc()));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

//! Playlist drawer

use crate::app::View;
use crate::tui::{theme::Palette, truncate_str};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

pub fn render(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let palette = Palette::DEFAULT;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .title(format!(" Playlist ({}) ", view.playlist.len()))
        .title_style(Style::default().fg(palette.fg_primary));
    let width = block.inner(area).width.saturating_sub(2) as usize;

    let current = view.transport.track_index;
    let items: Vec<ListItem> = view
        .playlist
        .tracks()
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let marker = if i == current { "▶ " } else { "  " };
            let style = if i == current {
                Style::default().fg(palette.accent)
            } else {
                Style::default().fg(palette.fg_primary)
            };
            ListItem::new(vec![
                Line::from(Span::styled(
                    truncate_str(&format!("{marker}{}", track.name), width),
                    style,
                )),
                Line::from(Span::styled(
                    truncate_str(&format!("  {}", track.artist), width),
                    Style::default().fg(palette.fg_secondary),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default().with_selected(Some(view.ui.drawer.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

//! Lyrics panel: scrolls so the active line sits in the middle.

use crate::app::View;
use crate::lyrics::LyricsStatus;
use crate::tui::{theme::Palette, truncate_str};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let palette = Palette::DEFAULT;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(" Lyrics ")
        .title_style(Style::default().fg(palette.fg_secondary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lyrics = view.lyrics;
    let stale = lyrics.track_index != view.transport.track_index;
    if stale || lyrics.lines.is_empty() {
        let message = match lyrics.status {
            _ if stale => "Loading lyrics...",
            LyricsStatus::Loading => "Loading lyrics...",
            _ => "No lyrics",
        };
        let p = Paragraph::new(Span::styled(message, Style::default().fg(palette.fg_dim)))
            .alignment(Alignment::Center);
        frame.render_widget(p, centered_row(inner));
        return;
    }

    let active = lyrics.active(view.transport.current_time);
    let height = inner.height as usize;
    let start = scroll_start(lyrics.lines.len(), active, height);
    let width = inner.width as usize;

    let lines: Vec<Line> = lyrics
        .lines
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(i, line)| {
            let style = if Some(i) == active {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.fg_dim)
            };
            Line::from(Span::styled(truncate_str(&line.text, width), style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// First visible line so that `active` lands mid-panel.
fn scroll_start(len: usize, active: Option<usize>, height: usize) -> usize {
    if len <= height {
        return 0;
    }
    let anchor = active.unwrap_or(0);
    anchor.saturating_sub(height / 2).min(len - height)
}

fn centered_row(area: Rect) -> Rect {
    Rect {
        y: area.y + area.height / 2,
        height: area.height.min(1),
        ..area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_start() {
        assert_eq!(scroll_start(5, Some(4), 10), 0);
        assert_eq!(scroll_start(100, None, 10), 0);
        assert_eq!(scroll_start(100, Some(3), 10), 0);
        assert_eq!(scroll_start(100, Some(50), 10), 45);
        assert_eq!(scroll_start(100, Some(99), 10), 90);
    }
}

//! Now Playing bar: track, progress and transport settings

use crate::app::View;
use crate::app::state::ToastKind;
use crate::transport::PlayMode;
use crate::tui::{format_time, theme::Palette, truncate_str};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let palette = Palette::DEFAULT;
    let transport = view.transport;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(" Player ")
        .title_style(Style::default().fg(palette.fg_secondary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let padded = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner)[1];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title - artist
            Constraint::Length(1), // Progress bar
            Constraint::Length(1), // Time + controls
            Constraint::Length(1), // Current lyric line
            Constraint::Min(0),    // Toast
        ])
        .split(padded);

    let width = padded.width as usize;

    let (name, artist) = view
        .playlist
        .get(transport.track_index)
        .map(|t| (t.name.as_str(), t.artist.as_str()))
        .unwrap_or(("Not playing", ""));
    let title = Line::from(vec![
        Span::styled(
            truncate_str(name, width),
            Style::default()
                .fg(palette.fg_primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", truncate_str(artist, width.saturating_sub(name.chars().count() + 2))),
            Style::default().fg(palette.fg_secondary),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), rows[0]);

    let ratio = if transport.duration > 0.0 {
        (transport.current_time / transport.duration).clamp(0.0, 1.0)
    } else {
        0.0
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            progress_bar(width, ratio),
            Style::default().fg(palette.accent),
        )),
        rows[1],
    );

    let play_icon = if transport.is_playing { "⏸" } else { "▶" };
    let mode = match transport.play_mode {
        PlayMode::Sequential => "⟳ seq",
        PlayMode::LoopOne => "⟲ one",
        PlayMode::Shuffle => "⤮ shuf",
    };
    let dim = Style::default().fg(palette.fg_secondary);
    let controls = Line::from(vec![
        Span::styled(
            format!(
                "{} / {}",
                format_time(transport.current_time),
                format_time(transport.duration)
            ),
            dim,
        ),
        Span::raw("   "),
        Span::styled("⏮ ", dim),
        Span::styled(play_icon, Style::default().fg(palette.accent)),
        Span::styled(" ⏭", dim),
        Span::raw("   "),
        Span::styled(mode, dim),
        Span::raw("   "),
        Span::styled(format!("{}x", transport.playback_rate), dim),
        Span::raw("   "),
        Span::styled(
            format!("vol {}%", (transport.volume * 100.0).round() as u32),
            dim,
        ),
    ]);
    frame.render_widget(Paragraph::new(controls), rows[2]);

    // Compact prev / current / next strip.
    let window = view.lyrics.window(transport.current_time);
    let text_at = |i: Option<usize>| i.and_then(|i| view.lyrics.lines.get(i)).map(|l| l.text.as_str());
    let mut strip = vec![Span::styled(
        text_at(window.current).unwrap_or("..."),
        Style::default().fg(palette.accent),
    )];
    if let Some(next) = text_at(window.next) {
        strip.push(Span::styled(format!("  · {next}"), Style::default().fg(palette.fg_dim)));
    }
    frame.render_widget(Paragraph::new(Line::from(strip)), rows[3]);

    if let Some(toast) = &view.ui.toast
        && !toast.is_expired()
    {
        let color = match toast.kind {
            ToastKind::Info => palette.fg_secondary,
            ToastKind::Error => palette.error,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                truncate_str(&toast.message, width),
                Style::default().fg(color),
            )),
            rows[4],
        );
    }
}

fn progress_bar(width: usize, ratio: f64) -> String {
    if width < 3 {
        return String::new();
    }

    let filled = ((width - 1) as f64 * ratio).round() as usize;
    let empty = width.saturating_sub(filled + 1);

    let mut bar = String::with_capacity(width * 3);
    bar.push_str(&"━".repeat(filled));
    bar.push('●');
    bar.push_str(&"─".repeat(empty));
    bar
}

//! Root layout
//!
//! ┌───────────────────────────────────────────┐
//! │ Revelation's Music                        │
//! ├───────────────────────────────────────────┤
//! │                 Lyrics                    │
//! ├───────────────────────────────────────────┤
//! │                 Player                    │
//! └───────────────────────────────────────────┘
//! The playlist drawer overlays the right side when open.

use crate::app::View;
use crate::tui::theme::Palette;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use super::{lyrics, now_playing, playlist};

const DRAWER_WIDTH: u16 = 40;

pub fn render(frame: &mut Frame, view: &View<'_>) {
    let palette = Palette::DEFAULT;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Lyrics
            Constraint::Length(7), // Player
        ])
        .split(frame.area());

    let header = Line::from(Span::styled(
        " Revelation's Music",
        Style::default()
            .fg(palette.fg_primary)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(header), rows[0]);

    lyrics::render(frame, view, rows[1]);
    now_playing::render(frame, view, rows[2]);

    if view.ui.drawer.open {
        let area = drawer_area(rows[1].union(rows[2]));
        frame.render_widget(Clear, area);
        playlist::render(frame, view, area);
    }
}

fn drawer_area(area: Rect) -> Rect {
    let width = DRAWER_WIDTH.min(area.width);
    Rect {
        x: area.x + area.width - width,
        y: area.y,
        width,
        height: area.height,
    }
}

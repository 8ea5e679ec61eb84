//! Synchronized lyrics
//!
//! This module provides:
//! - LRC parser producing timed lines
//! - Active-line resolution for a playback position
//! - A client that fetches lyric text from HTTP(S) or local sources

pub mod parser;
pub mod resolver;
pub mod source;

pub use parser::parse;
pub use resolver::{LyricWindow, resolve_active};
pub use source::LyricsClient;

pub const NO_LYRICS_PROVIDED: &str = "No lyrics provided";
pub const LYRICS_UNAVAILABLE: &str = "Lyrics unavailable";

/// A single line of lyrics with its start time
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    /// Seconds from the start of the track
    pub time: f64,
    pub text: String,
}

impl LyricLine {
    pub fn new(time: f64, text: String) -> Self {
        Self { time, text }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricsStatus {
    Loading,
    Loaded,
    /// The track has no lyrics source.
    NotProvided,
    /// The source could not be fetched.
    Unavailable,
}

/// The lyric lines of one track load.
#[derive(Debug, Clone)]
pub struct LyricsState {
    pub track_index: usize,
    pub status: LyricsStatus,
    pub lines: Vec<LyricLine>,
}

impl LyricsState {
    pub fn loading(track_index: usize) -> Self {
        Self {
            track_index,
            status: LyricsStatus::Loading,
            lines: Vec::new(),
        }
    }

    pub fn placeholder(track_index: usize, status: LyricsStatus) -> Self {
        let message = match status {
            LyricsStatus::NotProvided => NO_LYRICS_PROVIDED,
            _ => LYRICS_UNAVAILABLE,
        };
        Self {
            track_index,
            status,
            lines: vec![LyricLine::new(0.0, message.to_string())],
        }
    }

    pub fn window(&self, t: f64) -> LyricWindow {
        LyricWindow::at(&self.lines, t)
    }

    pub fn active(&self, t: f64) -> Option<usize> {
        resolve_active(&self.lines, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_distinct() {
        let none = LyricsState::placeholder(0, LyricsStatus::NotProvided);
        let failed = LyricsState::placeholder(0, LyricsStatus::Unavailable);
        assert_eq!(none.lines.len(), 1);
        assert_eq!(failed.lines.len(), 1);
        assert_eq!(none.lines[0].time, 0.0);
        assert_ne!(none.lines[0].text, failed.lines[0].text);
        assert_eq!(none.active(0.0), Some(0));
    }

    #[test]
    fn test_loading_is_empty() {
        let state = LyricsState::loading(2);
        assert_eq!(state.status, LyricsStatus::Loading);
        assert!(state.lines.is_empty());
        assert_eq!(state.active(10.0), None);
    }
}

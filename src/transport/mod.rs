//! Transport state machine
//!
//! Owns the playback state and the engine handle. Every mutation goes through
//! one of the command methods below; everything else reads `state()`.

use crate::player::PlaybackEngine;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// `prev()` restarts the current track instead once playback is past this.
pub const RESTART_THRESHOLD_SECS: f64 = 10.0;
pub const DEFAULT_VOLUME: f64 = 0.7;
pub const RATE_PRESETS: [f64; 5] = [0.75, 1.0, 1.25, 1.5, 2.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    #[default]
    Sequential,
    LoopOne,
    Shuffle,
}

impl PlayMode {
    pub fn next(self) -> Self {
        match self {
            PlayMode::Sequential => PlayMode::LoopOne,
            PlayMode::LoopOne => PlayMode::Shuffle,
            PlayMode::Shuffle => PlayMode::Sequential,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayMode::Sequential => "Sequential",
            PlayMode::LoopOne => "Loop one",
            PlayMode::Shuffle => "Shuffle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportState {
    pub track_index: usize,
    pub is_playing: bool,
    pub current_time: f64,
    /// 0 until the engine reports metadata for the current track.
    pub duration: f64,
    pub volume: f64,
    pub playback_rate: f64,
    pub play_mode: PlayMode,
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            track_index: 0,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: DEFAULT_VOLUME,
            playback_rate: 1.0,
            play_mode: PlayMode::Sequential,
        }
    }
}

pub struct Transport<E> {
    state: TransportState,
    track_count: usize,
    engine: E,
    rng: StdRng,
}

impl<E: PlaybackEngine> Transport<E> {
    pub fn new(engine: E, track_count: usize, initial: TransportState) -> Self {
        Self::with_rng(engine, track_count, initial, StdRng::from_os_rng())
    }

    pub fn with_rng(engine: E, track_count: usize, initial: TransportState, rng: StdRng) -> Self {
        let mut state = initial;
        state.volume = state.volume.clamp(0.0, 1.0);
        if !(state.playback_rate.is_finite() && state.playback_rate > 0.0) {
            state.playback_rate = 1.0;
        }
        state.track_index = state.track_index.min(track_count.saturating_sub(1));
        Self {
            state,
            track_count,
            engine,
            rng,
        }
    }

    pub fn state(&self) -> &TransportState {
        &self.state
    }

    #[cfg(test)]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[cfg(test)]
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn play_pause(&mut self) {
        let result = if self.state.is_playing {
            self.engine.pause()
        } else {
            self.engine.play()
        };
        if let Err(e) = result {
            tracing::warn!(error = %format!("{e:#}"), "play/pause failed");
        }
        self.state.is_playing = !self.state.is_playing;
    }

    /// Jump to `seconds`. The caller keeps it within the track.
    pub fn seek(&mut self, seconds: f64) {
        self.state.current_time = seconds;
        if let Err(e) = self.engine.set_current_time(seconds) {
            tracing::warn!(error = %format!("{e:#}"), seconds, "seek failed");
        }
    }

    /// Advance according to the play mode. Returns the new index when the
    /// track changed.
    pub fn next(&mut self) -> Option<usize> {
        if self.track_count == 0 {
            return None;
        }
        let current = self.state.track_index;
        let next = if self.state.play_mode == PlayMode::Shuffle {
            let mut candidate = self.rng.random_range(0..self.track_count);
            while candidate == current && self.track_count > 1 {
                candidate = self.rng.random_range(0..self.track_count);
            }
            candidate
        } else {
            (current + 1) % self.track_count
        };
        self.move_to(next)
    }

    /// Restart the current track when past the threshold, otherwise go back.
    pub fn prev(&mut self) -> Option<usize> {
        if self.state.current_time > RESTART_THRESHOLD_SECS {
            self.seek(0.0);
            return None;
        }
        if self.track_count == 0 {
            return None;
        }
        let current = self.state.track_index;
        let prev = if self.state.play_mode == PlayMode::Shuffle {
            self.rng.random_range(0..self.track_count)
        } else {
            (current + self.track_count - 1) % self.track_count
        };
        self.move_to(prev)
    }

    /// Pick a track from the playlist and start playing it.
    pub fn select_track(&mut self, index: usize) -> Option<usize> {
        if index >= self.track_count {
            return None;
        }
        let was_playing = self.state.is_playing;
        self.state.is_playing = true;
        let changed = self.move_to(index);
        if changed.is_none()
            && !was_playing
            && let Err(e) = self.engine.play()
        {
            tracing::warn!(error = %format!("{e:#}"), "resume failed");
        }
        changed
    }

    pub fn toggle_mode(&mut self) -> PlayMode {
        self.state.play_mode = self.state.play_mode.next();
        self.state.play_mode
    }

    /// Natural end of media.
    pub fn on_track_end(&mut self) -> Option<usize> {
        if self.state.play_mode == PlayMode::LoopOne {
            self.seek(0.0);
            if let Err(e) = self.engine.play() {
                tracing::warn!(error = %format!("{e:#}"), "replay failed");
            }
            return None;
        }
        self.next()
    }

    pub fn on_metadata_loaded(&mut self, duration: f64) {
        self.state.duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
        if let Err(e) = self.engine.set_playback_rate(self.state.playback_rate) {
            tracing::warn!(error = %format!("{e:#}"), "apply playback rate failed");
        }
        if self.state.is_playing
            && let Err(e) = self.engine.play()
        {
            tracing::warn!(error = %format!("{e:#}"), "play after metadata failed");
        }
    }

    /// Point the engine at a new source. Progress is reset before anything
    /// is known about the new track, and volume and rate are applied again
    /// because swapping the source resets them.
    pub fn load_track(&mut self, url: &str) {
        self.state.current_time = 0.0;
        self.state.duration = 0.0;

        if let Err(e) = self.engine.load(url) {
            tracing::warn!(error = %format!("{e:#}"), url, "load failed");
        }
        self.apply_levels();
        if self.state.is_playing
            && let Err(e) = self.engine.play()
        {
            tracing::warn!(error = %format!("{e:#}"), url, "autoplay blocked or file not found");
        }
    }

    pub fn set_volume(&mut self, volume: f64) {
        if volume.is_nan() {
            return;
        }
        self.state.volume = volume.clamp(0.0, 1.0);
        if let Err(e) = self.engine.set_volume(self.state.volume) {
            tracing::warn!(error = %format!("{e:#}"), "set volume failed");
        }
    }

    pub fn toggle_mute(&mut self) {
        let volume = if self.state.volume == 0.0 {
            DEFAULT_VOLUME
        } else {
            0.0
        };
        self.set_volume(volume);
    }

    pub fn set_playback_rate(&mut self, rate: f64) {
        if !(rate.is_finite() && rate > 0.0) {
            tracing::debug!(rate, "ignoring invalid playback rate");
            return;
        }
        self.state.playback_rate = rate;
        if let Err(e) = self.engine.set_playback_rate(rate) {
            tracing::warn!(error = %format!("{e:#}"), "set playback rate failed");
        }
    }

    /// Step through `RATE_PRESETS`; `up` picks the next faster preset.
    pub fn cycle_playback_rate(&mut self, up: bool) {
        let rate = self.state.playback_rate;
        let preset = if up {
            RATE_PRESETS.iter().copied().find(|&r| r > rate)
        } else {
            RATE_PRESETS.iter().rev().copied().find(|&r| r < rate)
        };
        if let Some(r) = preset {
            self.set_playback_rate(r);
        }
    }

    /// One polling step. Copies the engine position while playback is
    /// advancing; keeps the last value through loading gaps.
    pub fn tick(&mut self) {
        if !self.state.is_playing {
            return;
        }
        if let Some(pos) = self.engine.position() {
            let pos = pos.max(0.0);
            self.state.current_time = if self.state.duration > 0.0 {
                pos.min(self.state.duration)
            } else {
                pos
            };
        }
    }

    pub fn on_engine_error(&mut self, reason: &str) {
        tracing::warn!(track = self.state.track_index, reason, "playback engine error");
    }

    fn move_to(&mut self, index: usize) -> Option<usize> {
        if index == self.state.track_index {
            return None;
        }
        self.state.track_index = index;
        Some(index)
    }

    fn apply_levels(&mut self) {
        if let Err(e) = self.engine.set_volume(self.state.volume) {
            tracing::warn!(error = %format!("{e:#}"), "apply volume failed");
        }
        if let Err(e) = self.engine.set_playback_rate(self.state.playback_rate) {
            tracing::warn!(error = %format!("{e:#}"), "apply playback rate failed");
        }
    }
}

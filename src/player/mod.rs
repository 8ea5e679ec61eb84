//! Playback engine boundary.
//!
//! The transport drives an engine through these commands; the engine reports
//! back through `PlayerEvent`s on the app event channel.

pub mod mpv;

pub use mpv::MpvEngine;

pub trait PlaybackEngine {
    fn load(&mut self, url: &str) -> anyhow::Result<()>;
    fn play(&mut self) -> anyhow::Result<()>;
    fn pause(&mut self) -> anyhow::Result<()>;
    fn set_current_time(&mut self, seconds: f64) -> anyhow::Result<()>;
    /// `volume` is in [0, 1].
    fn set_volume(&mut self, volume: f64) -> anyhow::Result<()>;
    fn set_playback_rate(&mut self, rate: f64) -> anyhow::Result<()>;
    /// Live position, only while playback is actually advancing.
    fn position(&self) -> Option<f64>;
}

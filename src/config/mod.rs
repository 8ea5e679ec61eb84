use crate::playlist::Track;
use crate::transport::{DEFAULT_VOLUME, PlayMode};
use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod defaults;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Inline catalog; `--playlist` replaces it.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub playlist: Vec<Track>,
    pub player: PlayerConfig,
    pub lyrics: LyricsConfig,
    pub ui: UiConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// mpv audio device name (see `mpv --audio-device=help`)
    pub audio_device: Option<String>,
    /// Initial volume (0.0-1.0)
    pub volume: f64,
    pub playback_rate: f64,
    pub play_mode: PlayMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Position polling and redraw rate
    pub fps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            playlist: Vec::new(),
            player: PlayerConfig::default(),
            lyrics: LyricsConfig::default(),
            ui: UiConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            audio_device: None,
            volume: DEFAULT_VOLUME,
            playback_rate: 1.0,
            play_mode: PlayMode::Sequential,
        }
    }
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: format!("revelation/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { fps: 30 }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let data_dir = project_dirs()
            .map(|p| p.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("revelation"));
        Self { data_dir }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "revelation", "revelation")
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = project_dirs().context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

/// Load the config, writing the defaults to disk on first run.
pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
        }
        let cfg = Config::default();
        fs::write(&path, defaults::render(&cfg)?)
            .with_context(|| format!("write {}", path.display()))?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let raw = r#"
[player]
volume = 0.3
play_mode = "shuffle"

[[playlist]]
name = "Song1"
artist = "Artist1"
audio_url = "song1.mp3"
lyrics_url = "song1.lrc"
"#;
        let cfg: Config = toml::from_str(raw).unwrap();
        assert_eq!(cfg.player.volume, 0.3);
        assert_eq!(cfg.player.play_mode, PlayMode::Shuffle);
        assert_eq!(cfg.player.playback_rate, 1.0);
        assert_eq!(cfg.lyrics.timeout_secs, 10);
        assert_eq!(cfg.ui.fps, 30);
        assert_eq!(cfg.playlist.len(), 1);
    }

    #[test]
    fn test_load_writes_default_file() {
        let dir = std::env::temp_dir().join(format!("revelation-cfg-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = fs::remove_file(&path);

        let cfg = load(Some(&path)).unwrap();
        assert!(path.exists());
        assert!(cfg.playlist.is_empty());

        let again = load(Some(&path)).unwrap();
        assert_eq!(again.player.volume, cfg.player.volume);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let dir = std::env::temp_dir().join(format!("revelation-badcfg-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[player]\nvolume = \"loud\"\n").unwrap();
        assert!(load(Some(&path)).is_err());
        let _ = fs::remove_dir_all(&dir);
    }
}

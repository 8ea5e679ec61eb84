use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One playable song in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub artist: String,
    pub audio_url: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    /// LRC source; absent means the track has no lyrics.
    #[serde(default)]
    pub lyrics_url: Option<String>,
}

/// Static, ordered song catalog supplied at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(default)]
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Load a `[[tracks]]` TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parse {}", path.display()))
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn make_track(name: &str, lyrics_url: Option<&str>) -> Track {
    Track {
        name: name.to_string(),
        artist: "Artist".to_string(),
        audio_url: format!("{name}.mp3"),
        cover_url: None,
        lyrics_url: lyrics_url.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml() {
        let raw = r#"
[[tracks]]
name = "Song1"
artist = "Artist1"
audio_url = "https://example.com/1.mp3"
cover_url = "https://example.com/1.jpg"
lyrics_url = "https://example.com/1.lrc"

[[tracks]]
name = "Song2"
artist = "Artist2"
audio_url = "/music/2.flac"
"#;
        let playlist: Playlist = toml::from_str(raw).unwrap();
        assert_eq!(playlist.len(), 2);
        assert_eq!(
            playlist.get(0).unwrap().lyrics_url.as_deref(),
            Some("https://example.com/1.lrc")
        );
        assert!(playlist.get(1).unwrap().lyrics_url.is_none());
        assert!(playlist.get(2).is_none());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let path = std::env::temp_dir().join("revelation-missing-playlist.toml");
        assert!(Playlist::load(&path).is_err());
    }

    #[test]
    fn test_empty() {
        assert!(Playlist::default().is_empty());
        assert_eq!(Playlist::new(vec![make_track("a", None)]).len(), 1);
    }
}

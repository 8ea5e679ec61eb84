use super::Config;
use anyhow::Context;

const PLAYLIST_EXAMPLE: &str = r#"
# Songs are listed as [[playlist]] entries (or pass --playlist FILE with [[tracks]]):
#
# [[playlist]]
# name = "Song1's Name"
# artist = "Song1's Artist"
# audio_url = "https://example.com/song1.mp3"
# cover_url = "https://example.com/song1.jpg"
# lyrics_url = "https://example.com/song1.lrc"
"#;

/// Default config file contents.
pub fn render(cfg: &Config) -> anyhow::Result<String> {
    let mut raw = toml::to_string_pretty(cfg).context("serialize default config")?;
    raw.push_str(PLAYLIST_EXAMPLE);
    Ok(raw)
}

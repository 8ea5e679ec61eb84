#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Player(PlayerEvent),
    Lyrics(LyricsEvent),
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Resize,
}

#[derive(Debug, Clone)]
pub enum PlayerEvent {
    MetadataLoaded { duration: f64 },
    Ended,
    Error(String),
}

/// Completion of a lyric fetch, tagged with the load it was issued for.
#[derive(Debug, Clone)]
pub struct LyricsEvent {
    pub generation: u64,
    pub track_index: usize,
    pub result: Result<String, String>,
}

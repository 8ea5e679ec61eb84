#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Resize,

    // Transport
    PlayPause,
    Next,
    Prev,
    ToggleMode,
    SeekBy(f64),
    SeekToPrevLine,
    SeekToNextLine,
    VolumeUp,
    VolumeDown,
    ToggleMute,
    RateUp,
    RateDown,

    // Playlist drawer
    TogglePlaylist,
    PlaylistUp,
    PlaylistDown,
    PlaylistActivate,
}

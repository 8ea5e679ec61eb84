pub mod lyrics;
pub mod now_playing;
pub mod playlist;
pub mod root;

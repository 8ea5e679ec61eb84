//! Track changes: reset the transport onto the new source and load its lyrics.
//!
//! Every lyric load gets a new generation. The previous fetch task is
//! aborted, and a completion that still slips through is dropped unless its
//! generation is the current one.

use crate::app::events::{Event, LyricsEvent};
use crate::lyrics::{self, LyricsClient, LyricsState, LyricsStatus};
use crate::player::PlaybackEngine;
use crate::playlist::Playlist;
use crate::transport::Transport;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct TrackLoader {
    client: LyricsClient,
    generation: u64,
    lyrics: LyricsState,
    in_flight: Option<JoinHandle<()>>,
}

impl TrackLoader {
    pub fn new(client: LyricsClient) -> Self {
        Self {
            client,
            generation: 0,
            lyrics: LyricsState::loading(0),
            in_flight: None,
        }
    }

    pub fn lyrics(&self) -> &LyricsState {
        &self.lyrics
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Switch to the transport's current track.
    pub fn begin<E: PlaybackEngine>(
        &mut self,
        playlist: &Playlist,
        transport: &mut Transport<E>,
        tx: &mpsc::Sender<Event>,
    ) {
        let index = transport.state().track_index;
        let Some(track) = playlist.get(index) else {
            tracing::warn!(track = index, "track index outside playlist");
            return;
        };
        tracing::info!(track = index, name = %track.name, "track change");

        transport.load_track(&track.audio_url);

        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
        self.generation += 1;
        let generation = self.generation;

        let Some(source) = track.lyrics_url.clone() else {
            self.lyrics = LyricsState::placeholder(index, LyricsStatus::NotProvided);
            return;
        };
        self.lyrics = LyricsState::loading(index);

        let client = self.client.clone();
        let tx = tx.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let result = client.fetch(&source).await.map_err(|e| format!("{e:#}"));
            let _ = tx
                .send(Event::Lyrics(LyricsEvent {
                    generation,
                    track_index: index,
                    result,
                }))
                .await;
        }));
    }

    /// Apply a finished fetch. Returns false when the result was stale.
    pub fn apply(&mut self, ev: LyricsEvent) -> bool {
        if ev.generation != self.generation {
            tracing::debug!(
                generation = ev.generation,
                current = self.generation,
                track = ev.track_index,
                "discarding stale lyrics"
            );
            return false;
        }
        self.in_flight = None;

        self.lyrics = match ev.result {
            Ok(text) => {
                let mut lines = lyrics::parse(&text);
                // Stable, so equal timestamps keep their source order.
                lines.sort_by(|a, b| a.time.total_cmp(&b.time));
                tracing::debug!(track = ev.track_index, lines = lines.len(), "lyrics loaded");
                LyricsState {
                    track_index: ev.track_index,
                    status: LyricsStatus::Loaded,
                    lines,
                }
            }
            Err(e) => {
                tracing::warn!(track = ev.track_index, error = %e, "failed to load lyrics");
                LyricsState::placeholder(ev.track_index, LyricsStatus::Unavailable)
            }
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::fake::{Command, FakeEngine};
    use crate::playlist::make_track;
    use crate::transport::TransportState;
    use rand::SeedableRng;
    use std::time::Duration;

    fn setup(playlist: &Playlist) -> (TrackLoader, Transport<FakeEngine>) {
        let client = LyricsClient::new("revelation-test", Duration::from_secs(1)).unwrap();
        let transport = Transport::with_rng(
            FakeEngine::default(),
            playlist.len(),
            TransportState::default(),
            rand::rngs::StdRng::seed_from_u64(1),
        );
        (TrackLoader::new(client), transport)
    }

    fn temp_lrc(name: &str, body: &str) -> String {
        let path = std::env::temp_dir().join(format!(
            "revelation-loader-{}-{name}.lrc",
            std::process::id()
        ));
        std::fs::write(&path, body).unwrap();
        path.display().to_string()
    }

    #[tokio::test]
    async fn test_missing_source_uses_placeholder() {
        let playlist = Playlist::new(vec![make_track("a", None)]);
        let (mut loader, mut transport) = setup(&playlist);
        let (tx, _rx) = mpsc::channel(8);

        loader.begin(&playlist, &mut transport, &tx);
        assert_eq!(loader.lyrics().status, LyricsStatus::NotProvided);
        assert_eq!(loader.lyrics().lines[0].text, lyrics::NO_LYRICS_PROVIDED);
        assert_eq!(
            transport.engine().commands[0],
            Command::Load("a.mp3".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_then_apply() {
        let src = temp_lrc("apply", "[00:03.00]second\n[00:01.00]first\n");
        let playlist = Playlist::new(vec![make_track("a", Some(&src))]);
        let (mut loader, mut transport) = setup(&playlist);
        let (tx, mut rx) = mpsc::channel(8);

        loader.begin(&playlist, &mut transport, &tx);
        assert_eq!(loader.lyrics().status, LyricsStatus::Loading);
        assert!(loader.lyrics().lines.is_empty());

        let Some(Event::Lyrics(ev)) = rx.recv().await else {
            panic!("expected lyrics event");
        };
        assert!(loader.apply(ev));
        let state = loader.lyrics();
        assert_eq!(state.status, LyricsStatus::Loaded);
        assert_eq!(state.lines[0].text, "first");
        assert_eq!(state.lines[1].text, "second");

        let _ = std::fs::remove_file(&src);
    }

    #[tokio::test]
    async fn test_failed_fetch_uses_unavailable_placeholder() {
        let missing = std::env::temp_dir().join("revelation-loader-missing.lrc");
        let playlist = Playlist::new(vec![make_track("a", Some(&missing.display().to_string()))]);
        let (mut loader, mut transport) = setup(&playlist);
        let (tx, mut rx) = mpsc::channel(8);

        loader.begin(&playlist, &mut transport, &tx);
        let Some(Event::Lyrics(ev)) = rx.recv().await else {
            panic!("expected lyrics event");
        };
        assert!(ev.result.is_err());
        assert!(loader.apply(ev));
        assert_eq!(loader.lyrics().status, LyricsStatus::Unavailable);
        assert_eq!(loader.lyrics().lines[0].text, lyrics::LYRICS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let playlist = Playlist::new(vec![
            make_track("a", Some("a.lrc")),
            make_track("b", Some("b.lrc")),
        ]);
        let (mut loader, mut transport) = setup(&playlist);
        let (tx, _rx) = mpsc::channel(8);

        loader.begin(&playlist, &mut transport, &tx);
        let for_a = loader.generation();

        assert_eq!(transport.next(), Some(1));
        loader.begin(&playlist, &mut transport, &tx);
        let for_b = loader.generation();
        assert_ne!(for_a, for_b);

        let late = LyricsEvent {
            generation: for_a,
            track_index: 0,
            result: Ok("[00:01.00]from a".to_string()),
        };
        assert!(!loader.apply(late));
        let state = loader.lyrics();
        assert_eq!(state.track_index, 1);
        assert_eq!(state.status, LyricsStatus::Loading);
        assert!(state.lines.is_empty());

        let current = LyricsEvent {
            generation: for_b,
            track_index: 1,
            result: Ok("[00:01.00]from b".to_string()),
        };
        assert!(loader.apply(current));
        assert_eq!(loader.lyrics().lines[0].text, "from b");
    }

    #[tokio::test]
    async fn test_duplicate_timestamps_keep_order() {
        let playlist = Playlist::new(vec![make_track("a", Some("a.lrc"))]);
        let (mut loader, mut transport) = setup(&playlist);
        let (tx, _rx) = mpsc::channel(8);
        loader.begin(&playlist, &mut transport, &tx);

        let ev = LyricsEvent {
            generation: loader.generation(),
            track_index: 0,
            result: Ok("[00:02.00]x\n[00:02.00]y\n[00:01.00]w".to_string()),
        };
        assert!(loader.apply(ev));
        let texts: Vec<_> = loader.lyrics().lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["w", "x", "y"]);
        assert_eq!(loader.lyrics().active(2.5), Some(2));
    }
}

pub mod actions;
pub mod events;
pub mod loader;
pub mod state;

use crate::config::Config;
use crate::input;
use crate::lyrics::{LyricsClient, LyricsState};
use crate::player::PlaybackEngine;
use crate::playlist::Playlist;
use crate::transport::{Transport, TransportState};
use crate::tui::{self, TuiTerminal};
use actions::Action;
use events::{Event, PlayerEvent};
use loader::TrackLoader;
use state::{Toast, UiState};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

const VOLUME_STEP: f64 = 0.05;

/// Read-only snapshot handed to the renderer.
pub struct View<'a> {
    pub playlist: &'a Playlist,
    pub transport: &'a TransportState,
    pub lyrics: &'a LyricsState,
    pub ui: &'a UiState,
}

pub struct App<E> {
    cfg: Config,
    playlist: Playlist,
    transport: Transport<E>,
    loader: TrackLoader,
    ui: UiState,
}

impl<E: PlaybackEngine> App<E> {
    pub fn new(cfg: Config, playlist: Playlist, engine: E) -> anyhow::Result<Self> {
        if playlist.is_empty() {
            anyhow::bail!("playlist is empty: add [[playlist]] entries to the config or pass --playlist");
        }

        let client = LyricsClient::new(
            &cfg.lyrics.user_agent,
            Duration::from_secs(cfg.lyrics.timeout_secs),
        )?;

        let initial = TransportState {
            volume: cfg.player.volume,
            playback_rate: cfg.player.playback_rate,
            play_mode: cfg.player.play_mode,
            ..TransportState::default()
        };
        let transport = Transport::new(engine, playlist.len(), initial);

        Ok(Self {
            cfg,
            playlist,
            transport,
            loader: TrackLoader::new(client),
            ui: UiState::default(),
        })
    }

    pub fn view(&self) -> View<'_> {
        View {
            playlist: &self.playlist,
            transport: self.transport.state(),
            lyrics: self.loader.lyrics(),
            ui: &self.ui,
        }
    }

    pub async fn run(
        &mut self,
        terminal: &mut TuiTerminal,
        tx: mpsc::Sender<Event>,
        mut rx: mpsc::Receiver<Event>,
    ) -> anyhow::Result<()> {
        input::spawn_input_task(tx.clone());

        // Initial load counts as a track change.
        self.loader.begin(&self.playlist, &mut self.transport, &tx);

        let fps = self.cfg.ui.fps.max(1);
        let mut frames = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(fps)));
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.draw(terminal)?;

        loop {
            tokio::select! {
                ev = rx.recv() => {
                    let Some(ev) = ev else { break };
                    self.handle_event(ev, &tx);
                }
                _ = frames.tick() => {
                    self.transport.tick();
                }
            }

            if self.ui.should_quit {
                break;
            }

            self.draw(terminal)?;
        }

        tracing::info!("player closed");
        Ok(())
    }

    fn draw(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        if self.ui.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.ui.toast = None;
        }
        tui::draw(terminal, &self.view())
    }

    fn handle_event(&mut self, ev: Event, tx: &mpsc::Sender<Event>) {
        match ev {
            Event::Input(input_ev) => {
                if let Some(action) = input::map_input_to_action(&self.ui, input_ev) {
                    self.handle_action(action, tx);
                }
            }
            Event::Player(pe) => self.handle_player(pe, tx),
            Event::Lyrics(le) => {
                self.loader.apply(le);
            }
        }
    }

    fn handle_action(&mut self, action: Action, tx: &mpsc::Sender<Event>) {
        match action {
            Action::Quit => self.ui.should_quit = true,
            Action::Resize => {}
            Action::PlayPause => self.transport.play_pause(),
            Action::Next => {
                if self.transport.next().is_some() {
                    self.track_changed(tx);
                }
            }
            Action::Prev => {
                if self.transport.prev().is_some() {
                    self.track_changed(tx);
                }
            }
            Action::ToggleMode => {
                let mode = self.transport.toggle_mode();
                self.ui.toast = Some(Toast::info(mode.label()));
            }
            Action::SeekBy(delta) => {
                let state = self.transport.state();
                let mut target = (state.current_time + delta).max(0.0);
                if state.duration > 0.0 {
                    target = target.min(state.duration);
                }
                self.transport.seek(target);
            }
            Action::SeekToPrevLine | Action::SeekToNextLine => {
                let lyrics = self.loader.lyrics();
                let window = lyrics.window(self.transport.state().current_time);
                let target = if action == Action::SeekToPrevLine {
                    window.previous
                } else {
                    window.next
                };
                if let Some(line) = target.and_then(|i| lyrics.lines.get(i)) {
                    let time = line.time;
                    self.transport.seek(time);
                }
            }
            Action::VolumeUp => {
                let v = self.transport.state().volume + VOLUME_STEP;
                self.transport.set_volume(v);
            }
            Action::VolumeDown => {
                let v = self.transport.state().volume - VOLUME_STEP;
                self.transport.set_volume(v);
            }
            Action::ToggleMute => self.transport.toggle_mute(),
            Action::RateUp => self.transport.cycle_playback_rate(true),
            Action::RateDown => self.transport.cycle_playback_rate(false),
            Action::TogglePlaylist => {
                self.ui.drawer.open = !self.ui.drawer.open;
                if self.ui.drawer.open {
                    self.ui.drawer.selected = self.transport.state().track_index;
                }
            }
            Action::PlaylistUp => self.ui.drawer.select_prev(),
            Action::PlaylistDown => self.ui.drawer.select_next(self.playlist.len()),
            Action::PlaylistActivate => {
                let selected = self.ui.drawer.selected;
                self.ui.drawer.open = false;
                if self.transport.select_track(selected).is_some() {
                    self.track_changed(tx);
                }
            }
        }
    }

    fn handle_player(&mut self, pe: PlayerEvent, tx: &mpsc::Sender<Event>) {
        match pe {
            PlayerEvent::MetadataLoaded { duration } => self.transport.on_metadata_loaded(duration),
            PlayerEvent::Ended => {
                if self.transport.on_track_end().is_some() {
                    self.track_changed(tx);
                }
            }
            PlayerEvent::Error(e) => {
                self.transport.on_engine_error(&e);
                self.ui.toast = Some(Toast::error(e));
            }
        }
    }

    fn track_changed(&mut self, tx: &mpsc::Sender<Event>) {
        self.loader.begin(&self.playlist, &mut self.transport, tx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::fake::{Command, FakeEngine};
    use crate::playlist::make_track;
    use crate::transport::PlayMode;

    fn app(n: usize) -> (App<FakeEngine>, mpsc::Sender<Event>) {
        let tracks = (0..n).map(|i| make_track(&format!("t{i}"), None)).collect();
        let mut app = App::new(Config::default(), Playlist::new(tracks), FakeEngine::default()).unwrap();
        let (tx, _rx) = mpsc::channel(16);
        app.track_changed(&tx);
        (app, tx)
    }

    #[test]
    fn test_empty_playlist_rejected() {
        assert!(App::new(Config::default(), Playlist::default(), FakeEngine::default()).is_err());
    }

    #[tokio::test]
    async fn test_next_loads_new_track() {
        let (mut app, tx) = app(3);
        let generation = app.loader.generation();
        app.handle_action(Action::Next, &tx);
        assert_eq!(app.view().transport.track_index, 1);
        assert_eq!(app.loader.generation(), generation + 1);
        assert_eq!(app.view().lyrics.track_index, 1);
        assert!(
            app.transport
                .engine()
                .commands
                .contains(&Command::Load("t1.mp3".to_string()))
        );
    }

    #[tokio::test]
    async fn test_loop_one_end_does_not_reload() {
        let (mut app, tx) = app(3);
        app.handle_action(Action::PlayPause, &tx);
        app.handle_action(Action::ToggleMode, &tx);
        assert_eq!(app.view().transport.play_mode, PlayMode::LoopOne);

        let generation = app.loader.generation();
        let loads = app.transport.engine().loads();
        app.handle_player(PlayerEvent::Ended, &tx);

        assert_eq!(app.loader.generation(), generation);
        assert_eq!(app.transport.engine().loads(), loads);
        assert_eq!(app.view().transport.track_index, 0);
        assert_eq!(app.view().transport.current_time, 0.0);
    }

    #[tokio::test]
    async fn test_prev_restart_does_not_reload() {
        let (mut app, tx) = app(3);
        app.handle_player(PlayerEvent::MetadataLoaded { duration: 200.0 }, &tx);
        app.handle_action(Action::SeekBy(15.0), &tx);
        let generation = app.loader.generation();
        app.handle_action(Action::Prev, &tx);
        assert_eq!(app.loader.generation(), generation);
        assert_eq!(app.view().transport.current_time, 0.0);
    }

    #[tokio::test]
    async fn test_seek_by_is_clamped() {
        let (mut app, tx) = app(1);
        app.handle_action(Action::SeekBy(-5.0), &tx);
        assert_eq!(app.view().transport.current_time, 0.0);
        app.handle_player(PlayerEvent::MetadataLoaded { duration: 30.0 }, &tx);
        app.handle_action(Action::SeekBy(100.0), &tx);
        assert_eq!(app.view().transport.current_time, 30.0);
    }

    #[tokio::test]
    async fn test_seek_to_lines() {
        let (mut app, tx) = app(1);
        let generation = app.loader.generation();
        app.loader.apply(events::LyricsEvent {
            generation,
            track_index: 0,
            result: Ok("[00:02.00]a\n[00:05.00]b\n[00:09.00]c".to_string()),
        });

        app.handle_action(Action::SeekToNextLine, &tx);
        assert_eq!(app.view().transport.current_time, 2.0);
        app.handle_action(Action::SeekToNextLine, &tx);
        assert_eq!(app.view().transport.current_time, 5.0);
        app.handle_action(Action::SeekToPrevLine, &tx);
        assert_eq!(app.view().transport.current_time, 2.0);
    }

    #[tokio::test]
    async fn test_playlist_drawer_selects_and_plays() {
        let (mut app, tx) = app(3);
        app.handle_action(Action::TogglePlaylist, &tx);
        assert!(app.view().ui.drawer.open);
        app.handle_action(Action::PlaylistDown, &tx);
        app.handle_action(Action::PlaylistDown, &tx);
        app.handle_action(Action::PlaylistActivate, &tx);

        let view = app.view();
        assert!(!view.ui.drawer.open);
        assert_eq!(view.transport.track_index, 2);
        assert!(view.transport.is_playing);
        assert_eq!(view.lyrics.track_index, 2);
    }

    #[tokio::test]
    async fn test_engine_error_is_recoverable() {
        let (mut app, tx) = app(2);
        app.handle_player(PlayerEvent::Error("decode failed".into()), &tx);
        assert!(app.view().ui.toast.is_some());
        app.handle_action(Action::Next, &tx);
        assert_eq!(app.view().transport.track_index, 1);
    }

    #[tokio::test]
    async fn test_volume_steps() {
        let (mut app, tx) = app(1);
        for _ in 0..30 {
            app.handle_action(Action::VolumeUp, &tx);
        }
        assert_eq!(app.view().transport.volume, 1.0);
        app.handle_action(Action::ToggleMute, &tx);
        assert_eq!(app.view().transport.volume, 0.0);
        app.handle_action(Action::VolumeDown, &tx);
        assert_eq!(app.view().transport.volume, 0.0);
    }
}

use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use crate::app::state::UiState;
use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

const SEEK_STEP_SECS: f64 = 5.0;

pub fn spawn_input_task(tx: mpsc::Sender<Event>) {
    tokio::task::spawn_blocking(move || {
        loop {
            if !event::poll(std::time::Duration::from_millis(250)).unwrap_or(false) {
                if tx.is_closed() {
                    break;
                }
                continue;
            }
            let ev = match event::read() {
                Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => InputEvent::Key(k),
                Ok(CtEvent::Resize(_, _)) => InputEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "terminal input error");
                    continue;
                }
            };
            if tx.blocking_send(Event::Input(ev)).is_err() {
                break;
            }
        }
    });
}

pub fn map_input_to_action(ui: &UiState, ev: InputEvent) -> Option<Action> {
    match ev {
        InputEvent::Resize => Some(Action::Resize),
        InputEvent::Key(k) if ui.drawer.open => handle_drawer(k),
        InputEvent::Key(k) => handle_player(k),
    }
}

fn handle_drawer(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Esc | KeyCode::Char('l') => Some(Action::TogglePlaylist),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::PlaylistUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::PlaylistDown),
        KeyCode::Enter => Some(Action::PlaylistActivate),
        KeyCode::Char(' ') => Some(Action::PlayPause),
        _ => None,
    }
}

fn handle_player(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),

        KeyCode::Char(' ') => Some(Action::PlayPause),
        KeyCode::Char('n') => Some(Action::Next),
        KeyCode::Char('p') => Some(Action::Prev),
        KeyCode::Char('m') => Some(Action::ToggleMode),

        KeyCode::Left => Some(Action::SeekBy(-SEEK_STEP_SECS)),
        KeyCode::Right => Some(Action::SeekBy(SEEK_STEP_SECS)),
        KeyCode::Char('[') => Some(Action::SeekToPrevLine),
        KeyCode::Char(']') => Some(Action::SeekToNextLine),

        KeyCode::Up | KeyCode::Char('=') | KeyCode::Char('+') => Some(Action::VolumeUp),
        KeyCode::Down | KeyCode::Char('-') | KeyCode::Char('_') => Some(Action::VolumeDown),
        KeyCode::Char('0') => Some(Action::ToggleMute),
        KeyCode::Char('>') | KeyCode::Char('.') => Some(Action::RateUp),
        KeyCode::Char('<') | KeyCode::Char(',') => Some(Action::RateDown),

        KeyCode::Char('l') => Some(Action::TogglePlaylist),
        _ => None,
    }
}

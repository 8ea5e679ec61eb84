use std::time::{Duration, Instant};

const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Info,
            created_at: Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
            created_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > TOAST_TTL
    }
}

/// Playlist drawer selection
#[derive(Debug, Clone, Default)]
pub struct DrawerState {
    pub open: bool,
    pub selected: usize,
}

impl DrawerState {
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }
}

/// UI-only state. Playback state lives in the transport.
#[derive(Debug, Default)]
pub struct UiState {
    pub should_quit: bool,
    pub drawer: DrawerState,
    pub toast: Option<Toast>,
}

use super::PlaybackEngine;
use crate::app::events::{Event, PlayerEvent};
use anyhow::Context;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::UnixStream,
    process::{Child, Command},
    sync::mpsc,
};

/// Position as last reported by mpv.
#[derive(Debug)]
struct Clock {
    /// f64 bits of `time-pos`.
    position: AtomicU64,
    has_position: AtomicBool,
    /// mpv `core-idle`: paused, buffering or between files.
    idle: AtomicBool,
}

impl Clock {
    fn new() -> Self {
        Self {
            position: AtomicU64::new(0f64.to_bits()),
            has_position: AtomicBool::new(false),
            idle: AtomicBool::new(true),
        }
    }

    fn reset(&self) {
        self.has_position.store(false, Ordering::Relaxed);
        self.idle.store(true, Ordering::Relaxed);
    }

    fn set_position(&self, seconds: Option<f64>) {
        match seconds {
            Some(s) => {
                self.position.store(s.to_bits(), Ordering::Relaxed);
                self.has_position.store(true, Ordering::Relaxed);
            }
            None => self.has_position.store(false, Ordering::Relaxed),
        }
    }

    fn advancing(&self) -> Option<f64> {
        if self.idle.load(Ordering::Relaxed) || !self.has_position.load(Ordering::Relaxed) {
            return None;
        }
        Some(f64::from_bits(self.position.load(Ordering::Relaxed)))
    }
}

/// mpv child process driven over its JSON IPC socket.
#[derive(Debug)]
pub struct MpvEngine {
    child: Child,
    socket_path: PathBuf,
    commands: mpsc::UnboundedSender<serde_json::Value>,
    clock: Arc<Clock>,
}

impl MpvEngine {
    pub async fn spawn(
        event_tx: mpsc::Sender<Event>,
        audio_device: Option<&str>,
        log_file: Option<&std::path::Path>,
    ) -> anyhow::Result<Self> {
        let socket_path =
            std::env::temp_dir().join(format!("revelation-mpv-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&socket_path);

        let child = Command::new("mpv")
            .args(mpv_args(&socket_path, audio_device, log_file))
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .context("spawn mpv")?;

        // mpv creates the socket shortly after starting.
        let stream = connect_with_retry(&socket_path).await?;
        let (reader, writer) = tokio::io::split(stream);

        let clock = Arc::new(Clock::new());
        let (commands, command_rx) = mpsc::unbounded_channel();

        tokio::spawn(write_commands_loop(writer, command_rx));
        tokio::spawn(read_events_loop(reader, event_tx, clock.clone()));

        let this = Self {
            child,
            socket_path,
            commands,
            clock,
        };

        this.command(json!({"command":["request_log_messages", "warn"]}))?;
        this.command(json!({"command":["observe_property", 1, "time-pos"]}))?;
        this.command(json!({"command":["observe_property", 2, "duration"]}))?;
        this.command(json!({"command":["observe_property", 3, "core-idle"]}))?;
        this.command(json!({"command":["observe_property", 4, "eof-reached"]}))?;

        Ok(this)
    }

    fn command(&self, v: serde_json::Value) -> anyhow::Result<()> {
        self.commands
            .send(v)
            .map_err(|_| anyhow::anyhow!("mpv ipc writer has stopped"))
    }
}

impl PlaybackEngine for MpvEngine {
    fn load(&mut self, url: &str) -> anyhow::Result<()> {
        self.clock.reset();
        self.command(load_cmd(url))
    }

    fn play(&mut self) -> anyhow::Result<()> {
        self.command(pause_cmd(false))
    }

    fn pause(&mut self) -> anyhow::Result<()> {
        self.command(pause_cmd(true))
    }

    fn set_current_time(&mut self, seconds: f64) -> anyhow::Result<()> {
        self.clock.set_position(Some(seconds));
        self.command(seek_cmd(seconds))
    }

    fn set_volume(&mut self, volume: f64) -> anyhow::Result<()> {
        self.command(volume_cmd(volume))
    }

    fn set_playback_rate(&mut self, rate: f64) -> anyhow::Result<()> {
        self.command(speed_cmd(rate))
    }

    fn position(&self) -> Option<f64> {
        self.clock.advancing()
    }
}

fn mpv_args(
    socket_path: &std::path::Path,
    audio_device: Option<&str>,
    log_file: Option<&std::path::Path>,
) -> Vec<String> {
    let mut args: Vec<String> = [
        "--no-video",
        "--idle=yes",
        // Stay on the finished file so a rewind can replay it.
        "--keep-open=yes",
        "--input-terminal=no",
        "--really-quiet",
        // Nothing plays until the transport asks for it.
        "--pause",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    if let Some(dev) = audio_device {
        args.push(format!("--audio-device={dev}"));
    }
    if let Some(p) = log_file {
        args.push(format!("--log-file={}", p.display()));
    }
    args.push(format!("--input-ipc-server={}", socket_path.display()));
    args
}

fn load_cmd(url: &str) -> serde_json::Value {
    json!({"command":["loadfile", url, "replace"]})
}

fn pause_cmd(paused: bool) -> serde_json::Value {
    json!({"command":["set_property", "pause", paused]})
}

fn seek_cmd(seconds: f64) -> serde_json::Value {
    json!({"command":["seek", seconds, "absolute"]})
}

/// mpv volume is a percentage.
fn volume_cmd(volume: f64) -> serde_json::Value {
    let percent = (volume.clamp(0.0, 1.0) * 100.0).round();
    json!({"command":["set_property", "volume", percent]})
}

fn speed_cmd(rate: f64) -> serde_json::Value {
    json!({"command":["set_property", "speed", rate]})
}

impl Drop for MpvEngine {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

async fn connect_with_retry(path: &PathBuf) -> anyhow::Result<UnixStream> {
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(5);
    loop {
        match UnixStream::connect(path).await {
            Ok(s) => return Ok(s),
            Err(e) => {
                if tokio::time::Instant::now() > deadline {
                    return Err(e).with_context(|| format!("connect to mpv ipc {}", path.display()));
                }
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            }
        }
    }
}

async fn write_commands_loop(
    mut writer: tokio::io::WriteHalf<UnixStream>,
    mut rx: mpsc::UnboundedReceiver<serde_json::Value>,
) {
    let mut request_id: u64 = 1;
    while let Some(mut v) = rx.recv().await {
        // Tag requests so errors come back as structured replies.
        if let serde_json::Value::Object(ref mut o) = v {
            o.insert("request_id".to_string(), serde_json::Value::from(request_id));
            request_id += 1;
        }
        let mut line = match serde_json::to_vec(&v) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "encode mpv command");
                continue;
            }
        };
        line.push(b'\n');
        if let Err(e) = writer.write_all(&line).await {
            tracing::error!(error = %e, "write mpv ipc");
            break;
        }
        let _ = writer.flush().await;
    }
}

async fn read_events_loop(
    reader: tokio::io::ReadHalf<UnixStream>,
    event_tx: mpsc::Sender<Event>,
    clock: Arc<Clock>,
) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let Ok(v) = serde_json::from_str::<serde_json::Value>(&line) else {
            continue;
        };
        if let Some(pe) = map_mpv_event(&v, &clock)
            && event_tx.send(Event::Player(pe)).await.is_err()
        {
            break;
        }
    }
    tracing::debug!("mpv event stream closed");
}

/// Update the clock from property changes and translate the rest into
/// player events.
fn map_mpv_event(v: &serde_json::Value, clock: &Clock) -> Option<PlayerEvent> {
    // Command replies: {"request_id":..., "error":"..."}
    if v.get("event").is_none() && v.get("request_id").is_some() {
        let err = v.get("error").and_then(|e| e.as_str())?;
        return (err != "success").then(|| PlayerEvent::Error(format!("mpv ipc error: {err}")));
    }

    match v.get("event")?.as_str()? {
        "property-change" => {
            let data = v.get("data");
            match v.get("name")?.as_str()? {
                "time-pos" => {
                    clock.set_position(data.and_then(|d| d.as_f64()));
                    None
                }
                "core-idle" => {
                    let idle = data.and_then(|d| d.as_bool()).unwrap_or(true);
                    clock.idle.store(idle, Ordering::Relaxed);
                    None
                }
                "duration" => data
                    .and_then(|d| d.as_f64())
                    .map(|seconds| PlayerEvent::MetadataLoaded { duration: seconds }),
                // With --keep-open the file stays loaded and paused at its end.
                "eof-reached" => data
                    .and_then(|d| d.as_bool())
                    .unwrap_or(false)
                    .then_some(PlayerEvent::Ended),
                _ => None,
            }
        }
        // Natural ends arrive as eof-reached; "stop" is loadfile replacing
        // the previous file.
        "end-file" => match v.get("reason").and_then(|x| x.as_str()).unwrap_or("") {
            "error" => {
                let err = v.get("file_error").or_else(|| v.get("error"));
                let err = err.and_then(|x| x.as_str()).unwrap_or("unknown");
                Some(PlayerEvent::Error(format!("mpv end-file error: {err}")))
            }
            _ => None,
        },
        "log-message" => {
            let level = v.get("level")?.as_str().unwrap_or("info");
            let text = v.get("text")?.as_str().unwrap_or("").trim();
            if (level == "warn" || level == "error") && !text.is_empty() {
                Some(PlayerEvent::Error(format!("mpv {level}: {text}")))
            } else {
                None
            }
        }
        _ => None,
    }
}

mod app;
mod config;
mod input;
mod logging;
mod lyrics;
mod player;
mod playlist;
mod transport;
mod tui;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "revelation", version, about = "Terminal music player with synchronized lyrics")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Playlist file ([[tracks]] entries); replaces the config playlist.
    #[arg(long)]
    playlist: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive player (default).
    Tui,
    /// Print the playlist to stdout.
    Playlist,
    /// Fetch and parse a lyrics source, printing the timed lines.
    Lyrics {
        /// URL or file path of an LRC file.
        source: String,
        /// Mark the line active at this many seconds.
        #[arg(long)]
        at: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;
    let playlist = match cli.playlist.as_deref() {
        Some(p) => playlist::Playlist::load(p).context("load playlist")?,
        None => playlist::Playlist::new(cfg.playlist.clone()),
    };

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            logging::init_file(&cfg.paths.data_dir).context("init logging")?;

            let (tx, rx) = tokio::sync::mpsc::channel::<app::events::Event>(256);
            let mpv_log = cfg.paths.data_dir.join("mpv.log");
            let engine = player::MpvEngine::spawn(
                tx.clone(),
                cfg.player.audio_device.as_deref(),
                Some(&mpv_log),
            )
            .await
            .context("start mpv (is it installed?)")?;

            let mut app = app::App::new(cfg, playlist, engine)?;
            let mut terminal = tui::TerminalGuard::enter().context("init terminal")?;
            app.run(terminal.terminal_mut(), tx, rx).await?;
        }
        Command::Playlist => {
            logging::init_stderr();
            print_playlist(&playlist);
        }
        Command::Lyrics { source, at } => {
            logging::init_stderr();
            let client = lyrics::LyricsClient::new(
                &cfg.lyrics.user_agent,
                Duration::from_secs(cfg.lyrics.timeout_secs),
            )?;
            let text = client.fetch(&source).await?;
            let lines = lyrics::parse(&text);
            let active = at.and_then(|t| lyrics::resolve_active(&lines, t));
            for (i, line) in lines.iter().enumerate() {
                let marker = if Some(i) == active { ">" } else { " " };
                println!("{marker} {:>9.3}  {}", line.time, line.text);
            }
        }
    }

    Ok(())
}

fn print_playlist(playlist: &playlist::Playlist) {
    if playlist.is_empty() {
        println!("(empty playlist)");
        return;
    }
    for (i, t) in playlist.tracks().iter().enumerate() {
        println!("{}", playlist_line(i, t));
    }
}

fn playlist_line(index: usize, track: &playlist::Track) -> String {
    let lyrics = if track.lyrics_url.is_some() { "" } else { "  (no lyrics)" };
    format!("{:02}. {} - {}{}", index + 1, track.name, track.artist, lyrics)
}

//! MPRIS media source backed by the `playerctl` command-line tool.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use url::Url;

use crate::provider::{MediaInfo, MediaSource, ProviderError, TransportCommand, TransportSink};

/// Field separator for `--format`. ASCII unit separator never shows up in tags.
const FIELD_SEP: char = '\u{1f}';

const METADATA_FORMAT: &str =
    "{{status}}\u{1f}{{mpris:length}}\u{1f}{{position}}\u{1f}{{title}}\u{1f}{{artist}}";

/// Talks to the active MPRIS player (or the one named with `-p`).
#[derive(Debug, Clone, Default)]
pub struct PlayerctlSource {
    player: Option<String>,
}

impl PlayerctlSource {
    pub fn new(player: Option<String>) -> Self {
        Self { player }
    }

    async fn run(&self, args: &[&str]) -> Result<String, ProviderError> {
        let mut cmd = Command::new("playerctl");
        if let Some(player) = &self.player {
            cmd.arg("-p").arg(player);
        }
        let output = cmd
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    ProviderError::Unavailable("playerctl is not installed".to_string())
                }
                _ => ProviderError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("No players found") || stderr.contains("No player could handle") {
                return Err(ProviderError::NoSession);
            }
            return Err(ProviderError::Unavailable(stderr.trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl MediaSource for PlayerctlSource {
    async fn query(&self) -> Result<MediaInfo, ProviderError> {
        let out = self.run(&["metadata", "--format", METADATA_FORMAT]).await?;
        parse_metadata_line(&out)
    }

    async fn artwork(&self) -> Result<Option<Vec<u8>>, ProviderError> {
        let url = self.run(&["metadata", "mpris:artUrl"]).await?;
        let url = url.trim();
        if url.is_empty() {
            return Ok(None);
        }
        let Some(path) = file_url_to_path(url) else {
            tracing::debug!("Skipping non-local artwork URL: {}", url);
            return Ok(None);
        };
        let bytes = tokio::fs::read(&path).await?;
        Ok((!bytes.is_empty()).then_some(bytes))
    }
}

#[async_trait]
impl TransportSink for PlayerctlSource {
    async fn send(&self, command: TransportCommand) -> Result<(), ProviderError> {
        let verb = match command {
            TransportCommand::PreviousTrack => "previous",
            TransportCommand::PlayPause => "play-pause",
            TransportCommand::NextTrack => "next",
        };
        self.run(&[verb]).await.map(|_| ())
    }
}

/// Parse one line of `playerctl metadata --format` output produced with
/// [`METADATA_FORMAT`]: status, length (µs), position (µs), title, artist.
pub fn parse_metadata_line(line: &str) -> Result<MediaInfo, ProviderError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields: Vec<&str> = line.splitn(5, FIELD_SEP).collect();
    let [status, length, position, title, artist] = fields[..] else {
        return Err(ProviderError::Parse(format!(
            "expected 5 fields, got {}",
            fields.len()
        )));
    };

    let non_empty = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    Ok(MediaInfo {
        title: non_empty(title),
        artist: non_empty(artist),
        is_playing: status.trim() == "Playing",
        position_secs: micros_to_secs(position),
        duration_secs: micros_to_secs(length),
    })
}

/// Empty or malformed values read as zero; normalization floors duration later.
fn micros_to_secs(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .map(|us| us / 1_000_000.0)
        .unwrap_or(0.0)
}

/// Resolve a `file://` artwork URL (with or without a `localhost` host) to a
/// local path. Returns `None` for any other scheme or an unparseable URL.
pub fn file_url_to_path(raw: &str) -> Option<PathBuf> {
    let url = Url::parse(raw).ok()?;
    if url.scheme() != "file" {
        return None;
    }
    url.to_file_path().ok()
}

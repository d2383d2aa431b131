pub mod pactl;
pub mod playerctl;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

/// Raw now-playing fields as reported by a media source, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    /// `None` when the source exposes no title (rendered as "Unknown").
    pub title: Option<String>,
    /// `None` when the source exposes no artist (rendered as "Player").
    pub artist: Option<String>,
    pub is_playing: bool,
    pub position_secs: f64,
    pub duration_secs: f64,
}

/// Transport actions that can be forwarded to the active player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCommand {
    PreviousTrack,
    PlayPause,
    NextTrack,
}

impl TransportCommand {
    /// Map a `/control/{action}` path segment to a command.
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "prev" => Some(Self::PreviousTrack),
            "playpause" => Some(Self::PlayPause),
            "next" => Some(Self::NextTrack),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No media session is active. Surfaces as the "not connected" snapshot.
    #[error("no active media session")]
    NoSession,
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),
    #[error("provider I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected provider output: {0}")]
    Parse(String),
}

/// Queries the OS for what is currently playing.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn query(&self) -> Result<MediaInfo, ProviderError>;

    /// Encoded artwork of the current track, if the source has any.
    /// Comparatively expensive; callers fetch it once per track.
    async fn artwork(&self) -> Result<Option<Vec<u8>>, ProviderError>;
}

/// System output volume as a 0–100 scalar.
#[async_trait]
pub trait VolumeControl: Send + Sync {
    async fn get_volume(&self) -> Result<u8, ProviderError>;
    async fn set_volume(&self, percent: u8) -> Result<(), ProviderError>;
}

/// Fire-and-forget transport commands.
#[async_trait]
pub trait TransportSink: Send + Sync {
    async fn send(&self, command: TransportCommand) -> Result<(), ProviderError>;
}

/// Bound a provider call. A hung call becomes `ProviderError::Timeout`.
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(limit)),
    }
}

use std::sync::Arc;
use std::time::Instant;

use base64::Engine;

use crate::provider::MediaInfo;

/// Shown before the first successful poll.
pub const WAITING_TITLE: &str = "Waiting for sync";
pub const WAITING_ARTIST: &str = "Not connected";
/// Shown while the provider reports no active media session.
pub const DISCONNECTED_TITLE: &str = "Not connected";
pub const DISCONNECTED_ARTIST: &str = "No active media session";
/// Placeholders for a connected session that omits a field.
pub const UNKNOWN_TITLE: &str = "Unknown";
pub const UNKNOWN_ARTIST: &str = "Player";

pub const DEFAULT_VOLUME: u8 = 50;
/// Durations are floored to this so progress ratios never divide by zero.
pub const MIN_DURATION_SECS: f64 = 1.0;

/// The latest authoritative media state. Replaced wholesale on every poll.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub title: String,
    pub artist: String,
    /// Raw encoded image. Memory only; fetched once per track.
    pub artwork: Option<Arc<[u8]>>,
    pub is_playing: bool,
    /// Always within `[0, duration_secs]`.
    pub position_secs: f64,
    /// Always `>= MIN_DURATION_SECS`.
    pub duration_secs: f64,
    pub volume: u8,
    /// When the provider query behind this snapshot started.
    pub captured_at: Instant,
    /// False for the waiting and disconnected sentinels.
    pub connected: bool,
}

impl Snapshot {
    /// Startup state, before any provider has answered.
    pub fn waiting() -> Self {
        Self::sentinel(WAITING_TITLE, WAITING_ARTIST, DEFAULT_VOLUME, Instant::now())
    }

    /// The provider answered, but no media session is active.
    pub fn disconnected(volume: u8, captured_at: Instant) -> Self {
        Self::sentinel(DISCONNECTED_TITLE, DISCONNECTED_ARTIST, volume, captured_at)
    }

    fn sentinel(title: &str, artist: &str, volume: u8, captured_at: Instant) -> Self {
        Self {
            title: title.to_string(),
            artist: artist.to_string(),
            artwork: None,
            is_playing: false,
            position_secs: 0.0,
            duration_secs: MIN_DURATION_SECS,
            volume: volume.min(100),
            captured_at,
            connected: false,
        }
    }

    /// Normalize provider output: placeholder text for missing fields, duration
    /// floored, position clamped into the track, volume capped at 100.
    pub fn from_media(info: MediaInfo, volume: u8, captured_at: Instant) -> Self {
        let duration_secs = if info.duration_secs.is_finite() {
            info.duration_secs.max(MIN_DURATION_SECS)
        } else {
            MIN_DURATION_SECS
        };
        let position_secs = if info.position_secs.is_finite() {
            info.position_secs.clamp(0.0, duration_secs)
        } else {
            0.0
        };
        Self {
            title: info.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            artist: info.artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            artwork: None,
            is_playing: info.is_playing,
            position_secs,
            duration_secs,
            volume: volume.min(100),
            captured_at,
            connected: true,
        }
    }
}

/// Guess the image MIME type from magic bytes. Sources mostly hand out PNG or
/// JPEG; anything unrecognised is labelled PNG.
pub fn artwork_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/png",
    }
}

/// Inline `data:` URI for artwork, served to remote clients in `/info`.
pub fn artwork_data_uri(bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        artwork_mime(bytes),
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

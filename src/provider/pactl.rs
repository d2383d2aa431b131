//! Default-sink volume through `pactl` (PulseAudio and PipeWire-Pulse).

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::provider::{ProviderError, VolumeControl};

const DEFAULT_SINK: &str = "@DEFAULT_SINK@";

#[derive(Debug, Clone, Default)]
pub struct PactlVolume;

impl PactlVolume {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, args: &[&str]) -> Result<String, ProviderError> {
        let output = Command::new("pactl")
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    ProviderError::Unavailable("pactl is not installed".to_string())
                }
                _ => ProviderError::Io(e),
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::Unavailable(stderr.trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl VolumeControl for PactlVolume {
    async fn get_volume(&self) -> Result<u8, ProviderError> {
        let out = self.run(&["get-sink-volume", DEFAULT_SINK]).await?;
        parse_sink_volume(&out)
    }

    async fn set_volume(&self, percent: u8) -> Result<(), ProviderError> {
        let level = format!("{}%", percent.min(100));
        self.run(&["set-sink-volume", DEFAULT_SINK, &level]).await.map(|_| ())
    }
}

/// Extract the first channel's percentage from `pactl get-sink-volume` output:
///
/// `Volume: front-left: 32768 /  50% / -18.06 dB,   front-right: 32768 /  50% / -18.06 dB`
///
/// Over-amplified sinks (above 100%) are reported as 100.
pub fn parse_sink_volume(output: &str) -> Result<u8, ProviderError> {
    output
        .split('/')
        .map(str::trim)
        .find_map(|part| part.strip_suffix('%'))
        .and_then(|digits| digits.trim().parse::<u32>().ok())
        .map(|pct| pct.min(100) as u8)
        .ok_or_else(|| ProviderError::Parse(format!("no volume percentage in {:?}", output.trim())))
}

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::sync::poller::{DEFAULT_POLL_INTERVAL, DEFAULT_PROVIDER_TIMEOUT};
use crate::sync::reconcile::DEFAULT_DRIFT_THRESHOLD_SECS;
use crate::sync::ticker::DEFAULT_TICK_INTERVAL;

const DEFAULT_PORT: u16 = 5000;

/// Keys accepted in `playmirror.toml`. All optional; unknown keys are ignored.
#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub localhost: Option<bool>,
    pub player: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub tick_interval_ms: Option<u64>,
    pub drift_threshold_secs: Option<f64>,
    pub provider_timeout_ms: Option<u64>,
}

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub localhost: bool,
    pub player: Option<String>,
    pub poll_interval: Duration,
    pub tick_interval: Duration,
    pub drift_threshold_secs: f64,
    pub provider_timeout: Duration,
}

impl Config {
    /// Merge CLI flags over the config file over built-in defaults.
    pub fn resolve(file: Option<FileConfig>, args: &crate::cli::Args) -> Self {
        let file = file.unwrap_or_default();
        let millis = |cli: Option<u64>, file: Option<u64>, default: Duration| {
            cli.or(file)
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(default)
        };
        Config {
            port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
            localhost: args.localhost || file.localhost.unwrap_or(false),
            player: args.player.clone().or(file.player),
            poll_interval: millis(args.poll_interval_ms, file.poll_interval_ms, DEFAULT_POLL_INTERVAL),
            tick_interval: millis(args.tick_interval_ms, file.tick_interval_ms, DEFAULT_TICK_INTERVAL),
            drift_threshold_secs: args
                .drift_threshold
                .or(file.drift_threshold_secs)
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .unwrap_or(DEFAULT_DRIFT_THRESHOLD_SECS),
            provider_timeout: millis(
                args.provider_timeout_ms,
                file.provider_timeout_ms,
                DEFAULT_PROVIDER_TIMEOUT,
            ),
        }
    }
}

pub fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_owned());
    }
    let cwd_config = PathBuf::from("playmirror.toml");
    if cwd_config.exists() {
        return Some(cwd_config);
    }
    if let Some(config_dir) = dirs::config_dir() {
        let xdg_config = config_dir.join("playmirror").join("config.toml");
        if xdg_config.exists() {
            return Some(xdg_config);
        }
    }
    None
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;
    Ok(config)
}

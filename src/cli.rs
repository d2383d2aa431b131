use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "playmirror",
    about = "Mirror the desktop's now-playing state to a smooth clock and an HTTP remote",
    long_about = None,
    version = env!("GIT_VERSION"),
)]
pub struct Args {
    /// HTTP port to listen on [default: 5000]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to TOML config file (overrides default search: ./playmirror.toml, ~/.config/playmirror/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Bind to localhost only (127.0.0.1) instead of all interfaces (0.0.0.0 + :::)
    #[arg(long)]
    pub localhost: bool,

    /// MPRIS player to follow (playerctl -p); defaults to the active player
    #[arg(long)]
    pub player: Option<String>,

    /// Milliseconds between authoritative polls [default: 1000]
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Milliseconds between local clock ticks [default: 50]
    #[arg(long, value_name = "MS")]
    pub tick_interval_ms: Option<u64>,

    /// Seconds of clock/poll divergence before the clock is reset [default: 2.0]
    #[arg(long, value_name = "SECS")]
    pub drift_threshold: Option<f64>,

    /// Milliseconds before a provider call is abandoned [default: 2000]
    #[arg(long, value_name = "MS")]
    pub provider_timeout_ms: Option<u64>,
}

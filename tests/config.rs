use std::time::Duration;

use playmirror::cli::Args;
use playmirror::config::{Config, FileConfig};

fn make_args(port: Option<u16>) -> Args {
    Args {
        port,
        config: None,
        localhost: false,
        player: None,
        poll_interval_ms: None,
        tick_interval_ms: None,
        drift_threshold: None,
        provider_timeout_ms: None,
    }
}

#[test]
fn test_defaults_when_nothing_set() {
    let config = Config::resolve(None, &make_args(None));
    assert_eq!(config.port, 5000);
    assert_eq!(config.poll_interval, Duration::from_millis(1000));
    assert_eq!(config.tick_interval, Duration::from_millis(50));
    assert_eq!(config.drift_threshold_secs, 2.0);
    assert_eq!(config.provider_timeout, Duration::from_millis(2000));
    assert!(config.player.is_none());
}

#[test]
fn test_cli_flag_overrides_default() {
    let config = Config::resolve(None, &make_args(Some(9000)));
    assert_eq!(config.port, 9000);
}

#[test]
fn test_toml_overrides_default() {
    let file = FileConfig { port: Some(7777), ..Default::default() };
    let config = Config::resolve(Some(file), &make_args(None));
    assert_eq!(config.port, 7777);
}

#[test]
fn test_cli_overrides_toml() {
    let file = FileConfig {
        port: Some(7777),
        tick_interval_ms: Some(100),
        ..Default::default()
    };
    let mut args = make_args(Some(9000));
    args.tick_interval_ms = Some(25);
    let config = Config::resolve(Some(file), &args);
    assert_eq!(config.port, 9000); // CLI wins
    assert_eq!(config.tick_interval, Duration::from_millis(25));
}

#[test]
fn test_zero_interval_falls_back_to_default() {
    let file = FileConfig { poll_interval_ms: Some(0), ..Default::default() };
    let config = Config::resolve(Some(file), &make_args(None));
    assert_eq!(config.poll_interval, Duration::from_millis(1000));
}

#[test]
fn test_negative_drift_threshold_ignored() {
    let mut args = make_args(None);
    args.drift_threshold = Some(-1.0);
    let config = Config::resolve(None, &args);
    assert_eq!(config.drift_threshold_secs, 2.0);
}

#[test]
fn test_toml_parse() {
    let toml_str = "port = 9000\nplayer = \"spotify\"\ndrift_threshold_secs = 3.5\n";
    let parsed: FileConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(parsed.port, Some(9000));
    assert_eq!(parsed.player.as_deref(), Some("spotify"));
    assert_eq!(parsed.drift_threshold_secs, Some(3.5));
}

#[test]
fn test_toml_unknown_fields_ignored() {
    // Future keys must not break parsing
    let toml_str = "port = 9000\nunknown_future_key = true\n";
    let parsed: Result<FileConfig, _> = toml::from_str(toml_str);
    assert!(parsed.is_ok());
}

#[test]
fn test_localhost_default_false() {
    let config = Config::resolve(None, &make_args(None));
    assert!(!config.localhost, "localhost should default to false when neither CLI nor TOML sets it");
}

#[test]
fn test_cli_parses_flags() {
    use clap::Parser;
    let args = Args::try_parse_from([
        "playmirror",
        "--port",
        "8080",
        "--player",
        "vlc",
        "--drift-threshold",
        "1.5",
        "--localhost",
    ])
    .unwrap();
    assert_eq!(args.port, Some(8080));
    assert_eq!(args.player.as_deref(), Some("vlc"));
    assert_eq!(args.drift_threshold, Some(1.5));
    assert!(args.localhost);
}

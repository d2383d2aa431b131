use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use axum::Router;
use clap::Parser;
use tokio::sync::broadcast;

use playmirror::http::{self, state::AppState};
use playmirror::provider::{pactl::PactlVolume, playerctl::PlayerctlSource};
use playmirror::sync::{poller::Poller, state::SyncState, ticker::Ticker};
use playmirror::{cli, config, net};

/// Set to true once the first Ctrl+C is received. Second Ctrl+C force-exits.
static SHUTTING_DOWN: AtomicBool = AtomicBool::new(false);

/// Wait for the first Ctrl+C (graceful shutdown).
/// On second Ctrl+C (during shutdown wait), force-exits immediately.
async fn wait_for_shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    if SHUTTING_DOWN.swap(true, Ordering::SeqCst) {
        eprintln!("\nplaymirror: forced exit");
        std::process::exit(1);
    }
}

/// Acquire the OS hostname safely, falling back to "localhost" if unavailable.
fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|os| os.into_string().ok())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        )
        .init();

    let args = cli::Args::parse();

    let file_config = config::find_config_file(args.config.as_deref())
        .and_then(|path| {
            match config::load_config(&path) {
                Ok(cfg) => {
                    tracing::debug!("Loaded config from {}", path.display());
                    Some(cfg)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config file: {}", e);
                    None
                }
            }
        });

    let config = config::Config::resolve(file_config, &args);

    tracing::info!(
        "playmirror {} on {} (poll {:?}, tick {:?}, drift threshold {:.1}s)",
        env!("GIT_VERSION"),
        get_hostname(),
        config.poll_interval,
        config.tick_interval,
        config.drift_threshold_secs
    );

    // One playerctl adapter serves as both the media source and the transport sink.
    let player = Arc::new(PlayerctlSource::new(config.player.clone()));
    let volume = Arc::new(PactlVolume::new());
    let sync = Arc::new(SyncState::new(config.drift_threshold_secs));

    let (shutdown_tx, _) = broadcast::channel::<()>(4);

    let poller = Poller::new(player.clone(), volume.clone(), Arc::clone(&sync), config.provider_timeout);
    let poller_task = tokio::spawn(poller.run(config.poll_interval, shutdown_tx.subscribe()));

    let ticker = Ticker::new(Arc::clone(&sync), config.tick_interval);
    let ticker_task = tokio::spawn(ticker.run(shutdown_tx.subscribe()));

    let state = AppState {
        sync,
        volume,
        transport: player,
        provider_timeout: config.provider_timeout,
    };
    let app = http::build_router(state);

    if config.localhost {
        serve_localhost(config.port, app, &shutdown_tx).await;
    } else {
        serve_dual_stack(config.port, app, &shutdown_tx).await;
    }

    // Wait for first Ctrl+C.
    wait_for_shutdown().await;
    tracing::info!("Shutting down...");
    let _ = shutdown_tx.send(());

    // Workers exit on the next select!; in-flight commands may be abandoned.
    // A second Ctrl+C during this wait force-exits.
    tokio::select! {
        _ = tokio::time::timeout(std::time::Duration::from_secs(1), async {
            let _ = poller_task.await;
            let _ = ticker_task.await;
        }) => {}
        _ = wait_for_shutdown() => {}
    }

    tracing::info!("Goodbye.");
}

/// Spawn an HTTP server task on `listener` that stops on the shutdown broadcast.
fn spawn_server(
    listener: tokio::net::TcpListener,
    app: Router,
    shutdown_tx: &broadcast::Sender<()>,
    label: &'static str,
) {
    let mut rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(async move { let _ = rx.recv().await; })
            .await
            .unwrap_or_else(|e| tracing::error!("{} server error: {}", label, e));
    });
}

/// Serve on 127.0.0.1 only.
async fn serve_localhost(port: u16, app: Router, shutdown_tx: &broadcast::Sender<()>) {
    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("error: failed to bind {}: {}", addr, e);
            std::process::exit(1);
        });
    tracing::info!("Server started on http://{} (localhost only)", addr);
    spawn_server(listener, app, shutdown_tx, "HTTP");
}

/// Serve on separate IPv4 (0.0.0.0) and IPv6 (::) sockets. IPv6 is best-effort.
async fn serve_dual_stack(port: u16, app: Router, shutdown_tx: &broadcast::Sender<()>) {
    let ipv4_addr = format!("0.0.0.0:{}", port);
    let ipv4_listener = tokio::net::TcpListener::bind(&ipv4_addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("error: failed to bind IPv4 {}: {}", ipv4_addr, e);
            std::process::exit(1);
        });

    let ipv6_listener = net::bind_ipv6_only(port)
        .and_then(tokio::net::TcpListener::from_std);

    tracing::info!("Server started on http://{}:{}", net::lan_address(), port);
    spawn_server(ipv4_listener, app.clone(), shutdown_tx, "IPv4");
    match ipv6_listener {
        Ok(listener) => spawn_server(listener, app, shutdown_tx, "IPv6"),
        Err(e) => tracing::warn!("IPv6 listener unavailable, serving IPv4 only: {}", e),
    }
}

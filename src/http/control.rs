use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::http::state::AppState;
use crate::provider::{with_timeout, TransportCommand};

/// Volume used when `/set_volume` is called without `v`.
const DEFAULT_VOLUME_ARG: f64 = 50.0;

/// GET /control/{action}: forward a transport command without waiting for it.
///
/// Unknown actions answer OK with no side effect; clients re-poll `/info`
/// either way.
pub async fn control(
    State(state): State<AppState>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    Path(action): Path<String>,
) -> Response {
    let Some(command) = TransportCommand::from_action(&action) else {
        tracing::warn!("Unknown control action from {}: {:?}", remote_addr.ip(), action);
        return "OK".into_response();
    };

    tracing::info!(
        target: "audit",
        client = %remote_addr.ip(),
        "ACTION: {}",
        action.to_uppercase()
    );

    let transport = state.transport.clone();
    let limit = state.provider_timeout;
    tokio::spawn(async move {
        if let Err(e) = with_timeout(limit, transport.send(command)).await {
            tracing::warn!("Transport command {:?} failed: {}", command, e);
        }
    });

    "OK".into_response()
}

#[derive(Debug, Deserialize)]
pub struct VolumeParams {
    pub v: Option<String>,
}

/// Parse a `v=` argument into a percentage. Fractions round, out-of-range
/// values (infinities included) clamp; non-numeric input and NaN yield `None`.
pub fn parse_volume_arg(raw: Option<&str>) -> Option<u8> {
    let value = match raw {
        None => DEFAULT_VOLUME_ARG,
        Some(s) => s.trim().parse::<f64>().ok().filter(|v| !v.is_nan())?,
    };
    Some(value.round().clamp(0.0, 100.0) as u8)
}

/// GET /set_volume?v=N: optimistic local update, then write through to the
/// volume provider.
pub async fn set_volume(
    State(state): State<AppState>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    Query(params): Query<VolumeParams>,
) -> Response {
    let Some(percent) = parse_volume_arg(params.v.as_deref()) else {
        tracing::warn!("Bad volume argument from {}: {:?}", remote_addr.ip(), params.v);
        return (StatusCode::BAD_REQUEST, "invalid volume").into_response();
    };

    tracing::info!(target: "audit", client = %remote_addr.ip(), "VOLUME: {}", percent);

    state.sync.override_volume(percent);
    if let Err(e) = with_timeout(state.provider_timeout, state.volume.set_volume(percent)).await {
        tracing::warn!("Setting volume to {} failed: {}", percent, e);
    }

    "OK".into_response()
}

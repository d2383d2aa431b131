pub mod control;
pub mod info;
pub mod state;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use crate::http::state::AppState;

/// Build the remote-control router. Serve it with
/// `into_make_service_with_connect_info::<SocketAddr>()`; command handlers
/// tag their audit lines with the client address.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/info", get(info::serve_info))
        .route("/control/{action}", get(control::control))
        .route("/set_volume", get(control::set_volume))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::http::state::AppState;
use crate::sync::state::SyncView;

/// JSON body of `GET /info`. Field names match what the remote page polls.
#[derive(Debug, Clone, Serialize)]
pub struct InfoResponse {
    pub title: String,
    pub artist: String,
    pub volume: u8,
    pub is_playing: bool,
    /// Interpolated local clock, not the raw polled position.
    pub pos_sec: f64,
    pub dur_sec: f64,
    pub connected: bool,
    /// `data:` URI of the artwork; absent when the source has none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl From<SyncView> for InfoResponse {
    fn from(view: SyncView) -> Self {
        Self {
            title: view.title,
            artist: view.artist,
            volume: view.volume,
            is_playing: view.is_playing,
            pos_sec: view.position_secs,
            dur_sec: view.duration_secs,
            connected: view.connected,
            thumbnail: view.artwork_uri,
        }
    }
}

/// GET /info returns one consistent read of snapshot + clock.
pub async fn serve_info(State(state): State<AppState>) -> impl IntoResponse {
    let body = InfoResponse::from(state.sync.view());
    ([(header::CACHE_CONTROL, "no-store")], Json(body))
}

use std::sync::Arc;
use std::time::Duration;

use crate::provider::{TransportSink, VolumeControl};
use crate::sync::state::SyncState;

/// Shared application state injected into all route handlers via axum::extract::State.
/// Arc provides cheap clone; the sync record carries its own lock.
#[derive(Clone)]
pub struct AppState {
    pub sync: Arc<SyncState>,
    pub volume: Arc<dyn VolumeControl>,
    pub transport: Arc<dyn TransportSink>,
    /// Upper bound on any provider call made from a request handler.
    pub provider_timeout: Duration,
}

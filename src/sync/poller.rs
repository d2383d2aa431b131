use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;

use crate::provider::{with_timeout, MediaSource, ProviderError, VolumeControl};
use crate::sync::reconcile::ClockAdjustment;
use crate::sync::snapshot::Snapshot;
use crate::sync::state::{ApplyOutcome, SyncState};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_millis(2000);

/// What a single poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PollOutcome {
    Applied(ApplyOutcome),
    /// Transient provider failure; the previous snapshot stays authoritative.
    Skipped,
}

/// Slow authoritative refresh: query the providers, build a snapshot, land it.
pub struct Poller {
    source: Arc<dyn MediaSource>,
    volume: Arc<dyn VolumeControl>,
    state: Arc<SyncState>,
    provider_timeout: Duration,
}

impl Poller {
    pub fn new(
        source: Arc<dyn MediaSource>,
        volume: Arc<dyn VolumeControl>,
        state: Arc<SyncState>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            source,
            volume,
            state,
            provider_timeout,
        }
    }

    /// Run one poll cycle. Provider calls happen without the state lock held;
    /// only the final assignment takes it.
    pub async fn poll_once(&self) -> PollOutcome {
        let captured_at = Instant::now();

        let info = match with_timeout(self.provider_timeout, self.source.query()).await {
            Ok(info) => Some(info),
            Err(ProviderError::NoSession) => None,
            Err(e) => {
                tracing::debug!("Poll skipped, keeping last snapshot: {}", e);
                return PollOutcome::Skipped;
            }
        };

        let volume = match with_timeout(self.provider_timeout, self.volume.get_volume()).await {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!("Volume read failed, keeping last value: {}", e);
                self.state.volume()
            }
        };

        let snapshot = match info {
            None => Snapshot::disconnected(volume, captured_at),
            Some(info) => {
                let mut snapshot = Snapshot::from_media(info, volume, captured_at);
                snapshot.artwork = self.artwork_for(&snapshot.title).await;
                snapshot
            }
        };

        let outcome = self.state.apply_snapshot(snapshot);
        if outcome.track_changed {
            let view = self.state.view();
            tracing::info!("Now playing: \"{}\" by {}", view.title, view.artist);
        }
        if let ClockAdjustment::DriftReset { from } = outcome.adjustment {
            tracing::debug!("Clock drifted from {:.2}s, reset to snapshot", from);
        }
        PollOutcome::Applied(outcome)
    }

    /// Artwork is fetched when the title differs from the live snapshot's, or
    /// while the current track still has none (players often publish the art
    /// URL after the title). At most one fetch per poll; otherwise the bytes
    /// already in memory are carried forward.
    async fn artwork_for(&self, title: &str) -> Option<Arc<[u8]>> {
        let (current_title, current_artwork) = self.state.current_track();
        if current_title == title && current_artwork.is_some() {
            return current_artwork;
        }
        match with_timeout(self.provider_timeout, self.source.artwork()).await {
            Ok(bytes) => bytes.map(Arc::from),
            Err(e) => {
                tracing::debug!("Artwork fetch failed for \"{}\": {}", title, e);
                None
            }
        }
    }

    /// Poll on a fixed interval until shutdown. Missed ticks are skipped, so a
    /// slow provider never causes a burst of catch-up polls.
    pub async fn run(self, interval: Duration, mut shutdown_rx: broadcast::Receiver<()>) {
        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::debug!("Poller started ({:?} interval)", interval);

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    self.poll_once().await;
                }
                _ = shutdown_rx.recv() => {
                    tracing::debug!("Poller: shutdown signal received");
                    return;
                }
            }
        }
    }
}

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::sync::state::SyncState;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Fast local interpolation loop. Arithmetic plus one short lock per tick.
pub struct Ticker {
    state: Arc<SyncState>,
    interval: Duration,
}

impl Ticker {
    pub fn new(state: Arc<SyncState>, interval: Duration) -> Self {
        Self { state, interval }
    }

    pub fn tick(&self) -> f64 {
        self.state.tick(self.interval.as_secs_f64())
    }

    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        // Burst (the default) replays missed ticks so the clock keeps pace
        // with wall time after a stall.
        let mut timer = tokio::time::interval(self.interval);
        tracing::debug!("Ticker started ({:?} interval)", self.interval);

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    self.tick();
                }
                _ = shutdown_rx.recv() => {
                    tracing::debug!("Ticker: shutdown signal received");
                    return;
                }
            }
        }
    }
}

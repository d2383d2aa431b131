use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::sync::reconcile::{self, ClockAdjustment};
use crate::sync::snapshot::{artwork_data_uri, Snapshot};

/// A volume written by a command that no poll has confirmed yet.
#[derive(Debug, Clone, Copy)]
struct VolumeOverride {
    volume: u8,
    set_at: Instant,
}

#[derive(Debug)]
struct SyncInner {
    snapshot: Snapshot,
    /// Interpolated position actually shown to consumers.
    clock_secs: f64,
    /// Derived from `snapshot.artwork`; refreshed when the track changes or
    /// its artwork first shows up.
    artwork_uri: Option<String>,
    volume_override: Option<VolumeOverride>,
}

/// Consistent merged view handed to consumers: snapshot fields with the local
/// clock in place of the raw position, all read under one lock.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncView {
    pub title: String,
    pub artist: String,
    pub volume: u8,
    pub is_playing: bool,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub connected: bool,
    pub artwork_uri: Option<String>,
}

/// Result of landing a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplyOutcome {
    pub adjustment: ClockAdjustment,
    pub track_changed: bool,
}

/// The single shared record written by the poller, advanced by the ticker and
/// read by the HTTP surface. Constructed once at startup and injected.
#[derive(Debug)]
pub struct SyncState {
    inner: Mutex<SyncInner>,
    drift_threshold_secs: f64,
}

impl SyncState {
    pub fn new(drift_threshold_secs: f64) -> Self {
        let snapshot = Snapshot::waiting();
        let clock_secs = snapshot.position_secs;
        Self {
            inner: Mutex::new(SyncInner {
                snapshot,
                clock_secs,
                artwork_uri: None,
                volume_override: None,
            }),
            drift_threshold_secs,
        }
    }

    pub fn drift_threshold_secs(&self) -> f64 {
        self.drift_threshold_secs
    }

    // Poison is recovered: every mutation below leaves the record valid.
    fn lock(&self) -> MutexGuard<'_, SyncInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn view(&self) -> SyncView {
        let inner = self.lock();
        SyncView {
            title: inner.snapshot.title.clone(),
            artist: inner.snapshot.artist.clone(),
            volume: inner.snapshot.volume,
            is_playing: inner.snapshot.is_playing,
            position_secs: inner.clock_secs,
            duration_secs: inner.snapshot.duration_secs,
            connected: inner.snapshot.connected,
            artwork_uri: inner.artwork_uri.clone(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot.clone()
    }

    pub fn clock_secs(&self) -> f64 {
        self.lock().clock_secs
    }

    /// Title and artwork of the live snapshot, for the poller's per-track
    /// artwork policy.
    pub fn current_track(&self) -> (String, Option<Arc<[u8]>>) {
        let inner = self.lock();
        (inner.snapshot.title.clone(), inner.snapshot.artwork.clone())
    }

    pub fn volume(&self) -> u8 {
        self.lock().snapshot.volume
    }

    /// Replace the snapshot and reconcile the clock against it.
    ///
    /// A pending volume override survives polls that started before the
    /// override was set; the first poll captured after it clears it.
    pub fn apply_snapshot(&self, mut snapshot: Snapshot) -> ApplyOutcome {
        let mut inner = self.lock();

        if let Some(pending) = inner.volume_override {
            if snapshot.captured_at <= pending.set_at {
                snapshot.volume = pending.volume;
            } else {
                inner.volume_override = None;
            }
        }

        let track_changed = snapshot.title != inner.snapshot.title;
        let artwork_arrived = inner.snapshot.artwork.is_none() && snapshot.artwork.is_some();
        if track_changed || artwork_arrived {
            inner.artwork_uri = snapshot.artwork.as_deref().map(artwork_data_uri);
        }

        let (clock_secs, adjustment) =
            reconcile::reconcile(inner.clock_secs, &snapshot, self.drift_threshold_secs);
        inner.clock_secs = clock_secs;
        inner.snapshot = snapshot;

        ApplyOutcome { adjustment, track_changed }
    }

    /// Advance the clock by one tick. Reads the live snapshot under the same
    /// lock, so a pause landed by the poller takes effect on the next tick.
    pub fn tick(&self, dt_secs: f64) -> f64 {
        let mut inner = self.lock();
        let next = reconcile::advance(inner.clock_secs, &inner.snapshot, dt_secs);
        inner.clock_secs = next;
        next
    }

    /// Optimistically record a commanded volume so reads reflect it before the
    /// provider confirms. Input above 100 is clamped.
    pub fn override_volume(&self, volume: u8) {
        let volume = volume.min(100);
        let mut inner = self.lock();
        inner.snapshot.volume = volume;
        inner.volume_override = Some(VolumeOverride {
            volume,
            set_at: Instant::now(),
        });
    }

    pub fn has_pending_volume(&self) -> bool {
        self.lock().volume_override.is_some()
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new(reconcile::DEFAULT_DRIFT_THRESHOLD_SECS)
    }
}

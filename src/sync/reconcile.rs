use crate::sync::snapshot::Snapshot;

/// Default drift bound. Poll jitter is sub-second; seeks, track changes and
/// resume gaps are not.
pub const DEFAULT_DRIFT_THRESHOLD_SECS: f64 = 2.0;

/// What reconciliation did to the local clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockAdjustment {
    /// Clock left alone; it keeps interpolating.
    Kept,
    /// Divergence exceeded the threshold; clock jumped to the snapshot.
    DriftReset { from: f64 },
    /// Source is paused; clock pinned to the snapshot position.
    PausedSync,
}

/// Merge a fresh snapshot into the interpolated clock.
///
/// Returns the new clock position and what happened. The result is always
/// within `[0, snapshot.duration_secs]`, and equals `snapshot.position_secs`
/// exactly whenever the snapshot is paused.
pub fn reconcile(clock: f64, snapshot: &Snapshot, threshold_secs: f64) -> (f64, ClockAdjustment) {
    let (position, adjustment) = if (clock - snapshot.position_secs).abs() > threshold_secs {
        (snapshot.position_secs, ClockAdjustment::DriftReset { from: clock })
    } else if !snapshot.is_playing {
        (snapshot.position_secs, ClockAdjustment::PausedSync)
    } else {
        (clock, ClockAdjustment::Kept)
    };
    (position.clamp(0.0, snapshot.duration_secs), adjustment)
}

/// One ticker step: advance by `dt_secs` while playing, clamped to the track.
pub fn advance(clock: f64, snapshot: &Snapshot, dt_secs: f64) -> f64 {
    if !snapshot.is_playing {
        return clock;
    }
    (clock + dt_secs).clamp(0.0, snapshot.duration_secs)
}

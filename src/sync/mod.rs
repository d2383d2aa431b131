//! Dual-rate synchronization: a slow poller lands authoritative snapshots, a
//! fast ticker interpolates the position in between, and reconciliation
//! merges the two without visible jumps.

pub mod poller;
pub mod reconcile;
pub mod snapshot;
pub mod state;
pub mod ticker;

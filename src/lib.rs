//! Now-playing mirror: poll the desktop media session, interpolate a smooth
//! position clock between polls, and expose both over HTTP.

pub mod cli;
pub mod config;
pub mod http;
pub mod net;
pub mod provider;
pub mod sync;

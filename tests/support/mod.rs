#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use playmirror::provider::{
    MediaInfo, MediaSource, ProviderError, TransportCommand, TransportSink, VolumeControl,
};

pub const CLIENT_ADDR: ([u8; 4], u16) = ([192, 168, 1, 42], 51000);

pub fn client_addr() -> SocketAddr {
    SocketAddr::from(CLIENT_ADDR)
}

pub fn playing(title: &str, position_secs: f64, duration_secs: f64) -> MediaInfo {
    MediaInfo {
        title: Some(title.to_string()),
        artist: Some("Test Artist".to_string()),
        is_playing: true,
        position_secs,
        duration_secs,
    }
}

pub fn paused(title: &str, position_secs: f64, duration_secs: f64) -> MediaInfo {
    MediaInfo {
        is_playing: false,
        ..playing(title, position_secs, duration_secs)
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    Info(MediaInfo),
    NoSession,
    Fail,
    Hang,
}

/// Scriptable media source. Counts calls so tests can check the artwork policy.
pub struct FakeSource {
    reply: Mutex<Reply>,
    artwork: Mutex<Option<Vec<u8>>>,
    pub query_calls: AtomicUsize,
    pub artwork_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(reply),
            artwork: Mutex::new(None),
            query_calls: AtomicUsize::new(0),
            artwork_calls: AtomicUsize::new(0),
        })
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn set_artwork(&self, bytes: Option<Vec<u8>>) {
        *self.artwork.lock().unwrap() = bytes;
    }

    pub fn artwork_calls(&self) -> usize {
        self.artwork_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaSource for FakeSource {
    async fn query(&self) -> Result<MediaInfo, ProviderError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply.lock().unwrap().clone();
        match reply {
            Reply::Info(info) => Ok(info),
            Reply::NoSession => Err(ProviderError::NoSession),
            Reply::Fail => Err(ProviderError::Unavailable("fake failure".to_string())),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(ProviderError::Unavailable("unreachable".to_string()))
            }
        }
    }

    async fn artwork(&self) -> Result<Option<Vec<u8>>, ProviderError> {
        self.artwork_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.artwork.lock().unwrap().clone())
    }
}

/// In-memory system volume.
pub struct FakeVolume {
    level: Mutex<u8>,
    pub fail_get: AtomicBool,
    pub sets: Mutex<Vec<u8>>,
}

impl FakeVolume {
    pub fn new(level: u8) -> Arc<Self> {
        Arc::new(Self {
            level: Mutex::new(level),
            fail_get: AtomicBool::new(false),
            sets: Mutex::new(Vec::new()),
        })
    }

    pub fn level(&self) -> u8 {
        *self.level.lock().unwrap()
    }

    pub fn set_level(&self, level: u8) {
        *self.level.lock().unwrap() = level;
    }
}

#[async_trait]
impl VolumeControl for FakeVolume {
    async fn get_volume(&self) -> Result<u8, ProviderError> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable("fake volume failure".to_string()));
        }
        Ok(self.level())
    }

    async fn set_volume(&self, percent: u8) -> Result<(), ProviderError> {
        self.sets.lock().unwrap().push(percent);
        self.set_level(percent);
        Ok(())
    }
}

/// Records every forwarded transport command.
#[derive(Default)]
pub struct FakeTransport {
    pub sent: Mutex<Vec<TransportCommand>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<TransportCommand> {
        self.sent.lock().unwrap().clone()
    }

    /// Commands are forwarded from a spawned task; wait for `n` of them.
    pub async fn wait_for(&self, n: usize) -> Vec<TransportCommand> {
        for _ in 0..200 {
            if self.sent.lock().unwrap().len() >= n {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.sent()
    }
}

#[async_trait]
impl TransportSink for FakeTransport {
    async fn send(&self, command: TransportCommand) -> Result<(), ProviderError> {
        self.sent.lock().unwrap().push(command);
        Ok(())
    }
}

/// In-memory sink for `tracing` output, installed as the thread's default
/// subscriber for the lifetime of the returned guard.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let logs = Self::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_target(true)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.buf.lock().unwrap())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Lines emitted on the `audit` target.
    pub fn audit_lines(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.contains(" audit:"))
            .collect()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

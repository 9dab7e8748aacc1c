use crate::error::MediaError;
use crate::media::{LocalStream, MediaDevices, TrackKind};
use duet_core::MediaConstraints;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Holds at most one captured stream and hands out clones of it.
#[derive(Clone)]
pub struct MediaAcquisition {
    devices: Arc<dyn MediaDevices>,
    capture_gate: Arc<Mutex<()>>,
    current: Arc<Mutex<Option<LocalStream>>>,
    generation: Arc<AtomicU64>,
}

impl MediaAcquisition {
    pub fn new(devices: Arc<dyn MediaDevices>) -> Self {
        Self {
            devices,
            capture_gate: Arc::new(Mutex::new(())),
            current: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the held stream, or captures one.
    ///
    /// Captures are serialized, so concurrent callers share one prompt and one
    /// stream. A capture that completes after `release` is stopped and discarded.
    pub async fn acquire(&self, constraints: MediaConstraints) -> Result<LocalStream, MediaError> {
        let _gate = self.capture_gate.lock().await;
        if let Some(stream) = self.current.lock().await.as_ref() {
            return Ok(stream.clone());
        }

        let generation = self.generation.load(Ordering::Acquire);
        let stream = match self.devices.capture(constraints).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("media capture failed: {}", e);
                return Err(e);
            }
        };

        if self.generation.load(Ordering::Acquire) != generation {
            stream.stop();
            return Err(MediaError::Other("media released during capture".to_owned()));
        }

        info!(
            "captured local stream {} ({} tracks)",
            stream.id(),
            stream.tracks().len()
        );
        *self.current.lock().await = Some(stream.clone());
        Ok(stream)
    }

    pub async fn current(&self) -> Option<LocalStream> {
        self.current.lock().await.clone()
    }

    /// Returns the new state, or `None` when no such track is held.
    pub async fn set_enabled(&self, kind: TrackKind, enabled: bool) -> Option<bool> {
        let current = self.current.lock().await;
        let track = current.as_ref()?.track(kind)?;
        track.set_enabled(enabled);
        Some(track.is_enabled())
    }

    pub async fn is_enabled(&self, kind: TrackKind) -> Option<bool> {
        let current = self.current.lock().await;
        current.as_ref()?.track(kind).map(|t| t.is_enabled())
    }

    /// Stops every track and forgets the stream. Returns whether one was held.
    pub async fn release(&self) -> bool {
        self.generation.fetch_add(1, Ordering::AcqRel);
        let Some(stream) = self.current.lock().await.take() else {
            return false;
        };
        stream.stop();
        info!("released local stream {}", stream.id());
        true
    }
}

use crate::error::MediaError;
use crate::media::{LocalStream, LocalTrack, TrackKind};
use async_trait::async_trait;
use duet_core::MediaConstraints;
use uuid::Uuid;

/// Capture backend. May suspend for as long as a permission prompt is open.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    async fn capture(&self, constraints: MediaConstraints) -> Result<LocalStream, MediaError>;
}

/// Sample-fed tracks the application writes encoded frames into.
#[derive(Debug, Clone, Copy)]
pub struct VirtualDevices {
    camera: bool,
    microphone: bool,
}

impl VirtualDevices {
    pub fn new() -> Self {
        Self {
            camera: true,
            microphone: true,
        }
    }

    pub fn without_camera(mut self) -> Self {
        self.camera = false;
        self
    }

    pub fn without_microphone(mut self) -> Self {
        self.microphone = false;
        self
    }
}

impl Default for VirtualDevices {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaDevices for VirtualDevices {
    async fn capture(&self, constraints: MediaConstraints) -> Result<LocalStream, MediaError> {
        if (constraints.video && !self.camera) || (constraints.audio && !self.microphone) {
            return Err(MediaError::classify(
                "NotFoundError",
                "requested capture device is not present",
            ));
        }

        let stream_id = Uuid::new_v4().to_string();
        let mut tracks = Vec::new();
        if constraints.audio {
            tracks.push(LocalTrack::new(TrackKind::Audio, &stream_id));
        }
        if constraints.video {
            tracks.push(LocalTrack::new(TrackKind::Video, &stream_id));
        }
        Ok(LocalStream::new(stream_id, tracks))
    }
}

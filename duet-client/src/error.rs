use thiserror::Error;

/// Capture failures. Non-fatal: the call options degrade, the room stays joined.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("no capture device: {0}")]
    NoDevice(String),
    #[error("capture permission denied: {0}")]
    PermissionDenied(String),
    #[error("capture failed: {0}")]
    Other(String),
}

impl MediaError {
    /// Maps a platform capture error name onto the three failure kinds.
    pub fn classify(name: &str, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match name {
            "NotFoundError" | "DevicesNotFoundError" => MediaError::NoDevice(detail),
            "NotAllowedError" | "PermissionDeniedError" => MediaError::PermissionDenied(detail),
            _ => MediaError::Other(detail),
        }
    }

    /// Banner text shown while the condition persists.
    pub fn user_message(&self) -> &'static str {
        match self {
            MediaError::NoDevice(_) => {
                "No camera or microphone found. Voice and video calls are disabled."
            }
            MediaError::PermissionDenied(_) => {
                "Permission for camera and microphone was denied. Voice and video calls are disabled."
            }
            MediaError::Other(_) => "Could not access camera or microphone.",
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("webrtc: {0}")]
    Rtc(#[from] webrtc::Error),
    #[error("data channel is not open")]
    ChannelNotOpen,
    #[error("session already torn down")]
    Closed,
    #[error("payload encoding: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("{operation} is not valid in phase {phase:?}")]
    InvalidState {
        operation: &'static str,
        phase: crate::transport::NegotiationPhase,
    },
    #[error(transparent)]
    Primitive(#[from] TransportError),
}

#[derive(Debug, Error)]
pub enum SignalingError {
    #[error("signaling encode: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("signaling delivery failed: {0}")]
    Delivery(String),
    #[error("relay connection closed")]
    Closed,
    #[error("room already left")]
    Left,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("call machine has stopped")]
    MachineStopped,
    #[error(transparent)]
    Signaling(#[from] SignalingError),
}

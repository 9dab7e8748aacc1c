use crate::error::MediaError;
use crate::media::LocalStream;
use crate::transport::RemoteStream;
use duet_core::{CallKind, ChatMessage, ClientId};
use std::fmt;

/// Lifecycle of the single call slot. "Active" is `Idle` with `connected` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallState {
    #[default]
    Idle,
    Outgoing,
    Incoming,
}

/// An offer waiting for the local user to answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingCall {
    pub call_type: CallKind,
    pub from: ClientId,
}

/// Why a call left the non-idle states or an established call went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    LocalCancel,
    LocalReject,
    RemoteCancel,
    RemoteReject,
    PeerLeft,
    ConnectionLost,
    SetupFailed,
    HangUp,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EndReason::LocalCancel => "cancelled",
            EndReason::LocalReject => "rejected",
            EndReason::RemoteCancel => "cancelled by peer",
            EndReason::RemoteReject => "rejected by peer",
            EndReason::PeerLeft => "peer left",
            EndReason::ConnectionLost => "connection lost",
            EndReason::SetupFailed => "setup failed",
            EndReason::HangUp => "hung up",
        };
        f.write_str(text)
    }
}

/// Everything a UI binds to, republished after every handled event.
#[derive(Debug, Clone, Default)]
pub struct CallView {
    pub call_state: CallState,
    pub incoming: Option<IncomingCall>,
    pub call_kind: Option<CallKind>,
    pub connected: bool,
    pub channel_open: bool,
    pub peer_present: bool,
    pub local_stream: Option<LocalStream>,
    pub remote_stream: Option<RemoteStream>,
    pub muted: bool,
    pub video_enabled: bool,
    pub media_error: Option<MediaError>,
    pub messages: Vec<ChatMessage>,
}

impl CallView {
    pub fn is_active(&self) -> bool {
        self.call_state == CallState::Idle && self.connected
    }
}

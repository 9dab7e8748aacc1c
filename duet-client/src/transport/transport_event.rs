use crate::media::TrackKind;
use bytes::Bytes;
use duet_core::ConnectivityHint;
use std::fmt;
use std::sync::Arc;
use webrtc::track::track_remote::TrackRemote;

/// Identifies one negotiation attempt. Events from older ids are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Connectivity as reported by the peer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connecting,
    Connected,
    /// Transient; the connection may recover on its own.
    Disconnected,
    Failed,
    Closed,
}

impl LinkState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LinkState::Failed | LinkState::Closed)
    }
}

/// A track received from the remote peer.
#[derive(Clone)]
pub struct RemoteTrack {
    pub kind: TrackKind,
    pub track_id: String,
    pub stream_id: String,
    /// RTP source; absent for links that do not carry real media.
    pub rtp: Option<Arc<TrackRemote>>,
}

impl fmt::Debug for RemoteTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteTrack")
            .field("kind", &self.kind)
            .field("track_id", &self.track_id)
            .field("stream_id", &self.stream_id)
            .finish()
    }
}

/// Tracks received from the peer, grouped the way the UI binds them.
#[derive(Debug, Clone, Default)]
pub struct RemoteStream {
    pub tracks: Vec<RemoteTrack>,
}

impl RemoteStream {
    pub fn has(&self, kind: TrackKind) -> bool {
        self.tracks.iter().any(|t| t.kind == kind)
    }
}

/// Events a peer link produces for the call machine.
#[derive(Debug)]
pub enum TransportEvent {
    /// Local candidate to forward to the peer over signaling.
    ConnectivityHint(SessionId, ConnectivityHint),

    RemoteTrack(SessionId, RemoteTrack),

    /// The auxiliary channel is open in both directions.
    ChannelOpened(SessionId),

    ChannelMessage(SessionId, Bytes),

    ChannelClosed(SessionId),

    StateChanged(SessionId, LinkState),
}

impl TransportEvent {
    pub fn session_id(&self) -> SessionId {
        match self {
            TransportEvent::ConnectivityHint(id, _)
            | TransportEvent::RemoteTrack(id, _)
            | TransportEvent::ChannelOpened(id)
            | TransportEvent::ChannelMessage(id, _)
            | TransportEvent::ChannelClosed(id)
            | TransportEvent::StateChanged(id, _) => *id,
        }
    }
}

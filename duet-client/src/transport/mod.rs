mod peer_link;
mod rtc_link;
mod session;
mod transport_config;
mod transport_event;

pub use peer_link::{PeerConnector, PeerLink};
pub use rtc_link::{RtcConnector, RtcLink};
pub use session::{NegotiationPhase, TransportSession};
pub use transport_config::TransportConfig;
pub use transport_event::{LinkState, RemoteStream, RemoteTrack, SessionId, TransportEvent};

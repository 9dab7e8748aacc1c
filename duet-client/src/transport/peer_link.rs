use crate::error::TransportError;
use crate::media::LocalStream;
use crate::transport::{SessionId, TransportConfig, TransportEvent};
use async_trait::async_trait;
use duet_core::ConnectivityHint;
use tokio::sync::mpsc;

/// One peer connection plus its auxiliary channel.
///
/// Methods map one-to-one onto the negotiation primitive. Phase checks live in
/// [`TransportSession`](crate::transport::TransportSession), not here.
#[async_trait]
pub trait PeerLink: Send + Sync {
    async fn create_data_channel(&self, label: &str) -> Result<(), TransportError>;

    /// Creates an offer and installs it as the local description.
    async fn create_offer(&self) -> Result<String, TransportError>;

    async fn set_remote_offer(&self, sdp: String) -> Result<(), TransportError>;

    /// Creates an answer and installs it as the local description.
    async fn create_answer(&self) -> Result<String, TransportError>;

    async fn set_remote_answer(&self, sdp: String) -> Result<(), TransportError>;

    async fn add_remote_hint(&self, hint: ConnectivityHint) -> Result<(), TransportError>;

    async fn send_text(&self, text: String) -> Result<(), TransportError>;

    /// Silences every handler, then closes channel and connection.
    async fn close(&self) -> Result<(), TransportError>;
}

/// Opens fresh peer links. Events for the link go to `events`, tagged with `id`.
#[async_trait]
pub trait PeerConnector: Send + Sync {
    async fn open(
        &self,
        id: SessionId,
        config: &TransportConfig,
        local: Option<&LocalStream>,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerLink>, TransportError>;
}

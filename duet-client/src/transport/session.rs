use crate::error::{NegotiationError, TransportError};
use crate::media::LocalStream;
use crate::transport::peer_link::{PeerConnector, PeerLink};
use crate::transport::{SessionId, TransportConfig, TransportEvent};
use duet_core::{ChannelPayload, ConnectivityHint};
use std::collections::VecDeque;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Where the offer/answer exchange currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationPhase {
    Stable,
    HaveLocalOffer,
    HaveRemoteOffer,
    Closed,
}

/// One negotiation attempt: a peer link, its channel, and the early-hint buffer.
pub struct TransportSession {
    id: SessionId,
    link: Box<dyn PeerLink>,
    phase: NegotiationPhase,
    remote_applied: bool,
    channel_created: bool,
    pending_hints: VecDeque<ConnectivityHint>,
}

impl TransportSession {
    pub async fn create(
        connector: &dyn PeerConnector,
        id: SessionId,
        config: &TransportConfig,
        local: Option<&LocalStream>,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Self, TransportError> {
        let link = connector.open(id, config, local, events).await?;
        info!(
            "{}: transport created ({} local tracks)",
            id,
            local.map_or(0, |s| s.tracks().len())
        );

        Ok(Self {
            id,
            link,
            phase: NegotiationPhase::Stable,
            remote_applied: false,
            channel_created: false,
            pending_hints: VecDeque::new(),
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> NegotiationPhase {
        self.phase
    }

    pub fn has_remote_description(&self) -> bool {
        self.remote_applied
    }

    pub fn pending_hints(&self) -> usize {
        self.pending_hints.len()
    }

    fn expect_phase(
        &self,
        operation: &'static str,
        expected: NegotiationPhase,
    ) -> Result<(), NegotiationError> {
        if self.phase != expected {
            return Err(NegotiationError::InvalidState {
                operation,
                phase: self.phase,
            });
        }
        Ok(())
    }

    /// Only the initiating side, before its offer.
    pub async fn create_data_channel(&mut self, label: &str) -> Result<(), NegotiationError> {
        self.expect_phase("create_data_channel", NegotiationPhase::Stable)?;
        if self.remote_applied || self.channel_created {
            return Err(NegotiationError::InvalidState {
                operation: "create_data_channel",
                phase: self.phase,
            });
        }
        self.link.create_data_channel(label).await?;
        self.channel_created = true;
        Ok(())
    }

    pub async fn generate_offer(&mut self) -> Result<String, NegotiationError> {
        self.expect_phase("generate_offer", NegotiationPhase::Stable)?;
        let sdp = self.link.create_offer().await?;
        self.phase = NegotiationPhase::HaveLocalOffer;
        Ok(sdp)
    }

    pub async fn accept_offer(&mut self, sdp: String) -> Result<(), NegotiationError> {
        self.expect_phase("accept_offer", NegotiationPhase::Stable)?;
        self.link.set_remote_offer(sdp).await?;
        self.phase = NegotiationPhase::HaveRemoteOffer;
        self.remote_applied = true;
        self.drain_hints().await;
        Ok(())
    }

    pub async fn generate_answer(&mut self) -> Result<String, NegotiationError> {
        self.expect_phase("generate_answer", NegotiationPhase::HaveRemoteOffer)?;
        let sdp = self.link.create_answer().await?;
        self.phase = NegotiationPhase::Stable;
        Ok(sdp)
    }

    pub async fn accept_answer(&mut self, sdp: String) -> Result<(), NegotiationError> {
        self.expect_phase("accept_answer", NegotiationPhase::HaveLocalOffer)?;
        self.link.set_remote_answer(sdp).await?;
        self.phase = NegotiationPhase::Stable;
        self.remote_applied = true;
        self.drain_hints().await;
        Ok(())
    }

    /// Applies a remote hint now, or queues it until the remote description lands.
    pub async fn add_remote_hint(&mut self, hint: ConnectivityHint) {
        if self.phase == NegotiationPhase::Closed {
            return;
        }
        if !self.remote_applied {
            debug!("{}: buffering early connectivity hint", self.id);
            self.pending_hints.push_back(hint);
            return;
        }
        self.apply_hint(hint).await;
    }

    async fn apply_hint(&self, hint: ConnectivityHint) {
        if let Err(e) = self.link.add_remote_hint(hint).await {
            warn!("{}: failed to add remote connectivity hint: {}", self.id, e);
        }
    }

    async fn drain_hints(&mut self) {
        if self.pending_hints.is_empty() {
            return;
        }
        debug!(
            "{}: flushing {} buffered connectivity hints",
            self.id,
            self.pending_hints.len()
        );
        while let Some(hint) = self.pending_hints.pop_front() {
            self.apply_hint(hint).await;
        }
    }

    pub async fn send(&self, payload: &ChannelPayload) -> Result<(), TransportError> {
        if self.phase == NegotiationPhase::Closed {
            return Err(TransportError::Closed);
        }
        self.link.send_text(payload.encode()?).await
    }

    /// Closes everything the session owns. Safe to call repeatedly.
    pub async fn teardown(&mut self) {
        if self.phase == NegotiationPhase::Closed {
            return;
        }
        self.phase = NegotiationPhase::Closed;
        self.pending_hints.clear();

        if let Err(e) = self.link.close().await {
            warn!("{}: error while closing transport: {}", self.id, e);
        }
        info!("{}: transport torn down", self.id);
    }
}

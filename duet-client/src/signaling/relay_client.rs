use crate::error::SignalingError;
use async_trait::async_trait;
use duet_core::{ClientId, PresenceUpdate, RelayMessage};
use serde_json::Value;
use tokio::sync::mpsc;

/// Inbound streams for one channel subscription. Both close when the
/// subscription ends.
#[derive(Debug)]
pub struct RelaySubscription {
    pub messages: mpsc::UnboundedReceiver<RelayMessage>,
    pub presence: mpsc::UnboundedReceiver<PresenceUpdate>,
}

/// Pub/sub with presence, scoped by channel name.
#[async_trait]
pub trait RelayClient: Send + Sync {
    fn client_id(&self) -> ClientId;

    async fn subscribe(&self, channel: &str) -> Result<RelaySubscription, SignalingError>;

    async fn unsubscribe(&self, channel: &str) -> Result<(), SignalingError>;

    /// Delivered to every subscriber of `channel`, the publisher included.
    async fn publish(&self, channel: &str, name: &str, data: Value)
    -> Result<(), SignalingError>;

    async fn enter_presence(&self, channel: &str) -> Result<(), SignalingError>;

    async fn leave_presence(&self, channel: &str) -> Result<(), SignalingError>;

    async fn members(&self, channel: &str) -> Result<Vec<ClientId>, SignalingError>;
}

use crate::error::SignalingError;
use crate::signaling::{RelayClient, RelaySubscription};
use duet_core::{ClientId, PresenceUpdate, RelayMessage, SignalMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// What the room forwards to the call machine, in relay delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    Signal(SignalMessage),
    Presence(PresenceUpdate),
}

/// One subscription to a room's signaling channel.
pub struct SignalingRoom {
    relay: Arc<dyn RelayClient>,
    channel: String,
    event_name: String,
    me: ClientId,
    forwarder: Option<JoinHandle<()>>,
}

impl SignalingRoom {
    pub async fn join(
        relay: Arc<dyn RelayClient>,
        channel: String,
        event_name: String,
    ) -> Result<(Self, mpsc::UnboundedReceiver<RoomEvent>), SignalingError> {
        let me = relay.client_id();
        let subscription = relay.subscribe(&channel).await?;
        let (tx, rx) = mpsc::unbounded_channel();

        let forwarder = tokio::spawn(forward(
            subscription,
            me.clone(),
            event_name.clone(),
            tx,
        ));
        info!("{} joined signaling channel {}", me, channel);

        Ok((
            Self {
                relay,
                channel,
                event_name,
                me,
                forwarder: Some(forwarder),
            },
            rx,
        ))
    }

    pub fn local_id(&self) -> &ClientId {
        &self.me
    }

    pub fn has_left(&self) -> bool {
        self.forwarder.is_none()
    }

    pub async fn publish(&self, message: &SignalMessage) -> Result<(), SignalingError> {
        if self.has_left() {
            return Err(SignalingError::Left);
        }
        debug!("{} -> {} ({})", self.me, self.channel, message.kind());
        let data = serde_json::to_value(message)?;
        self.relay
            .publish(&self.channel, &self.event_name, data)
            .await
    }

    pub async fn announce_presence(&self) -> Result<(), SignalingError> {
        if self.has_left() {
            return Err(SignalingError::Left);
        }
        self.relay.enter_presence(&self.channel).await
    }

    /// Other clients currently present on the channel.
    pub async fn current_members(&self) -> Result<Vec<ClientId>, SignalingError> {
        if self.has_left() {
            return Err(SignalingError::Left);
        }
        let mut members = self.relay.members(&self.channel).await?;
        members.retain(|m| m != &self.me);
        Ok(members)
    }

    /// Stops forwarding, leaves presence and unsubscribes. Later calls do nothing.
    pub async fn leave(&mut self) {
        let Some(forwarder) = self.forwarder.take() else {
            return;
        };
        forwarder.abort();

        if let Err(e) = self.relay.leave_presence(&self.channel).await {
            warn!("{}: leaving presence failed: {}", self.channel, e);
        }
        if let Err(e) = self.relay.unsubscribe(&self.channel).await {
            warn!("{}: unsubscribe failed: {}", self.channel, e);
        }
        info!("{} left signaling channel {}", self.me, self.channel);
    }
}

impl Drop for SignalingRoom {
    fn drop(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
    }
}

async fn forward(
    mut subscription: RelaySubscription,
    me: ClientId,
    event_name: String,
    tx: mpsc::UnboundedSender<RoomEvent>,
) {
    let mut messages_open = true;
    let mut presence_open = true;

    while messages_open || presence_open {
        let event = tokio::select! {
            msg = subscription.messages.recv(), if messages_open => match msg {
                Some(msg) => decode_signal(msg, &me, &event_name).map(RoomEvent::Signal),
                None => {
                    messages_open = false;
                    None
                }
            },
            update = subscription.presence.recv(), if presence_open => match update {
                Some(update) if update.client_id != me => Some(RoomEvent::Presence(update)),
                Some(_) => None,
                None => {
                    presence_open = false;
                    None
                }
            },
        };

        if let Some(event) = event {
            if tx.send(event).is_err() {
                break;
            }
        }
    }
    debug!("signaling forwarder for {} stopped", me);
}

fn decode_signal(msg: RelayMessage, me: &ClientId, event_name: &str) -> Option<SignalMessage> {
    if msg.name != event_name {
        return None;
    }
    let signal = match serde_json::from_value::<SignalMessage>(msg.data) {
        Ok(signal) => signal,
        Err(e) => {
            warn!("dropping malformed signal from {}: {}", msg.client_id, e);
            return None;
        }
    };
    // Our own publishes come back on the shared channel.
    if signal.from() == me {
        return None;
    }
    Some(signal)
}

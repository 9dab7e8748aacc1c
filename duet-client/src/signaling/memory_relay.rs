use crate::error::SignalingError;
use crate::signaling::{RelayClient, RelaySubscription};
use async_trait::async_trait;
use dashmap::DashMap;
use duet_core::{ClientId, PresenceAction, PresenceUpdate, RelayMessage};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

struct Subscriber {
    messages: mpsc::UnboundedSender<RelayMessage>,
    presence: mpsc::UnboundedSender<PresenceUpdate>,
}

#[derive(Default)]
struct ChannelState {
    subscribers: HashMap<ClientId, Subscriber>,
    present: Vec<ClientId>,
}

impl ChannelState {
    fn broadcast_presence(&self, update: PresenceUpdate) {
        for sub in self.subscribers.values() {
            let _ = sub.presence.send(update.clone());
        }
    }
}

/// In-process relay hub. Every client handed out shares the same channels.
#[derive(Clone, Default)]
pub struct MemoryRelay {
    channels: Arc<DashMap<String, ChannelState>>,
}

impl MemoryRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(&self) -> MemoryRelayClient {
        self.client_with_id(ClientId::new())
    }

    pub fn client_with_id(&self, id: impl Into<ClientId>) -> MemoryRelayClient {
        MemoryRelayClient {
            id: id.into(),
            relay: self.clone(),
        }
    }

    /// Drops a client from every channel, as a lost connection would.
    pub fn disconnect(&self, id: &ClientId) {
        for mut channel in self.channels.iter_mut() {
            channel.subscribers.remove(id);
            let before = channel.present.len();
            channel.present.retain(|m| m != id);
            if channel.present.len() != before {
                channel.broadcast_presence(PresenceUpdate {
                    action: PresenceAction::Leave,
                    client_id: id.clone(),
                });
            }
        }
    }

    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .get(channel)
            .map_or(0, |c| c.subscribers.len())
    }
}

#[derive(Clone)]
pub struct MemoryRelayClient {
    id: ClientId,
    relay: MemoryRelay,
}

#[async_trait]
impl RelayClient for MemoryRelayClient {
    fn client_id(&self) -> ClientId {
        self.id.clone()
    }

    async fn subscribe(&self, channel: &str) -> Result<RelaySubscription, SignalingError> {
        let (msg_tx, messages) = mpsc::unbounded_channel();
        let (presence_tx, presence) = mpsc::unbounded_channel();

        let mut state = self.relay.channels.entry(channel.to_owned()).or_default();
        state.subscribers.insert(
            self.id.clone(),
            Subscriber {
                messages: msg_tx,
                presence: presence_tx,
            },
        );
        debug!("{} subscribed to {}", self.id, channel);

        Ok(RelaySubscription { messages, presence })
    }

    async fn unsubscribe(&self, channel: &str) -> Result<(), SignalingError> {
        if let Some(mut state) = self.relay.channels.get_mut(channel) {
            state.subscribers.remove(&self.id);
        }
        Ok(())
    }

    async fn publish(
        &self,
        channel: &str,
        name: &str,
        data: Value,
    ) -> Result<(), SignalingError> {
        let Some(state) = self.relay.channels.get(channel) else {
            return Ok(());
        };
        let message = RelayMessage {
            name: name.to_owned(),
            client_id: self.id.clone(),
            data,
        };
        for sub in state.subscribers.values() {
            let _ = sub.messages.send(message.clone());
        }
        Ok(())
    }

    async fn enter_presence(&self, channel: &str) -> Result<(), SignalingError> {
        let mut state = self.relay.channels.entry(channel.to_owned()).or_default();
        if !state.present.contains(&self.id) {
            state.present.push(self.id.clone());
        }
        state.broadcast_presence(PresenceUpdate {
            action: PresenceAction::Enter,
            client_id: self.id.clone(),
        });
        Ok(())
    }

    async fn leave_presence(&self, channel: &str) -> Result<(), SignalingError> {
        let Some(mut state) = self.relay.channels.get_mut(channel) else {
            return Ok(());
        };
        let before = state.present.len();
        state.present.retain(|m| m != &self.id);
        if state.present.len() != before {
            state.broadcast_presence(PresenceUpdate {
                action: PresenceAction::Leave,
                client_id: self.id.clone(),
            });
        }
        Ok(())
    }

    async fn members(&self, channel: &str) -> Result<Vec<ClientId>, SignalingError> {
        Ok(self
            .relay
            .channels
            .get(channel)
            .map(|c| c.present.clone())
            .unwrap_or_default())
    }
}

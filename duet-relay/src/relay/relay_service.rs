use dashmap::DashMap;
use duet_core::{
    ClientFrame, ClientId, PresenceAction, PresenceUpdate, RelayMessage, ServerFrame,
};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Default)]
struct ChannelMembers {
    subscribers: HashSet<ClientId>,
    /// Presence set, in entry order.
    present: Vec<ClientId>,
}

impl ChannelMembers {
    fn is_empty(&self) -> bool {
        self.subscribers.is_empty() && self.present.is_empty()
    }
}

struct RelayInner {
    clients: DashMap<ClientId, mpsc::UnboundedSender<ServerFrame>>,
    channels: DashMap<String, ChannelMembers>,
}

/// Channel pub/sub and presence for every connected client.
#[derive(Clone)]
pub struct RelayService {
    inner: Arc<RelayInner>,
}

impl Default for RelayService {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RelayInner {
                clients: DashMap::new(),
                channels: DashMap::new(),
            }),
        }
    }

    pub fn add_client(&self, client_id: ClientId, tx: mpsc::UnboundedSender<ServerFrame>) {
        self.inner.clients.insert(client_id, tx);
    }

    /// Forgets a client. Channels where it was present see a `Leave`.
    pub fn remove_client(&self, client_id: &ClientId) {
        self.inner.clients.remove(client_id);

        let channels: Vec<String> = self
            .inner
            .channels
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        for channel in channels {
            self.unsubscribe(client_id, &channel);
            self.leave(client_id, &channel);
        }
        self.inner.channels.retain(|_, members| !members.is_empty());
    }

    pub fn client_count(&self) -> usize {
        self.inner.clients.len()
    }

    pub fn handle_frame(&self, client_id: &ClientId, frame: ClientFrame) {
        match frame {
            ClientFrame::Subscribe { channel } => self.subscribe(client_id, &channel),
            ClientFrame::Unsubscribe { channel } => self.unsubscribe(client_id, &channel),
            ClientFrame::Publish {
                channel,
                name,
                data,
            } => self.publish(client_id, &channel, name, data),
            ClientFrame::PresenceEnter { channel } => self.enter(client_id, &channel),
            ClientFrame::PresenceLeave { channel } => self.leave(client_id, &channel),
            ClientFrame::PresenceGet {
                channel,
                request_id,
            } => {
                let members = self.members(&channel);
                self.send(
                    client_id,
                    ServerFrame::Members {
                        request_id,
                        members,
                    },
                );
            }
        }
    }

    pub fn subscribe(&self, client_id: &ClientId, channel: &str) {
        self.inner
            .channels
            .entry(channel.to_owned())
            .or_default()
            .subscribers
            .insert(client_id.clone());
        debug!("{} subscribed to {}", client_id, channel);
    }

    pub fn unsubscribe(&self, client_id: &ClientId, channel: &str) {
        if let Some(mut members) = self.inner.channels.get_mut(channel) {
            members.subscribers.remove(client_id);
        }
    }

    /// Fans a message out to every subscriber, the publisher included.
    pub fn publish(&self, client_id: &ClientId, channel: &str, name: String, data: Value) {
        let message = RelayMessage {
            name,
            client_id: client_id.clone(),
            data,
        };
        for subscriber in self.subscribers(channel) {
            self.send(
                &subscriber,
                ServerFrame::Message {
                    channel: channel.to_owned(),
                    message: message.clone(),
                },
            );
        }
    }

    pub fn enter(&self, client_id: &ClientId, channel: &str) {
        {
            let mut members = self.inner.channels.entry(channel.to_owned()).or_default();
            if !members.present.contains(client_id) {
                members.present.push(client_id.clone());
            }
        }
        info!("{} entered {}", client_id, channel);
        self.broadcast_presence(channel, PresenceAction::Enter, client_id);
    }

    pub fn leave(&self, client_id: &ClientId, channel: &str) {
        let removed = match self.inner.channels.get_mut(channel) {
            Some(mut members) => {
                let before = members.present.len();
                members.present.retain(|m| m != client_id);
                members.present.len() != before
            }
            None => false,
        };
        if removed {
            info!("{} left {}", client_id, channel);
            self.broadcast_presence(channel, PresenceAction::Leave, client_id);
        }
    }

    pub fn members(&self, channel: &str) -> Vec<ClientId> {
        self.inner
            .channels
            .get(channel)
            .map(|m| m.present.clone())
            .unwrap_or_default()
    }

    pub fn send(&self, client_id: &ClientId, frame: ServerFrame) {
        if let Some(client) = self.inner.clients.get(client_id) {
            if let Err(e) = client.send(frame) {
                warn!("Failed to queue frame for {}: {}", client_id, e);
            }
        } else {
            debug!("Dropping frame for disconnected client {}", client_id);
        }
    }

    fn subscribers(&self, channel: &str) -> Vec<ClientId> {
        self.inner
            .channels
            .get(channel)
            .map(|m| m.subscribers.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn broadcast_presence(&self, channel: &str, action: PresenceAction, client_id: &ClientId) {
        let update = PresenceUpdate {
            action,
            client_id: client_id.clone(),
        };
        for subscriber in self.subscribers(channel) {
            self.send(
                &subscriber,
                ServerFrame::Presence {
                    channel: channel.to_owned(),
                    update: update.clone(),
                },
            );
        }
    }
}

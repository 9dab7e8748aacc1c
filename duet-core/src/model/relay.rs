use crate::model::client::ClientId;
use serde::{Deserialize, Serialize};

/// A message published on a relay channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayMessage {
    pub name: String,
    pub client_id: ClientId,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceAction {
    Enter,
    Present,
    Leave,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceUpdate {
    pub action: PresenceAction,
    pub client_id: ClientId,
}

/// Frames a client sends to the relay server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum ClientFrame {
    Subscribe {
        channel: String,
    },
    Unsubscribe {
        channel: String,
    },
    Publish {
        channel: String,
        name: String,
        data: serde_json::Value,
    },
    PresenceEnter {
        channel: String,
    },
    PresenceLeave {
        channel: String,
    },
    PresenceGet {
        channel: String,
        request_id: u64,
    },
}

/// Frames the relay server sends to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum ServerFrame {
    Welcome {
        client_id: ClientId,
    },
    Message {
        channel: String,
        message: RelayMessage,
    },
    Presence {
        channel: String,
        update: PresenceUpdate,
    },
    Members {
        request_id: u64,
        members: Vec<ClientId>,
    },
    Error {
        reason: String,
    },
}

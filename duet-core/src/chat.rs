//! Chat message log shared by both peers.
//!
//! Messages keep the id they were created with on the sending side, so the
//! live copy, the peer's copy and the history copy all match by id.

use crate::model::{ChatPayload, ReplySnapshot};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Where a message in the local log came from. Never sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageOrigin {
    Local,
    Peer,
    History,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub username: String,
    pub timestamp: String,
    pub replying_to: Option<ReplySnapshot>,
    /// emoji -> usernames that applied it
    pub reactions: BTreeMap<String, BTreeSet<String>>,
    pub origin: MessageOrigin,
}

impl ChatMessage {
    pub fn from_payload(payload: ChatPayload, origin: MessageOrigin) -> Self {
        Self {
            id: payload.id,
            text: payload.text,
            username: payload.username,
            timestamp: payload.timestamp,
            replying_to: payload.replying_to,
            reactions: BTreeMap::new(),
            origin,
        }
    }

    pub fn to_payload(&self) -> ChatPayload {
        ChatPayload {
            id: self.id.clone(),
            text: self.text.clone(),
            username: self.username.clone(),
            timestamp: self.timestamp.clone(),
            replying_to: self.replying_to.clone(),
        }
    }

    pub fn snapshot(&self) -> ReplySnapshot {
        ReplySnapshot {
            id: self.id.clone(),
            text: self.text.clone(),
            username: self.username.clone(),
        }
    }

    pub fn reacted(&self, emoji: &str, username: &str) -> bool {
        self.reactions
            .get(emoji)
            .is_some_and(|users| users.contains(username))
    }
}

/// `HH:MM` in local time, the format shown next to each message.
pub fn display_time(at: DateTime<Local>) -> String {
    at.format("%H:%M").to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    messages: Vec<ChatMessage>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn get(&self, id: &str) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn reply_snapshot(&self, id: &str) -> Option<ReplySnapshot> {
        self.get(id).map(ChatMessage::snapshot)
    }

    /// Adds `username` to the emoji set of a message, or removes it if present.
    ///
    /// Returns `Some(true)` when the reaction is now applied, `Some(false)` when
    /// it was removed, `None` when the message is unknown. Empty sets are dropped.
    pub fn toggle_reaction(&mut self, message_id: &str, emoji: &str, username: &str) -> Option<bool> {
        let message = self.messages.iter_mut().find(|m| m.id == message_id)?;
        let users = message.reactions.entry(emoji.to_owned()).or_default();

        let applied = if users.remove(username) {
            false
        } else {
            users.insert(username.to_owned());
            true
        };

        if users.is_empty() {
            message.reactions.remove(emoji);
        }
        Some(applied)
    }

    /// Prepends history entries the log does not already hold, keeping their order.
    ///
    /// Returns how many entries were added.
    pub fn merge_history(&mut self, history: Vec<ChatMessage>) -> usize {
        let fresh: Vec<ChatMessage> = history
            .into_iter()
            .filter(|m| !self.contains(&m.id))
            .collect();
        let added = fresh.len();

        if added > 0 {
            let live = std::mem::take(&mut self.messages);
            self.messages = fresh;
            self.messages.extend(live);
        }
        added
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn as_slice(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn to_vec(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }
}

//! Persistent chat history collaborator.
//!
//! The call machine fetches one page at join and appends every chat message
//! and reaction it sends. Failures on either path are logged and ignored.

use crate::error::HistoryError;
use async_trait::async_trait;
use duet_core::{ChatMessage, MessageLog, MessageOrigin};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryRecord {
    Chat(ChatMessage),
    Reaction {
        message_id: String,
        emoji: String,
        username: String,
    },
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// One page of messages, oldest first. Page 1 holds the newest `limit` entries.
    async fn fetch(&self, limit: usize, page: usize) -> Result<Vec<ChatMessage>, HistoryError>;

    async fn append(&self, record: HistoryRecord) -> Result<(), HistoryError>;
}

/// Process-local store. Reactions are folded into the stored messages.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    log: Mutex<MessageLog>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        let mut log = MessageLog::new();
        for message in messages {
            log.push(message);
        }
        Self {
            log: Mutex::new(log),
        }
    }

    pub fn len(&self) -> usize {
        self.log.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<ChatMessage> {
        self.log.lock().ok()?.get(id).cloned()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistory {
    async fn fetch(&self, limit: usize, page: usize) -> Result<Vec<ChatMessage>, HistoryError> {
        let log = self
            .log
            .lock()
            .map_err(|e| HistoryError::Unavailable(e.to_string()))?;
        let all = log.as_slice();

        let skip = limit.saturating_mul(page.saturating_sub(1));
        let end = all.len().saturating_sub(skip);
        let start = end.saturating_sub(limit);

        Ok(all[start..end]
            .iter()
            .cloned()
            .map(|mut m| {
                m.origin = MessageOrigin::History;
                m
            })
            .collect())
    }

    async fn append(&self, record: HistoryRecord) -> Result<(), HistoryError> {
        let mut log = self
            .log
            .lock()
            .map_err(|e| HistoryError::Unavailable(e.to_string()))?;
        match record {
            HistoryRecord::Chat(message) => {
                if !log.contains(&message.id) {
                    log.push(message);
                }
            }
            HistoryRecord::Reaction {
                message_id,
                emoji,
                username,
            } => {
                log.toggle_reaction(&message_id, &emoji, &username);
            }
        }
        Ok(())
    }
}

use chrono::{DateTime, Local};
use duet_core::chat::display_time;
use duet_core::{CanvasEvent, ChannelPayload, ChatMessage, MessageLog, MessageOrigin};
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

/// Result of applying one inbound payload to the local log.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// A new message was appended.
    Chat(ChatMessage),
    /// `applied` is false when the toggle removed the reaction.
    Reaction {
        message_id: String,
        emoji: String,
        username: String,
        applied: bool,
    },
    /// Reaction for a message the log does not hold.
    UnknownTarget,
    Canvas(CanvasEvent),
}

/// Applies application-level payloads to the message log.
pub struct ChannelDispatch;

impl ChannelDispatch {
    pub fn apply(log: &mut MessageLog, payload: ChannelPayload) -> Dispatched {
        match payload {
            ChannelPayload::Chat(chat) => {
                let message = ChatMessage::from_payload(chat, MessageOrigin::Peer);
                log.push(message.clone());
                Dispatched::Chat(message)
            }
            ChannelPayload::Reaction {
                message_id,
                emoji,
                username,
            } => match log.toggle_reaction(&message_id, &emoji, &username) {
                Some(applied) => Dispatched::Reaction {
                    message_id,
                    emoji,
                    username,
                    applied,
                },
                None => {
                    debug!("reaction for unknown message {}", message_id);
                    Dispatched::UnknownTarget
                }
            },
            ChannelPayload::Draw(draw) => Dispatched::Canvas(CanvasEvent::Draw(draw)),
            ChannelPayload::Text(text) => Dispatched::Canvas(CanvasEvent::Text(text)),
            ChannelPayload::Clear => Dispatched::Canvas(CanvasEvent::Clear),
        }
    }
}

/// Builds a local chat message. A reply target missing from the log is dropped.
pub fn compose_chat(
    log: &MessageLog,
    username: &str,
    text: String,
    reply_to: Option<&str>,
    now: DateTime<Local>,
) -> ChatMessage {
    ChatMessage {
        id: Uuid::new_v4().to_string(),
        text,
        username: username.to_owned(),
        timestamp: display_time(now),
        replying_to: reply_to.and_then(|id| log.reply_snapshot(id)),
        reactions: BTreeMap::new(),
        origin: MessageOrigin::Local,
    }
}

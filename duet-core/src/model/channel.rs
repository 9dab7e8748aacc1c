use serde::{Deserialize, Serialize};

/// Snapshot of the message being replied to, copied at send time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplySnapshot {
    pub id: String,
    pub text: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub id: String,
    pub text: String,
    pub username: String,
    pub timestamp: String,
    #[serde(
        rename = "replyingTo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub replying_to: Option<ReplySnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawTool {
    Pen,
    Eraser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawEvent {
    pub tool: DrawTool,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub color: String,
    #[serde(rename = "lineWidth")]
    pub line_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEvent {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub color: String,
    pub font: String,
}

/// Transient canvas operations, delivered in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    Draw(DrawEvent),
    Text(TextEvent),
    Clear,
}

/// Everything that travels over the auxiliary data channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChannelPayload {
    Chat(ChatPayload),
    Reaction {
        #[serde(rename = "messageId")]
        message_id: String,
        emoji: String,
        username: String,
    },
    Draw(DrawEvent),
    Text(TextEvent),
    Clear,
}

impl ChannelPayload {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

impl From<CanvasEvent> for ChannelPayload {
    fn from(event: CanvasEvent) -> Self {
        match event {
            CanvasEvent::Draw(draw) => ChannelPayload::Draw(draw),
            CanvasEvent::Text(text) => ChannelPayload::Text(text),
            CanvasEvent::Clear => ChannelPayload::Clear,
        }
    }
}

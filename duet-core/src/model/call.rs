use serde::{Deserialize, Serialize};
use std::fmt;

/// What the caller wants the call to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    Voice,
    Video,
    Canvas,
    Chat,
}

/// Which capture devices a call needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub video: bool,
    pub audio: bool,
}

impl CallKind {
    /// `None` for calls that only use the data channel.
    pub fn media_constraints(self) -> Option<MediaConstraints> {
        match self {
            CallKind::Voice => Some(MediaConstraints {
                video: false,
                audio: true,
            }),
            CallKind::Video => Some(MediaConstraints {
                video: true,
                audio: true,
            }),
            CallKind::Canvas | CallKind::Chat => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CallKind::Voice => "voice",
            CallKind::Video => "video",
            CallKind::Canvas => "canvas",
            CallKind::Chat => "chat",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

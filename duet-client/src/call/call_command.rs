use crate::media::TrackKind;
use duet_core::{CallKind, CanvasEvent};
use tokio::sync::oneshot;

/// Requests from the application to the call machine.
#[derive(Debug)]
pub enum CallCommand {
    StartCall(CallKind),
    AcceptCall,
    RejectCall,
    CancelCall,

    /// Leaves the room and stops the machine. `done` fires once everything is released.
    HangUp {
        done: oneshot::Sender<()>,
    },

    SendChat {
        text: String,
        reply_to: Option<String>,
    },
    React {
        message_id: String,
        emoji: String,
    },
    SendCanvas(CanvasEvent),

    SetTrackEnabled {
        kind: TrackKind,
        enabled: bool,
    },
    ToggleMute,
    ToggleVideo,
}

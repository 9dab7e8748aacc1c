mod call;
mod channel;
mod client;
mod relay;
mod room;
mod signaling;

pub use call::{CallKind, MediaConstraints};
pub use channel::{
    CanvasEvent, ChannelPayload, ChatPayload, DrawEvent, DrawTool, ReplySnapshot, TextEvent,
};
pub use client::ClientId;
pub use relay::{ClientFrame, PresenceAction, PresenceUpdate, RelayMessage, ServerFrame};
pub use room::RoomName;
pub use signaling::{ConnectivityHint, IceServerConfig, SIGNAL_EVENT, SignalMessage};

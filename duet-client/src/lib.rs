pub mod call;
pub mod channel;
pub mod config;
pub mod error;
pub mod history;
pub mod media;
pub mod signaling;
pub mod transport;

pub use call::{
    CallEvents, CallHandle, CallState, CallView, ClientContext, EndReason, IncomingCall,
    join_room,
};
pub use config::ClientConfig;
pub use error::{
    ClientError, ConfigError, HistoryError, MediaError, NegotiationError, SignalingError,
    TransportError,
};

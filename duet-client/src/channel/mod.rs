mod protocol;

pub use protocol::{ChannelDispatch, Dispatched, compose_chat};

mod memory_relay;
mod relay_client;
mod signaling_room;
mod ws_relay;

pub use memory_relay::{MemoryRelay, MemoryRelayClient};
pub use relay_client::{RelayClient, RelaySubscription};
pub use signaling_room::{RoomEvent, SignalingRoom};
pub use ws_relay::WsRelayClient;

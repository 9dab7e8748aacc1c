pub mod test_peer;

pub use fake_devices::*;
pub use fake_transport::*;
pub use recording_events::*;
pub use test_peer::*;

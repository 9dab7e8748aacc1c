mod acquisition;
mod devices;
mod local_stream;

pub use acquisition::MediaAcquisition;
pub use devices::{MediaDevices, VirtualDevices};
pub use local_stream::{LocalStream, LocalTrack, TrackKind};

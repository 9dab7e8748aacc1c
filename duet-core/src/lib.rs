pub mod chat;
pub mod model;

pub use chat::{ChatMessage, MessageLog, MessageOrigin};
pub use model::*;

mod call_command;
mod call_events;
mod call_machine;
mod call_state;
mod handle;

pub use call_command::CallCommand;
pub use call_events::{CallEvents, NoopEvents};
pub use call_machine::CallMachine;
pub use call_state::{CallState, CallView, EndReason, IncomingCall};
pub use handle::{CallHandle, ClientContext, join_room};

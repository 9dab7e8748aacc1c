use crate::call::{EndReason, IncomingCall};
use crate::error::MediaError;
use crate::transport::RemoteStream;
use async_trait::async_trait;
use duet_core::{CallKind, CanvasEvent, ChatMessage};

/// Application callbacks. Every method defaults to doing nothing.
///
/// Called from the call machine task; a slow callback delays the next event.
#[async_trait]
pub trait CallEvents: Send + Sync {
    async fn on_incoming_call(&self, _call: IncomingCall) {}

    async fn on_call_accepted(&self, _kind: CallKind) {}

    async fn on_call_ended(&self, _reason: EndReason) {}

    async fn on_chat_message(&self, _message: ChatMessage) {}

    async fn on_canvas_event(&self, _event: CanvasEvent) {}

    async fn on_remote_stream(&self, _stream: RemoteStream) {}

    async fn on_media_error(&self, _error: MediaError) {}
}

/// Observer for callers that only read [`CallView`](crate::call::CallView).
pub struct NoopEvents;

impl CallEvents for NoopEvents {}

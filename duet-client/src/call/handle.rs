use crate::call::call_machine::{CallMachine, MachineParts};
use crate::call::{CallCommand, CallEvents, CallView, NoopEvents};
use crate::config::ClientConfig;
use crate::error::{ClientError, SignalingError};
use crate::history::{HistoryStore, MemoryHistory};
use crate::media::{MediaAcquisition, MediaDevices, TrackKind, VirtualDevices};
use crate::signaling::{RelayClient, SignalingRoom};
use crate::transport::{PeerConnector, RtcConnector};
use duet_core::{CallKind, CanvasEvent, ClientId, RoomName};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::info;

/// Collaborators a room member runs with.
#[derive(Clone)]
pub struct ClientContext {
    pub relay: Arc<dyn RelayClient>,
    pub connector: Arc<dyn PeerConnector>,
    pub devices: Arc<dyn MediaDevices>,
    pub events: Arc<dyn CallEvents>,
    pub history: Arc<dyn HistoryStore>,
}

impl ClientContext {
    /// Real peer connections, sample-fed devices, no callbacks, in-memory history.
    pub fn new(relay: Arc<dyn RelayClient>) -> Self {
        Self {
            relay,
            connector: Arc::new(RtcConnector),
            devices: Arc::new(VirtualDevices::new()),
            events: Arc::new(NoopEvents),
            history: Arc::new(MemoryHistory::new()),
        }
    }

    pub fn with_connector(mut self, connector: Arc<dyn PeerConnector>) -> Self {
        self.connector = connector;
        self
    }

    pub fn with_devices(mut self, devices: Arc<dyn MediaDevices>) -> Self {
        self.devices = devices;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn CallEvents>) -> Self {
        self.events = events;
        self
    }

    pub fn with_history(mut self, history: Arc<dyn HistoryStore>) -> Self {
        self.history = history;
        self
    }
}

/// Joins `room` as `username` and starts the call machine.
///
/// Subscribes to the room channel, announces presence and reads the current
/// member list before returning.
pub async fn join_room(
    ctx: ClientContext,
    config: &ClientConfig,
    room: &RoomName,
    username: impl Into<String>,
) -> Result<CallHandle, SignalingError> {
    let channel = room.channel(&config.channel_prefix);
    let (signaling, room_rx) =
        SignalingRoom::join(ctx.relay.clone(), channel, config.signal_event.clone()).await?;

    signaling.announce_presence().await?;
    let members = signaling.current_members().await?;
    let local_id = signaling.local_id().clone();
    info!(
        "{} joined room {} ({} other members)",
        local_id,
        room,
        members.len()
    );

    let (command_tx, command_rx) = mpsc::channel(config.command_buffer);
    let (view_tx, view_rx) = watch::channel(CallView::default());

    let machine = CallMachine::new(MachineParts {
        username: username.into(),
        room: signaling,
        room_rx,
        command_rx,
        view_tx,
        connector: ctx.connector,
        media: MediaAcquisition::new(ctx.devices),
        events: ctx.events,
        history: ctx.history,
        transport_config: config.transport(),
        history_page_size: config.history_page_size,
        peer_present: !members.is_empty(),
    });
    tokio::spawn(machine.run());

    Ok(CallHandle {
        local_id,
        commands: command_tx,
        view: view_rx,
    })
}

/// Cloneable front door to one running call machine.
#[derive(Clone)]
pub struct CallHandle {
    local_id: ClientId,
    commands: mpsc::Sender<CallCommand>,
    view: watch::Receiver<CallView>,
}

impl CallHandle {
    pub fn local_id(&self) -> &ClientId {
        &self.local_id
    }

    async fn send(&self, cmd: CallCommand) -> Result<(), ClientError> {
        self.commands
            .send(cmd)
            .await
            .map_err(|_| ClientError::MachineStopped)
    }

    pub async fn start_call(&self, kind: CallKind) -> Result<(), ClientError> {
        self.send(CallCommand::StartCall(kind)).await
    }

    pub async fn accept_call(&self) -> Result<(), ClientError> {
        self.send(CallCommand::AcceptCall).await
    }

    pub async fn reject_call(&self) -> Result<(), ClientError> {
        self.send(CallCommand::RejectCall).await
    }

    pub async fn cancel_call(&self) -> Result<(), ClientError> {
        self.send(CallCommand::CancelCall).await
    }

    /// Leaves the room and waits until the machine has released everything.
    pub async fn hang_up(&self) -> Result<(), ClientError> {
        let (done, released) = oneshot::channel();
        self.send(CallCommand::HangUp { done }).await?;
        released.await.map_err(|_| ClientError::MachineStopped)
    }

    pub async fn send_chat(
        &self,
        text: impl Into<String>,
        reply_to: Option<String>,
    ) -> Result<(), ClientError> {
        self.send(CallCommand::SendChat {
            text: text.into(),
            reply_to,
        })
        .await
    }

    pub async fn react(
        &self,
        message_id: impl Into<String>,
        emoji: impl Into<String>,
    ) -> Result<(), ClientError> {
        self.send(CallCommand::React {
            message_id: message_id.into(),
            emoji: emoji.into(),
        })
        .await
    }

    pub async fn send_canvas(&self, event: CanvasEvent) -> Result<(), ClientError> {
        self.send(CallCommand::SendCanvas(event)).await
    }

    pub async fn set_track_enabled(&self, kind: TrackKind, enabled: bool) -> Result<(), ClientError> {
        self.send(CallCommand::SetTrackEnabled { kind, enabled })
            .await
    }

    pub async fn toggle_mute(&self) -> Result<(), ClientError> {
        self.send(CallCommand::ToggleMute).await
    }

    pub async fn toggle_video(&self) -> Result<(), ClientError> {
        self.send(CallCommand::ToggleVideo).await
    }

    /// Latest published snapshot.
    pub fn view(&self) -> CallView {
        self.view.borrow().clone()
    }

    /// Receiver for waiting on view changes.
    pub fn watch(&self) -> watch::Receiver<CallView> {
        self.view.clone()
    }
}

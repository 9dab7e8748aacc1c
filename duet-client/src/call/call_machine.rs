use crate::call::{CallCommand, CallEvents, CallState, CallView, EndReason, IncomingCall};
use crate::channel::{ChannelDispatch, Dispatched, compose_chat};
use crate::error::{HistoryError, MediaError, NegotiationError};
use crate::history::{HistoryRecord, HistoryStore};
use crate::media::{LocalStream, MediaAcquisition, TrackKind};
use crate::signaling::{RoomEvent, SignalingRoom};
use crate::transport::{
    LinkState, NegotiationPhase, PeerConnector, RemoteStream, SessionId, TransportConfig,
    TransportEvent, TransportSession,
};
use chrono::Local;
use duet_core::{
    CallKind, ChannelPayload, ChatMessage, ClientId, ConnectivityHint, MediaConstraints,
    MessageLog, PresenceAction, PresenceUpdate, SignalMessage,
};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaPurpose {
    Start,
    Accept,
}

/// Results of work the machine spawned, re-entering the loop.
enum Internal {
    MediaReady {
        attempt: u64,
        purpose: MediaPurpose,
        result: Result<LocalStream, MediaError>,
    },
    HistoryLoaded(Result<Vec<ChatMessage>, HistoryError>),
}

/// Collaborators and channels handed over by `join_room`.
pub(crate) struct MachineParts {
    pub username: String,
    pub room: SignalingRoom,
    pub room_rx: mpsc::UnboundedReceiver<RoomEvent>,
    pub command_rx: mpsc::Receiver<CallCommand>,
    pub view_tx: watch::Sender<CallView>,
    pub connector: Arc<dyn PeerConnector>,
    pub media: MediaAcquisition,
    pub events: Arc<dyn CallEvents>,
    pub history: Arc<dyn HistoryStore>,
    pub transport_config: TransportConfig,
    pub history_page_size: usize,
    pub peer_present: bool,
}

/// Owns the single call slot of one room member.
///
/// Everything that changes call state happens inside [`CallMachine::run`], one
/// event at a time. Work that may suspend for long (media capture, history
/// fetch) is spawned and comes back as an [`Internal`] event tagged with the
/// attempt it belongs to.
pub struct CallMachine {
    me: ClientId,
    username: String,
    room: SignalingRoom,
    connector: Arc<dyn PeerConnector>,
    media: MediaAcquisition,
    events: Arc<dyn CallEvents>,
    history: Arc<dyn HistoryStore>,
    transport_config: TransportConfig,
    history_page_size: usize,

    command_rx: mpsc::Receiver<CallCommand>,
    room_rx: mpsc::UnboundedReceiver<RoomEvent>,
    transport_tx: mpsc::Sender<TransportEvent>,
    transport_rx: mpsc::Receiver<TransportEvent>,
    internal_tx: mpsc::UnboundedSender<Internal>,
    internal_rx: mpsc::UnboundedReceiver<Internal>,
    view_tx: watch::Sender<CallView>,
    hang_up_ack: Option<oneshot::Sender<()>>,

    state: CallState,
    attempt: u64,
    media_pending: Option<u64>,
    next_session: u64,
    session: Option<TransportSession>,
    active_kind: Option<CallKind>,
    incoming: Option<IncomingCall>,
    stored_offer: Option<String>,
    early_hints: Vec<ConnectivityHint>,
    counterpart: Option<ClientId>,
    connected: bool,
    channel_open: bool,
    peer_present: bool,
    messages: MessageLog,
    local_stream: Option<LocalStream>,
    remote_stream: Option<RemoteStream>,
    media_error: Option<MediaError>,
    muted: bool,
    video_enabled: bool,
}

impl CallMachine {
    pub(crate) fn new(parts: MachineParts) -> Self {
        let (transport_tx, transport_rx) = mpsc::channel(256);
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();

        Self {
            me: parts.room.local_id().clone(),
            username: parts.username,
            room: parts.room,
            connector: parts.connector,
            media: parts.media,
            events: parts.events,
            history: parts.history,
            transport_config: parts.transport_config,
            history_page_size: parts.history_page_size,

            command_rx: parts.command_rx,
            room_rx: parts.room_rx,
            transport_tx,
            transport_rx,
            internal_tx,
            internal_rx,
            view_tx: parts.view_tx,
            hang_up_ack: None,

            state: CallState::Idle,
            attempt: 0,
            media_pending: None,
            next_session: 0,
            session: None,
            active_kind: None,
            incoming: None,
            stored_offer: None,
            early_hints: Vec::new(),
            counterpart: None,
            connected: false,
            channel_open: false,
            peer_present: parts.peer_present,
            messages: MessageLog::new(),
            local_stream: None,
            remote_stream: None,
            media_error: None,
            muted: false,
            video_enabled: true,
        }
    }

    pub async fn run(mut self) {
        info!("{}: call machine started", self.me);
        self.spawn_history_fetch();
        self.publish_view();

        loop {
            let keep_running = tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => {
                        info!("{}: all call handles dropped, leaving room", self.me);
                        self.shutdown().await;
                        false
                    }
                },

                Some(event) = self.room_rx.recv() => {
                    self.handle_room_event(event).await;
                    true
                }

                Some(event) = self.transport_rx.recv() => {
                    self.handle_transport_event(event).await;
                    true
                }

                Some(event) = self.internal_rx.recv() => {
                    self.handle_internal(event).await;
                    true
                }
            };

            self.publish_view();
            if !keep_running {
                break;
            }
        }

        self.command_rx.close();
        if let Some(done) = self.hang_up_ack.take() {
            let _ = done.send(());
        }
        info!("{}: call machine finished", self.me);
    }

    fn publish_view(&self) {
        self.view_tx.send_replace(CallView {
            call_state: self.state,
            incoming: self.incoming.clone(),
            call_kind: self.active_kind,
            connected: self.connected,
            channel_open: self.channel_open,
            peer_present: self.peer_present,
            local_stream: self.local_stream.clone(),
            remote_stream: self.remote_stream.clone(),
            muted: self.muted,
            video_enabled: self.video_enabled,
            media_error: self.media_error.clone(),
            messages: self.messages.to_vec(),
        });
    }

    // --- commands -------------------------------------------------------

    async fn handle_command(&mut self, cmd: CallCommand) -> bool {
        match cmd {
            CallCommand::StartCall(kind) => self.start_call(kind).await,
            CallCommand::AcceptCall => self.accept_call().await,
            CallCommand::RejectCall => self.reject_call().await,
            CallCommand::CancelCall => self.cancel_call().await,
            CallCommand::HangUp { done } => {
                self.shutdown().await;
                self.hang_up_ack = Some(done);
                return false;
            }
            CallCommand::SendChat { text, reply_to } => self.send_chat(text, reply_to).await,
            CallCommand::React { message_id, emoji } => self.react(message_id, emoji).await,
            CallCommand::SendCanvas(event) => {
                self.send_payload(&ChannelPayload::from(event)).await;
            }
            CallCommand::SetTrackEnabled { kind, enabled } => {
                self.set_track_enabled(kind, enabled).await;
            }
            CallCommand::ToggleMute => {
                if let Some(enabled) = self.media.is_enabled(TrackKind::Audio).await {
                    self.set_track_enabled(TrackKind::Audio, !enabled).await;
                }
            }
            CallCommand::ToggleVideo => {
                if let Some(enabled) = self.media.is_enabled(TrackKind::Video).await {
                    self.set_track_enabled(TrackKind::Video, !enabled).await;
                }
            }
        }
        true
    }

    async fn start_call(&mut self, kind: CallKind) {
        if self.state != CallState::Idle || self.connected || self.session.is_some() {
            debug!("{}: start_call({}) ignored in {:?}", self.me, kind, self.state);
            return;
        }
        info!("{}: starting {} call", self.me, kind);

        self.state = CallState::Outgoing;
        self.active_kind = Some(kind);
        self.attempt += 1;

        match kind.media_constraints() {
            Some(constraints) => self.request_media(MediaPurpose::Start, constraints),
            None => self.continue_start(None).await,
        }
    }

    async fn continue_start(&mut self, local: Option<LocalStream>) {
        let Some(kind) = self.active_kind else {
            return;
        };

        let offer = match self.negotiate_offer(local.as_ref()).await {
            Ok(sdp) => sdp,
            Err(e) => {
                warn!("{}: could not set up outgoing call: {}", self.me, e);
                self.reset_local_state(Some(EndReason::SetupFailed)).await;
                return;
            }
        };

        self.publish(SignalMessage::Offer {
            sdp: offer,
            from: self.me.clone(),
            call_type: kind,
        })
        .await;
    }

    async fn negotiate_offer(
        &mut self,
        local: Option<&LocalStream>,
    ) -> Result<String, NegotiationError> {
        let label = self.transport_config.data_channel_label.clone();
        let session = self.open_session(local).await?;
        session.create_data_channel(&label).await?;
        session.generate_offer().await
    }

    async fn accept_call(&mut self) {
        if self.state != CallState::Incoming || self.stored_offer.is_none() {
            debug!("{}: accept_call ignored in {:?}", self.me, self.state);
            return;
        }
        if self.media_pending == Some(self.attempt) {
            debug!("{}: accept already waiting for media", self.me);
            return;
        }
        let Some(incoming) = self.incoming.clone() else {
            return;
        };
        info!("{}: accepting {} call from {}", self.me, incoming.call_type, incoming.from);

        match incoming.call_type.media_constraints() {
            Some(constraints) => self.request_media(MediaPurpose::Accept, constraints),
            None => self.continue_accept(None).await,
        }
    }

    async fn continue_accept(&mut self, local: Option<LocalStream>) {
        let (Some(offer), Some(incoming)) = (self.stored_offer.clone(), self.incoming.clone())
        else {
            return;
        };

        let answer = match self.negotiate_answer(offer, local.as_ref()).await {
            Ok(sdp) => sdp,
            Err(e) => {
                warn!("{}: could not answer {}: {}", self.me, incoming.from, e);
                self.publish(SignalMessage::Reject {
                    from: self.me.clone(),
                })
                .await;
                self.reset_local_state(Some(EndReason::SetupFailed)).await;
                return;
            }
        };

        self.counterpart = Some(incoming.from.clone());
        self.active_kind = Some(incoming.call_type);
        self.state = CallState::Idle;
        self.incoming = None;
        self.stored_offer = None;

        self.publish(SignalMessage::Answer {
            sdp: answer,
            from: self.me.clone(),
        })
        .await;
        self.events.on_call_accepted(incoming.call_type).await;
    }

    async fn negotiate_answer(
        &mut self,
        offer: String,
        local: Option<&LocalStream>,
    ) -> Result<String, NegotiationError> {
        let early = std::mem::take(&mut self.early_hints);
        let session = self.open_session(local).await?;
        // No remote description yet, so these queue in arrival order.
        for hint in early {
            session.add_remote_hint(hint).await;
        }
        session.accept_offer(offer).await?;
        session.generate_answer().await
    }

    async fn reject_call(&mut self) {
        if self.state != CallState::Incoming {
            debug!("{}: reject_call ignored in {:?}", self.me, self.state);
            return;
        }
        self.publish(SignalMessage::Reject {
            from: self.me.clone(),
        })
        .await;
        self.reset_local_state(Some(EndReason::LocalReject)).await;
    }

    async fn cancel_call(&mut self) {
        if self.state != CallState::Outgoing {
            debug!("{}: cancel_call ignored in {:?}", self.me, self.state);
            return;
        }
        self.publish(SignalMessage::Cancel {
            from: self.me.clone(),
        })
        .await;
        self.reset_local_state(Some(EndReason::LocalCancel)).await;
    }

    async fn shutdown(&mut self) {
        self.room.leave().await;
        self.reset_local_state(Some(EndReason::HangUp)).await;
        self.media.release().await;
        self.local_stream = None;
        self.muted = false;
        self.video_enabled = true;
        self.messages.clear();
        self.peer_present = false;
    }

    async fn send_chat(&mut self, text: String, reply_to: Option<String>) {
        let message = compose_chat(
            &self.messages,
            &self.username,
            text,
            reply_to.as_deref(),
            Local::now(),
        );
        self.messages.push(message.clone());
        self.send_payload(&ChannelPayload::Chat(message.to_payload()))
            .await;
        self.record_history(HistoryRecord::Chat(message));
    }

    async fn react(&mut self, message_id: String, emoji: String) {
        if self
            .messages
            .toggle_reaction(&message_id, &emoji, &self.username)
            .is_none()
        {
            debug!("{}: reaction to unknown message {}", self.me, message_id);
            return;
        }
        self.send_payload(&ChannelPayload::Reaction {
            message_id: message_id.clone(),
            emoji: emoji.clone(),
            username: self.username.clone(),
        })
        .await;
        self.record_history(HistoryRecord::Reaction {
            message_id,
            emoji,
            username: self.username.clone(),
        });
    }

    async fn set_track_enabled(&mut self, kind: TrackKind, enabled: bool) {
        match self.media.set_enabled(kind, enabled).await {
            Some(now) => match kind {
                TrackKind::Audio => self.muted = !now,
                TrackKind::Video => self.video_enabled = now,
            },
            None => debug!("{}: no local {} track", self.me, kind.as_str()),
        }
    }

    // --- signaling ------------------------------------------------------

    async fn handle_room_event(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::Signal(signal) => self.handle_signal(signal).await,
            RoomEvent::Presence(update) => self.handle_presence(update).await,
        }
    }

    async fn handle_signal(&mut self, signal: SignalMessage) {
        debug!("{} <- {} from {}", self.me, signal.kind(), signal.from());

        match signal {
            SignalMessage::Offer {
                sdp,
                from,
                call_type,
            } => self.on_remote_offer(sdp, from, call_type).await,

            SignalMessage::Answer { sdp, from } => {
                let Some(session) = self.session.as_mut() else {
                    debug!("{}: answer without a session", self.me);
                    return;
                };
                if session.phase() != NegotiationPhase::HaveLocalOffer {
                    debug!("{}: answer ignored in {:?}", self.me, session.phase());
                    return;
                }
                self.counterpart = Some(from);
                if let Err(e) = session.accept_answer(sdp).await {
                    warn!("{}: failed to apply answer: {}", self.me, e);
                    self.reset_local_state(Some(EndReason::SetupFailed)).await;
                }
            }

            SignalMessage::IceCandidate { candidate, from } => {
                if let Some(session) = self.session.as_mut() {
                    session.add_remote_hint(candidate).await;
                } else if self.is_incoming_from(&from) {
                    self.early_hints.push(candidate);
                } else {
                    debug!("{}: dropping connectivity hint from {}", self.me, from);
                }
            }

            SignalMessage::Reject { from } => {
                let from_counterpart = self.counterpart.as_ref().is_none_or(|c| c == &from);
                if self.state == CallState::Outgoing && from_counterpart {
                    info!("{}: {} rejected the call", self.me, from);
                    self.reset_local_state(Some(EndReason::RemoteReject)).await;
                } else {
                    debug!("{}: stale reject from {}", self.me, from);
                }
            }

            SignalMessage::Cancel { from } => {
                let live_counterpart =
                    self.session.is_some() && self.counterpart.as_ref() == Some(&from);
                if self.is_incoming_from(&from) || live_counterpart {
                    info!("{}: {} cancelled the call", self.me, from);
                    self.reset_local_state(Some(EndReason::RemoteCancel)).await;
                } else {
                    debug!("{}: stale cancel from {}", self.me, from);
                }
            }
        }
    }

    async fn on_remote_offer(&mut self, sdp: String, from: ClientId, call_type: CallKind) {
        match self.state {
            CallState::Idle if self.session.is_none() && !self.connected => {}
            CallState::Outgoing if from > self.me => {
                info!("{}: both sides called, yielding to {}", self.me, from);
                self.reset_local_state(None).await;
            }
            _ => {
                debug!("{}: offer from {} dropped in {:?}", self.me, from, self.state);
                return;
            }
        }

        let incoming = IncomingCall { call_type, from };
        self.stored_offer = Some(sdp);
        self.incoming = Some(incoming.clone());
        self.early_hints.clear();
        self.attempt += 1;
        self.state = CallState::Incoming;

        info!("{}: incoming {} call from {}", self.me, incoming.call_type, incoming.from);
        self.events.on_incoming_call(incoming).await;
    }

    async fn handle_presence(&mut self, update: PresenceUpdate) {
        match update.action {
            PresenceAction::Enter | PresenceAction::Present => self.peer_present = true,
            PresenceAction::Leave => {
                self.peer_present = false;
                if self.is_incoming_from(&update.client_id) {
                    info!("{}: caller {} left before an answer", self.me, update.client_id);
                    self.reset_local_state(Some(EndReason::PeerLeft)).await;
                } else if self.connected || self.is_answering(&update.client_id) {
                    info!("{}: peer {} left the room", self.me, update.client_id);
                    self.reset_local_state(Some(EndReason::PeerLeft)).await;
                }
            }
        }
    }

    /// Answer sent to `from`, link not connected yet.
    fn is_answering(&self, from: &ClientId) -> bool {
        self.state == CallState::Idle
            && self.session.is_some()
            && self.counterpart.as_ref() == Some(from)
    }

    fn is_incoming_from(&self, from: &ClientId) -> bool {
        self.state == CallState::Incoming
            && self.incoming.as_ref().is_some_and(|i| &i.from == from)
    }

    async fn publish(&self, message: SignalMessage) {
        if let Err(e) = self.room.publish(&message).await {
            warn!("{}: failed to publish {}: {}", self.me, message.kind(), e);
        }
    }

    // --- transport ------------------------------------------------------

    async fn open_session(
        &mut self,
        local: Option<&LocalStream>,
    ) -> Result<&mut TransportSession, NegotiationError> {
        if let Some(mut old) = self.session.take() {
            old.teardown().await;
        }
        self.next_session += 1;
        let session = TransportSession::create(
            self.connector.as_ref(),
            SessionId(self.next_session),
            &self.transport_config,
            local,
            self.transport_tx.clone(),
        )
        .await?;
        Ok(self.session.insert(session))
    }

    async fn handle_transport_event(&mut self, event: TransportEvent) {
        let current = self.session.as_ref().map(TransportSession::id);
        if current != Some(event.session_id()) {
            debug!("{}: dropping event from stale {}", self.me, event.session_id());
            return;
        }

        match event {
            TransportEvent::ConnectivityHint(_, hint) => {
                self.publish(SignalMessage::IceCandidate {
                    candidate: hint,
                    from: self.me.clone(),
                })
                .await;
            }

            TransportEvent::RemoteTrack(_, track) => {
                let stream = self.remote_stream.get_or_insert_with(RemoteStream::default);
                stream.tracks.push(track);
                let stream = stream.clone();
                self.events.on_remote_stream(stream).await;
            }

            TransportEvent::ChannelOpened(id) => {
                info!("{}: data channel open", id);
                self.channel_open = true;
            }

            TransportEvent::ChannelMessage(_, data) => self.handle_channel_message(&data).await,

            TransportEvent::ChannelClosed(id) => {
                debug!("{}: data channel closed", id);
                self.channel_open = false;
            }

            TransportEvent::StateChanged(id, state) => self.handle_link_state(id, state).await,
        }
    }

    async fn handle_link_state(&mut self, id: SessionId, state: LinkState) {
        match state {
            LinkState::Connected => {
                info!("{}: connected", id);
                self.connected = true;
                if self.state == CallState::Outgoing {
                    self.state = CallState::Idle;
                    if let Some(kind) = self.active_kind {
                        self.events.on_call_accepted(kind).await;
                    }
                }
            }
            state if state.is_terminal() => {
                warn!("{}: connection {:?}", id, state);
                self.reset_local_state(Some(EndReason::ConnectionLost)).await;
            }
            _ => debug!("{}: connection {:?}", id, state),
        }
    }

    async fn handle_channel_message(&mut self, data: &[u8]) {
        let payload = match ChannelPayload::decode(data) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("{}: undecodable channel payload: {}", self.me, e);
                return;
            }
        };

        match ChannelDispatch::apply(&mut self.messages, payload) {
            Dispatched::Chat(message) => self.events.on_chat_message(message).await,
            Dispatched::Canvas(event) => self.events.on_canvas_event(event).await,
            Dispatched::Reaction { .. } | Dispatched::UnknownTarget => {}
        }
    }

    async fn send_payload(&self, payload: &ChannelPayload) {
        let session = match self.session.as_ref() {
            Some(session) if self.channel_open => session,
            _ => {
                debug!("{}: data channel not open, payload not sent", self.me);
                return;
            }
        };
        if let Err(e) = session.send(payload).await {
            warn!("{}: data channel send failed: {}", self.me, e);
        }
    }

    /// Returns to `Idle` with no session. `on_call_ended` fires only if
    /// something was live and a reason is given.
    async fn reset_local_state(&mut self, reason: Option<EndReason>) {
        let was_live = self.state != CallState::Idle || self.session.is_some();

        if let Some(mut session) = self.session.take() {
            session.teardown().await;
        }

        self.attempt += 1;
        self.media_pending = None;
        self.state = CallState::Idle;
        self.incoming = None;
        self.stored_offer = None;
        self.early_hints.clear();
        self.active_kind = None;
        self.counterpart = None;
        self.connected = false;
        self.channel_open = false;
        self.remote_stream = None;

        if let Some(reason) = reason.filter(|_| was_live) {
            info!("{}: call ended ({})", self.me, reason);
            self.events.on_call_ended(reason).await;
        }
    }

    // --- spawned work ---------------------------------------------------

    fn request_media(&mut self, purpose: MediaPurpose, constraints: MediaConstraints) {
        let attempt = self.attempt;
        self.media_pending = Some(attempt);

        let media = self.media.clone();
        let tx = self.internal_tx.clone();
        tokio::spawn(async move {
            let result = media.acquire(constraints).await;
            let _ = tx.send(Internal::MediaReady {
                attempt,
                purpose,
                result,
            });
        });
    }

    fn spawn_history_fetch(&self) {
        let history = self.history.clone();
        let limit = self.history_page_size;
        let tx = self.internal_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(Internal::HistoryLoaded(history.fetch(limit, 1).await));
        });
    }

    fn record_history(&self, record: HistoryRecord) {
        let history = self.history.clone();
        tokio::spawn(async move {
            if let Err(e) = history.append(record).await {
                warn!("history append failed: {}", e);
            }
        });
    }

    async fn handle_internal(&mut self, event: Internal) {
        match event {
            Internal::MediaReady {
                attempt,
                purpose,
                result,
            } => self.on_media_ready(attempt, purpose, result).await,

            Internal::HistoryLoaded(Ok(history)) => {
                let added = self.messages.merge_history(history);
                debug!("{}: merged {} history messages", self.me, added);
            }
            Internal::HistoryLoaded(Err(e)) => warn!("{}: history fetch failed: {}", self.me, e),
        }
    }

    async fn on_media_ready(
        &mut self,
        attempt: u64,
        purpose: MediaPurpose,
        result: Result<LocalStream, MediaError>,
    ) {
        if self.media_pending == Some(attempt) {
            self.media_pending = None;
        }
        if let Ok(stream) = &result {
            self.adopt_stream(stream.clone());
        }

        let expected = match purpose {
            MediaPurpose::Start => CallState::Outgoing,
            MediaPurpose::Accept => CallState::Incoming,
        };
        if attempt != self.attempt || self.state != expected {
            debug!("{}: media for stale attempt {} discarded", self.me, attempt);
            return;
        }

        match (result, purpose) {
            (Ok(stream), MediaPurpose::Start) => {
                self.media_error = None;
                self.continue_start(Some(stream)).await;
            }
            (Ok(stream), MediaPurpose::Accept) => {
                self.media_error = None;
                self.continue_accept(Some(stream)).await;
            }
            (Err(e), MediaPurpose::Start) => {
                self.media_error = Some(e.clone());
                self.events.on_media_error(e).await;
                self.reset_local_state(Some(EndReason::SetupFailed)).await;
            }
            // The callee still answers, just without local media.
            (Err(e), MediaPurpose::Accept) => {
                self.media_error = Some(e.clone());
                self.events.on_media_error(e).await;
                self.continue_accept(None).await;
            }
        }
    }

    fn adopt_stream(&mut self, stream: LocalStream) {
        self.muted = stream
            .track(TrackKind::Audio)
            .is_some_and(|t| !t.is_enabled());
        self.video_enabled = stream
            .track(TrackKind::Video)
            .is_none_or(|t| t.is_enabled());
        self.local_stream = Some(stream);
    }
}

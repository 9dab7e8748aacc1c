use crate::error::TransportError;
use crate::media::{LocalStream, TrackKind};
use crate::transport::peer_link::{PeerConnector, PeerLink};
use crate::transport::{LinkState, RemoteTrack, SessionId, TransportConfig, TransportEvent};
use async_trait::async_trait;
use duet_core::ConnectivityHint;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::data_channel::data_channel_state::RTCDataChannelState;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

/// Opens [`RtcLink`]s backed by webrtc-rs.
#[derive(Debug, Clone, Default)]
pub struct RtcConnector;

#[async_trait]
impl PeerConnector for RtcConnector {
    async fn open(
        &self,
        id: SessionId,
        config: &TransportConfig,
        local: Option<&LocalStream>,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerLink>, TransportError> {
        let link = RtcLink::new(id, config, local, events).await?;
        Ok(Box::new(link))
    }
}

/// Forwards handler output to the call machine until the link is detached.
#[derive(Clone)]
struct EventSink {
    id: SessionId,
    tx: mpsc::Sender<TransportEvent>,
    detached: Arc<AtomicBool>,
}

impl EventSink {
    async fn emit(&self, event: TransportEvent) {
        if self.detached.load(Ordering::Acquire) {
            return;
        }
        if self.tx.send(event).await.is_err() {
            debug!("{}: call machine gone, dropping transport event", self.id);
        }
    }
}

pub struct RtcLink {
    id: SessionId,
    peer_connection: Arc<RTCPeerConnection>,
    data_channel: Arc<Mutex<Option<Arc<RTCDataChannel>>>>,
    sink: EventSink,
}

impl RtcLink {
    pub async fn new(
        id: SessionId,
        config: &TransportConfig,
        local: Option<&LocalStream>,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Self, TransportError> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);
        let sink = EventSink {
            id,
            tx: events,
            detached: Arc::new(AtomicBool::new(false)),
        };
        let data_channel: Arc<Mutex<Option<Arc<RTCDataChannel>>>> = Arc::new(Mutex::new(None));

        let state_sink = sink.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let sink = state_sink.clone();
                Box::pin(async move {
                    info!("{}: peer connection state {:?}", sink.id, s);
                    let state = match s {
                        RTCPeerConnectionState::Connecting => LinkState::Connecting,
                        RTCPeerConnectionState::Connected => LinkState::Connected,
                        RTCPeerConnectionState::Disconnected => LinkState::Disconnected,
                        RTCPeerConnectionState::Failed => LinkState::Failed,
                        RTCPeerConnectionState::Closed => LinkState::Closed,
                        _ => return,
                    };
                    sink.emit(TransportEvent::StateChanged(sink.id, state)).await;
                })
            },
        ));

        let ice_sink = sink.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let sink = ice_sink.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let hint = ConnectivityHint {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                    username_fragment: init.username_fragment,
                };
                sink.emit(TransportEvent::ConnectivityHint(sink.id, hint)).await;
            })
        }));

        let track_sink = sink.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let sink = track_sink.clone();
                Box::pin(async move {
                    let kind = match track.kind() {
                        RTPCodecType::Audio => TrackKind::Audio,
                        RTPCodecType::Video => TrackKind::Video,
                        _ => return,
                    };
                    let remote = RemoteTrack {
                        kind,
                        track_id: track.id(),
                        stream_id: track.stream_id(),
                        rtp: Some(track),
                    };
                    debug!("{}: remote {:?} track arrived", sink.id, kind);
                    sink.emit(TransportEvent::RemoteTrack(sink.id, remote)).await;
                })
            },
        ));

        let dc_sink = sink.clone();
        let dc_slot = data_channel.clone();
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let sink = dc_sink.clone();
            let slot = dc_slot.clone();
            Box::pin(async move {
                debug!("{}: received data channel '{}'", sink.id, dc.label());
                wire_channel(&sink, &dc);
                *slot.lock().await = Some(dc);
            })
        }));

        if let Some(stream) = local {
            for track in stream.tracks() {
                let rtp: Arc<dyn TrackLocal + Send + Sync> = track.rtp();
                let sender = peer_connection.add_track(rtp).await?;
                // RTCP has to be drained for interceptors to run.
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 1500];
                    while sender.read(&mut buf).await.is_ok() {}
                });
            }
        }

        Ok(Self {
            id,
            peer_connection,
            data_channel,
            sink,
        })
    }
}

fn wire_channel(sink: &EventSink, dc: &Arc<RTCDataChannel>) {
    let open_sink = sink.clone();
    dc.on_open(Box::new(move || {
        let sink = open_sink.clone();
        Box::pin(async move {
            info!("{}: data channel open", sink.id);
            sink.emit(TransportEvent::ChannelOpened(sink.id)).await;
        })
    }));

    let msg_sink = sink.clone();
    dc.on_message(Box::new(move |msg: DataChannelMessage| {
        let sink = msg_sink.clone();
        Box::pin(async move {
            sink.emit(TransportEvent::ChannelMessage(sink.id, msg.data))
                .await;
        })
    }));

    let close_sink = sink.clone();
    dc.on_close(Box::new(move || {
        let sink = close_sink.clone();
        Box::pin(async move {
            debug!("{}: data channel closed", sink.id);
            sink.emit(TransportEvent::ChannelClosed(sink.id)).await;
        })
    }));
}

#[async_trait]
impl PeerLink for RtcLink {
    async fn create_data_channel(&self, label: &str) -> Result<(), TransportError> {
        let dc = self.peer_connection.create_data_channel(label, None).await?;
        wire_channel(&self.sink, &dc);
        *self.data_channel.lock().await = Some(dc);
        Ok(())
    }

    async fn create_offer(&self) -> Result<String, TransportError> {
        let offer = self.peer_connection.create_offer(None).await?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await?;
        Ok(offer.sdp)
    }

    async fn set_remote_offer(&self, sdp: String) -> Result<(), TransportError> {
        let desc = RTCSessionDescription::offer(sdp)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn create_answer(&self) -> Result<String, TransportError> {
        let answer = self.peer_connection.create_answer(None).await?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await?;
        Ok(answer.sdp)
    }

    async fn set_remote_answer(&self, sdp: String) -> Result<(), TransportError> {
        let desc = RTCSessionDescription::answer(sdp)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn add_remote_hint(&self, hint: ConnectivityHint) -> Result<(), TransportError> {
        let init = RTCIceCandidateInit {
            candidate: hint.candidate,
            sdp_mid: hint.sdp_mid,
            sdp_mline_index: hint.sdp_m_line_index,
            username_fragment: hint.username_fragment,
        };
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn send_text(&self, text: String) -> Result<(), TransportError> {
        let guard = self.data_channel.lock().await;
        let Some(dc) = guard.as_ref() else {
            return Err(TransportError::ChannelNotOpen);
        };
        if dc.ready_state() != RTCDataChannelState::Open {
            return Err(TransportError::ChannelNotOpen);
        }
        dc.send_text(text).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.sink.detached.store(true, Ordering::Release);

        if let Some(dc) = self.data_channel.lock().await.take() {
            if let Err(e) = dc.close().await {
                warn!("{}: closing data channel: {}", self.id, e);
            }
        }
        self.peer_connection.close().await?;
        Ok(())
    }
}

use crate::error::SignalingError;
use crate::signaling::{RelayClient, RelaySubscription};
use async_trait::async_trait;
use dashmap::DashMap;
use duet_core::{ClientFrame, ClientId, PresenceUpdate, RelayMessage, ServerFrame};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

struct SubscriptionSink {
    messages: mpsc::UnboundedSender<RelayMessage>,
    presence: mpsc::UnboundedSender<PresenceUpdate>,
}

struct WsRelayInner {
    subscriptions: DashMap<String, SubscriptionSink>,
    pending_members: DashMap<u64, oneshot::Sender<Vec<ClientId>>>,
}

impl WsRelayInner {
    fn dispatch(&self, frame: ServerFrame) {
        match frame {
            ServerFrame::Message { channel, message } => {
                if let Some(sub) = self.subscriptions.get(&channel) {
                    let _ = sub.messages.send(message);
                }
            }
            ServerFrame::Presence { channel, update } => {
                if let Some(sub) = self.subscriptions.get(&channel) {
                    let _ = sub.presence.send(update);
                }
            }
            ServerFrame::Members {
                request_id,
                members,
            } => {
                if let Some((_, reply)) = self.pending_members.remove(&request_id) {
                    let _ = reply.send(members);
                }
            }
            ServerFrame::Error { reason } => warn!("relay reported an error: {}", reason),
            ServerFrame::Welcome { .. } => debug!("ignoring repeated welcome"),
        }
    }
}

/// Relay client speaking JSON frames to a `duet-relay` server over WebSocket.
pub struct WsRelayClient {
    client_id: ClientId,
    inner: Arc<WsRelayInner>,
    outbound: mpsc::UnboundedSender<ClientFrame>,
    next_request: AtomicU64,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl WsRelayClient {
    /// Connects and waits for the server to assign an id.
    pub async fn connect(url: &str) -> Result<Self, SignalingError> {
        let (ws_stream, _) = connect_async(url)
            .await
            .map_err(|e| SignalingError::Delivery(e.to_string()))?;
        let (mut ws_sink, mut ws_stream) = ws_stream.split();

        let client_id = loop {
            match ws_stream.next().await {
                Some(Ok(Message::Text(text))) => match serde_json::from_str(&text)? {
                    ServerFrame::Welcome { client_id } => break client_id,
                    other => debug!("frame before welcome: {:?}", other),
                },
                Some(Ok(Message::Close(_))) | None => return Err(SignalingError::Closed),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(SignalingError::Delivery(e.to_string())),
            }
        };
        info!("connected to relay {} as {}", url, client_id);

        let inner = Arc::new(WsRelayInner {
            subscriptions: DashMap::new(),
            pending_members: DashMap::new(),
        });
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<ClientFrame>();

        let writer = tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                let json = match serde_json::to_string(&frame) {
                    Ok(json) => json,
                    Err(e) => {
                        error!("failed to serialize relay frame: {}", e);
                        continue;
                    }
                };
                if ws_sink.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            let _ = ws_sink.close().await;
        });

        let reader = tokio::spawn({
            let inner = inner.clone();
            async move {
                while let Some(Ok(msg)) = ws_stream.next().await {
                    match msg {
                        Message::Text(text) => match serde_json::from_str::<ServerFrame>(&text) {
                            Ok(frame) => inner.dispatch(frame),
                            Err(e) => warn!("invalid relay frame: {}", e),
                        },
                        Message::Close(_) => break,
                        _ => {}
                    }
                }
                info!("relay connection closed");
                // Dropping the senders ends every subscription and fails pending requests.
                inner.subscriptions.clear();
                inner.pending_members.clear();
            }
        });

        Ok(Self {
            client_id,
            inner,
            outbound,
            next_request: AtomicU64::new(1),
            reader,
            writer,
        })
    }

    fn send(&self, frame: ClientFrame) -> Result<(), SignalingError> {
        if self.reader.is_finished() {
            return Err(SignalingError::Closed);
        }
        self.outbound.send(frame).map_err(|_| SignalingError::Closed)
    }
}

impl Drop for WsRelayClient {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}

#[async_trait]
impl RelayClient for WsRelayClient {
    fn client_id(&self) -> ClientId {
        self.client_id.clone()
    }

    async fn subscribe(&self, channel: &str) -> Result<RelaySubscription, SignalingError> {
        let (msg_tx, messages) = mpsc::unbounded_channel();
        let (presence_tx, presence) = mpsc::unbounded_channel();
        self.inner.subscriptions.insert(
            channel.to_owned(),
            SubscriptionSink {
                messages: msg_tx,
                presence: presence_tx,
            },
        );
        self.send(ClientFrame::Subscribe {
            channel: channel.to_owned(),
        })?;
        Ok(RelaySubscription { messages, presence })
    }

    async fn unsubscribe(&self, channel: &str) -> Result<(), SignalingError> {
        self.inner.subscriptions.remove(channel);
        self.send(ClientFrame::Unsubscribe {
            channel: channel.to_owned(),
        })
    }

    async fn publish(
        &self,
        channel: &str,
        name: &str,
        data: Value,
    ) -> Result<(), SignalingError> {
        self.send(ClientFrame::Publish {
            channel: channel.to_owned(),
            name: name.to_owned(),
            data,
        })
    }

    async fn enter_presence(&self, channel: &str) -> Result<(), SignalingError> {
        self.send(ClientFrame::PresenceEnter {
            channel: channel.to_owned(),
        })
    }

    async fn leave_presence(&self, channel: &str) -> Result<(), SignalingError> {
        self.send(ClientFrame::PresenceLeave {
            channel: channel.to_owned(),
        })
    }

    async fn members(&self, channel: &str) -> Result<Vec<ClientId>, SignalingError> {
        let request_id = self.next_request.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.inner.pending_members.insert(request_id, tx);

        if let Err(e) = self.send(ClientFrame::PresenceGet {
            channel: channel.to_owned(),
            request_id,
        }) {
            self.inner.pending_members.remove(&request_id);
            return Err(e);
        }
        rx.await.map_err(|_| SignalingError::Closed)
    }
}

use anyhow::{Context, Result};
use duet_client::history::{HistoryStore, MemoryHistory};
use duet_client::media::{MediaDevices, VirtualDevices};
use duet_client::signaling::MemoryRelay;
use duet_client::{CallHandle, CallView, ClientConfig, ClientContext, join_room};
use duet_core::{ClientId, RoomName};
use std::sync::Arc;

use super::fake_transport::{FakeConnector, FakeSession};
use super::recording_events::RecordingEvents;

/// Room every test peer joins.
pub const ROOM: &str = "lobby";

/// Timeout for machine reactions (ms).
pub const EVENT_TIMEOUT_MS: u64 = 2000;

/// One room member wired to fakes: relay client, links, devices and callbacks.
pub struct TestPeer {
    pub id: ClientId,
    pub handle: CallHandle,
    pub events: RecordingEvents,
    pub connector: FakeConnector,
}

impl TestPeer {
    pub async fn join(relay: &MemoryRelay, id: &str) -> Result<Self> {
        Self::join_with(
            relay,
            id,
            Arc::new(VirtualDevices::new()),
            Arc::new(MemoryHistory::new()),
        )
        .await
    }

    pub async fn join_with(
        relay: &MemoryRelay,
        id: &str,
        devices: Arc<dyn MediaDevices>,
        history: Arc<dyn HistoryStore>,
    ) -> Result<Self> {
        let events = RecordingEvents::new();
        let connector = FakeConnector::new();
        let ctx = ClientContext::new(Arc::new(relay.client_with_id(id)))
            .with_connector(Arc::new(connector.clone()))
            .with_devices(devices)
            .with_events(Arc::new(events.clone()))
            .with_history(history);

        let handle = join_room(ctx, &ClientConfig::default(), &RoomName::new(ROOM), id)
            .await
            .context("Failed to join room")?;

        Ok(Self {
            id: ClientId::from(id),
            handle,
            events,
            connector,
        })
    }

    /// Waits until the published view satisfies `pred`.
    pub async fn wait_view(&self, pred: impl Fn(&CallView) -> bool) -> Result<CallView> {
        let mut rx = self.handle.watch();
        let view = tokio::time::timeout(
            std::time::Duration::from_millis(EVENT_TIMEOUT_MS),
            rx.wait_for(|v| pred(v)),
        )
        .await
        .context("Timed out waiting for call view")?
        .context("Call machine stopped")?;
        Ok(view.clone())
    }

    pub async fn session(&self, nth: usize) -> Result<FakeSession> {
        self.connector
            .wait_for_sessions(nth, EVENT_TIMEOUT_MS)
            .await
            .with_context(|| format!("No transport session #{nth}"))
    }
}

/// Lets in-flight events drain before asserting that nothing happened.
pub async fn settle() {
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
}

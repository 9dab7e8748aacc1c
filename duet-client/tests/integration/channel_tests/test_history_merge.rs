use duet_client::history::MemoryHistory;
use duet_client::media::VirtualDevices;
use duet_client::signaling::MemoryRelay;
use duet_core::{CallKind, ChatMessage, MessageOrigin};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::integration::{establish_call, init_tracing};
use crate::utils::TestPeer;

fn archived(id: &str, text: &str) -> ChatMessage {
    ChatMessage {
        id: id.into(),
        text: text.into(),
        username: "bob".into(),
        timestamp: "09:15".into(),
        replying_to: None,
        reactions: BTreeMap::new(),
        origin: MessageOrigin::Local,
    }
}

#[tokio::test]
async fn test_history_page_precedes_live_messages() {
    init_tracing();

    let relay = MemoryRelay::new();
    let history = Arc::new(MemoryHistory::with_messages([
        archived("old-1", "yesterday"),
        archived("old-2", "see you"),
    ]));
    let alice = TestPeer::join_with(&relay, "alice", Arc::new(VirtualDevices::new()), history)
        .await
        .unwrap();

    let view = alice
        .wait_view(|v| v.messages.len() == 2)
        .await
        .expect("History never loaded");
    let ids: Vec<&str> = view.messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["old-1", "old-2"]);
    assert!(view.messages.iter().all(|m| m.origin == MessageOrigin::History));

    let bob = TestPeer::join(&relay, "bob").await.unwrap();
    establish_call(&alice, &bob, CallKind::Chat)
        .await
        .expect("Call setup failed");
    bob.handle.send_chat("new today", None).await.unwrap();

    let view = alice.wait_view(|v| v.messages.len() == 3).await.unwrap();
    assert_eq!(view.messages[2].text, "new today");
    assert_eq!(view.messages[2].origin, MessageOrigin::Peer);
}

use duet_client::signaling::{MemoryRelay, RelayClient};
use duet_client::{CallState, EndReason};
use duet_core::{CallKind, ClientId, SIGNAL_EVENT, SignalMessage};
use serde_json::json;

use crate::integration::{create_pair, establish_call, init_tracing};
use crate::utils::{LinkCall, settle};

const CHANNEL: &str = "p2p-chat:lobby";

#[tokio::test]
async fn test_third_party_signals_leave_call_untouched() {
    init_tracing();

    let relay = MemoryRelay::new();
    let (alice, bob) = create_pair(&relay).await.expect("Failed to join");
    let (alice_link, bob_link) = establish_call(&alice, &bob, CallKind::Chat)
        .await
        .expect("Call setup failed");

    let mallory = relay.client_with_id("mallory");
    let from = ClientId::from("mallory");
    for signal in [
        SignalMessage::Cancel { from: from.clone() },
        SignalMessage::Reject { from: from.clone() },
        SignalMessage::Answer {
            sdp: "bogus".into(),
            from: from.clone(),
        },
    ] {
        mallory
            .publish(CHANNEL, SIGNAL_EVENT, serde_json::to_value(&signal).unwrap())
            .await
            .unwrap();
    }
    settle().await;

    for peer in [&alice, &bob] {
        let view = peer.handle.view();
        assert!(view.connected && view.channel_open);
        assert!(peer.events.ended().await.is_empty());
    }
    assert!(!alice_link.is_closed().await);
    assert!(!bob_link.is_closed().await);
    assert!(
        !alice_link
            .calls()
            .await
            .contains(&LinkCall::SetRemoteAnswer("bogus".into()))
    );
}

#[tokio::test]
async fn test_reject_while_idle_is_ignored() {
    init_tracing();

    let relay = MemoryRelay::new();
    let (alice, bob) = create_pair(&relay).await.expect("Failed to join");

    let stray = relay.client_with_id("bob-old-tab");
    stray
        .publish(CHANNEL, SIGNAL_EVENT, json!({"type": "reject", "from": "bob"}))
        .await
        .unwrap();
    stray
        .publish(CHANNEL, SIGNAL_EVENT, json!({"type": "cancel", "from": "bob"}))
        .await
        .unwrap();
    settle().await;

    assert_eq!(alice.handle.view().call_state, CallState::Idle);
    assert!(alice.events.events().await.is_empty());

    // A fresh call afterwards is unaffected.
    alice.handle.start_call(CallKind::Chat).await.unwrap();
    bob.wait_view(|v| v.call_state == CallState::Incoming)
        .await
        .expect("Bob never rang");
    assert_eq!(alice.handle.view().call_state, CallState::Outgoing);
    assert!(!alice.events.ended().await.contains(&EndReason::RemoteReject));
}

use duet_client::signaling::MemoryRelay;
use duet_client::{CallState, EndReason};
use duet_core::CallKind;

use crate::integration::{create_pair, init_tracing};
use crate::utils::{EVENT_TIMEOUT_MS, Recorded, settle};

#[tokio::test]
async fn test_cancel_while_callee_rings() {
    init_tracing();

    let relay = MemoryRelay::new();
    let (alice, bob) = create_pair(&relay).await.expect("Failed to join");

    alice.handle.start_call(CallKind::Voice).await.unwrap();
    bob.wait_view(|v| v.call_state == CallState::Incoming)
        .await
        .expect("Bob never rang");

    alice.handle.cancel_call().await.unwrap();

    let alice_view = alice
        .wait_view(|v| v.call_state == CallState::Idle)
        .await
        .expect("Alice did not return to idle");
    let bob_view = bob
        .wait_view(|v| v.call_state == CallState::Idle)
        .await
        .expect("Bob did not return to idle");

    assert_eq!(bob_view.incoming, None);
    assert!(!alice_view.connected);
    let alice_link = alice.connector.latest().await.expect("Alice had a link");
    assert!(alice_link.is_closed().await);

    assert!(
        bob.events
            .wait_for(
                |e| *e == Recorded::Ended(EndReason::RemoteCancel),
                EVENT_TIMEOUT_MS
            )
            .await
    );
    assert_eq!(alice.events.ended().await, vec![EndReason::LocalCancel]);
}

#[tokio::test]
async fn test_immediate_cancel_converges_to_idle() {
    init_tracing();

    let relay = MemoryRelay::new();
    let (alice, bob) = create_pair(&relay).await.expect("Failed to join");

    // Chat calls need no media, so the offer and the cancel go out back to back.
    alice.handle.start_call(CallKind::Chat).await.unwrap();
    alice.handle.cancel_call().await.unwrap();
    settle().await;

    assert_eq!(alice.handle.view().call_state, CallState::Idle);
    let bob_view = bob.handle.view();
    assert_eq!(bob_view.call_state, CallState::Idle);
    assert_eq!(bob_view.incoming, None);
    assert!(bob.connector.sessions().await.is_empty());
    for link in alice.connector.sessions().await {
        assert!(link.is_closed().await);
    }
}

#[tokio::test]
async fn test_cancel_when_idle_does_nothing() {
    init_tracing();

    let relay = MemoryRelay::new();
    let (alice, bob) = create_pair(&relay).await.expect("Failed to join");

    alice.handle.cancel_call().await.unwrap();
    alice.handle.reject_call().await.unwrap();
    settle().await;

    assert!(alice.events.events().await.is_empty());
    assert!(bob.events.events().await.is_empty());
    assert_eq!(alice.handle.view().call_state, CallState::Idle);
}

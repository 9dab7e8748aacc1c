use duet_client::signaling::MemoryRelay;
use duet_client::transport::LinkState;
use duet_client::{CallState, EndReason};
use duet_core::CallKind;

use crate::integration::{create_pair, init_tracing};
use crate::utils::{Recorded, settle};

#[tokio::test]
async fn test_events_from_replaced_session_are_dropped() {
    init_tracing();

    let relay = MemoryRelay::new();
    let (alice, bob) = create_pair(&relay).await.expect("Failed to join");

    alice.handle.start_call(CallKind::Chat).await.unwrap();
    let first = alice.session(1).await.unwrap();
    alice.handle.cancel_call().await.unwrap();
    alice
        .wait_view(|v| v.call_state == CallState::Idle)
        .await
        .unwrap();
    assert!(first.is_closed().await);

    alice.handle.start_call(CallKind::Chat).await.unwrap();
    let second = alice.session(2).await.unwrap();
    bob.wait_view(|v| v.call_state == CallState::Incoming)
        .await
        .unwrap();

    // The old link reports late, including a failure and a connect.
    first.set_state(LinkState::Failed).await;
    first.connect().await;
    first.local_hint("stale").await;
    settle().await;

    let view = alice.handle.view();
    assert_eq!(view.call_state, CallState::Outgoing);
    assert!(!view.connected);
    assert!(!view.channel_open);
    assert_eq!(alice.events.ended().await, vec![EndReason::LocalCancel]);
    assert!(!second.is_closed().await);
    assert_eq!(bob.events.count(|e| matches!(e, Recorded::Ended(_))).await, 1);

    // The live link still drives the call.
    second.set_state(LinkState::Failed).await;
    alice
        .wait_view(|v| v.call_state == CallState::Idle)
        .await
        .unwrap();
    assert_eq!(
        alice.events.ended().await,
        vec![EndReason::LocalCancel, EndReason::ConnectionLost]
    );
}

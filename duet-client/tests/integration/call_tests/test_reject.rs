use duet_client::signaling::MemoryRelay;
use duet_client::{CallState, EndReason};
use duet_core::CallKind;

use crate::integration::{create_pair, init_tracing};
use crate::utils::{EVENT_TIMEOUT_MS, Recorded};

#[tokio::test]
async fn test_callee_rejects() {
    init_tracing();

    let relay = MemoryRelay::new();
    let (alice, bob) = create_pair(&relay).await.expect("Failed to join");

    alice.handle.start_call(CallKind::Canvas).await.unwrap();
    bob.wait_view(|v| v.call_state == CallState::Incoming)
        .await
        .expect("Bob never rang");

    bob.handle.reject_call().await.unwrap();

    assert!(
        alice
            .events
            .wait_for(
                |e| *e == Recorded::Ended(EndReason::RemoteReject),
                EVENT_TIMEOUT_MS
            )
            .await
    );
    let alice_view = alice
        .wait_view(|v| v.call_state == CallState::Idle)
        .await
        .unwrap();
    assert_eq!(alice_view.call_kind, None);

    let alice_link = alice.connector.latest().await.unwrap();
    assert!(alice_link.is_closed().await);

    let bob_view = bob.handle.view();
    assert_eq!(bob_view.call_state, CallState::Idle);
    assert_eq!(bob_view.incoming, None);
    assert_eq!(bob.events.ended().await, vec![EndReason::LocalReject]);
    assert!(bob.connector.sessions().await.is_empty());
}

use duet_client::history::MemoryHistory;
use duet_client::signaling::MemoryRelay;
use duet_client::{CallState, IncomingCall};
use duet_core::CallKind;
use std::sync::Arc;

use crate::integration::{init_tracing, wait_for_call};
use crate::utils::{LinkCall, PromptDevices, TestPeer, settle};

#[tokio::test]
async fn test_simultaneous_calls_keep_the_greater_id() {
    init_tracing();

    let relay = MemoryRelay::new();
    let alice_devices = PromptDevices::new();
    let bob_devices = PromptDevices::new();
    let alice = TestPeer::join_with(
        &relay,
        "alice",
        Arc::new(alice_devices.clone()),
        Arc::new(MemoryHistory::new()),
    )
    .await
    .unwrap();
    let bob = TestPeer::join_with(
        &relay,
        "bob",
        Arc::new(bob_devices.clone()),
        Arc::new(MemoryHistory::new()),
    )
    .await
    .unwrap();

    // Both sides are Outgoing before either offer exists.
    alice.handle.start_call(CallKind::Voice).await.unwrap();
    bob.handle.start_call(CallKind::Voice).await.unwrap();
    alice_devices.wait_prompted().await;
    bob_devices.wait_prompted().await;
    alice_devices.grant();
    let alice_first = alice.session(1).await.unwrap();
    bob_devices.grant();

    // "bob" > "alice": alice yields and rings, bob keeps calling.
    let alice_view = alice
        .wait_view(|v| v.call_state == CallState::Incoming)
        .await
        .expect("Alice did not yield");
    assert_eq!(
        alice_view.incoming,
        Some(IncomingCall {
            call_type: CallKind::Voice,
            from: bob.id.clone(),
        })
    );
    settle().await;
    assert_eq!(bob.handle.view().call_state, CallState::Outgoing);

    assert!(alice_first.is_closed().await);
    assert!(alice.events.ended().await.is_empty(), "yielding is silent");

    // The surviving call completes normally; media is already held.
    alice.handle.accept_call().await.unwrap();
    let alice_second = alice.session(2).await.unwrap();
    let bob_link = bob.session(1).await.unwrap();
    wait_for_call(&bob_link, |c| {
        *c == LinkCall::SetRemoteAnswer(format!("fake-answer-{}", alice_second.id.0))
    })
    .await
    .expect("Bob never applied alice's answer");
    assert_eq!(alice_devices.captures(), 1);
}

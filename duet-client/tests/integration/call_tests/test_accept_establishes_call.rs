use duet_client::CallState;
use duet_client::signaling::MemoryRelay;
use duet_core::CallKind;

use crate::integration::{create_pair, establish_call, init_tracing};
use crate::utils::{EVENT_TIMEOUT_MS, LinkCall, Recorded};

#[tokio::test]
async fn test_accept_establishes_call() {
    init_tracing();

    let relay = MemoryRelay::new();
    let (alice, bob) = create_pair(&relay).await.expect("Failed to join");

    let (alice_link, bob_link) = establish_call(&alice, &bob, CallKind::Video)
        .await
        .expect("Call setup failed");

    assert!(
        alice
            .events
            .wait_for(|e| *e == Recorded::Accepted(CallKind::Video), EVENT_TIMEOUT_MS)
            .await
    );
    assert!(
        bob.events
            .wait_for(|e| *e == Recorded::Accepted(CallKind::Video), EVENT_TIMEOUT_MS)
            .await
    );

    let alice_view = alice.handle.view();
    let bob_view = bob.handle.view();
    assert_eq!(alice_view.call_state, CallState::Idle);
    assert_eq!(bob_view.call_state, CallState::Idle);
    assert!(alice_view.is_active() && bob_view.is_active());
    assert_eq!(bob_view.incoming, None);
    assert_eq!(alice_view.call_kind, Some(CallKind::Video));

    // Video captures audio and video on both sides.
    assert_eq!(alice_link.local_tracks, 2);
    assert_eq!(bob_link.local_tracks, 2);
    assert!(bob_view.local_stream.is_some());

    let alice_calls = alice_link.calls().await;
    assert_eq!(
        &alice_calls[..3],
        &[
            LinkCall::CreateDataChannel("chat".into()),
            LinkCall::CreateOffer,
            LinkCall::SetRemoteAnswer(format!("fake-answer-{}", bob_link.id.0)),
        ]
    );
    let bob_calls = bob_link.calls().await;
    assert_eq!(
        &bob_calls[..2],
        &[
            LinkCall::SetRemoteOffer(format!("fake-offer-{}", alice_link.id.0)),
            LinkCall::CreateAnswer,
        ]
    );
    // The answering side never opens its own channel.
    assert!(
        !bob_calls
            .iter()
            .any(|c| matches!(c, LinkCall::CreateDataChannel(_)))
    );
}

#[tokio::test]
async fn test_chat_call_skips_media() {
    init_tracing();

    let relay = MemoryRelay::new();
    let (alice, bob) = create_pair(&relay).await.expect("Failed to join");

    let (alice_link, bob_link) = establish_call(&alice, &bob, CallKind::Chat)
        .await
        .expect("Call setup failed");

    assert_eq!(alice_link.local_tracks, 0);
    assert_eq!(bob_link.local_tracks, 0);
    assert!(alice.handle.view().local_stream.is_none());
}

#[tokio::test]
async fn test_second_start_while_connected_is_ignored() {
    init_tracing();

    let relay = MemoryRelay::new();
    let (alice, bob) = create_pair(&relay).await.expect("Failed to join");
    establish_call(&alice, &bob, CallKind::Chat)
        .await
        .expect("Call setup failed");

    alice.handle.start_call(CallKind::Voice).await.unwrap();
    crate::utils::settle().await;

    assert_eq!(alice.connector.sessions().await.len(), 1);
    assert_eq!(alice.handle.view().call_state, CallState::Idle);
    assert!(alice.handle.view().connected);
}

use duet_client::history::MemoryHistory;
use duet_client::signaling::MemoryRelay;
use duet_client::{CallState, EndReason, MediaError};
use duet_core::CallKind;
use std::sync::Arc;

use crate::integration::{init_tracing, wait_for_call};
use crate::utils::{EVENT_TIMEOUT_MS, FailingDevices, LinkCall, Recorded, TestPeer, settle};

#[tokio::test]
async fn test_denied_media_on_accept_still_answers() {
    init_tracing();

    let relay = MemoryRelay::new();
    let alice = TestPeer::join(&relay, "alice").await.unwrap();
    let bob = TestPeer::join_with(
        &relay,
        "bob",
        Arc::new(FailingDevices::new("NotAllowedError")),
        Arc::new(MemoryHistory::new()),
    )
    .await
    .unwrap();

    alice.handle.start_call(CallKind::Video).await.unwrap();
    bob.wait_view(|v| v.call_state == CallState::Incoming)
        .await
        .unwrap();

    bob.handle.accept_call().await.unwrap();
    let view = bob
        .wait_view(|v| v.media_error.is_some())
        .await
        .expect("Media error never surfaced");

    assert!(matches!(
        view.media_error,
        Some(MediaError::PermissionDenied(_))
    ));
    assert_eq!(view.call_state, CallState::Idle);
    assert!(view.local_stream.is_none());
    assert!(
        bob.events
            .wait_for(|e| matches!(e, Recorded::MediaError(_)), EVENT_TIMEOUT_MS)
            .await
    );

    // The answer goes out anyway, carrying no local tracks.
    let bob_link = bob.session(1).await.unwrap();
    assert_eq!(bob_link.local_tracks, 0);
    let alice_link = alice.session(1).await.unwrap();
    wait_for_call(&alice_link, |c| {
        *c == LinkCall::SetRemoteAnswer(format!("fake-answer-{}", bob_link.id.0))
    })
    .await
    .expect("Caller was never answered");

    assert!(
        bob.events
            .wait_for(|e| *e == Recorded::Accepted(CallKind::Video), EVENT_TIMEOUT_MS)
            .await
    );
    assert!(alice.events.ended().await.is_empty());
}

#[tokio::test]
async fn test_missing_device_on_start_rolls_back() {
    init_tracing();

    let relay = MemoryRelay::new();
    let alice = TestPeer::join_with(
        &relay,
        "alice",
        Arc::new(FailingDevices::new("NotFoundError")),
        Arc::new(MemoryHistory::new()),
    )
    .await
    .unwrap();
    let bob = TestPeer::join(&relay, "bob").await.unwrap();

    alice.handle.start_call(CallKind::Voice).await.unwrap();

    assert!(
        alice
            .events
            .wait_for(
                |e| *e == Recorded::Ended(EndReason::SetupFailed),
                EVENT_TIMEOUT_MS
            )
            .await
    );
    let view = alice.handle.view();
    assert_eq!(view.call_state, CallState::Idle);
    assert!(matches!(view.media_error, Some(MediaError::NoDevice(_))));
    assert!(alice.connector.sessions().await.is_empty());

    settle().await;
    assert_eq!(bob.handle.view().call_state, CallState::Idle);

    // Data-only calls still work without devices.
    alice.handle.start_call(CallKind::Chat).await.unwrap();
    bob.wait_view(|v| v.call_state == CallState::Incoming)
        .await
        .expect("Chat call should still ring");
}

#[tokio::test]
async fn test_negotiation_failure_on_accept_rejects() {
    init_tracing();

    let relay = MemoryRelay::new();
    let alice = TestPeer::join(&relay, "alice").await.unwrap();
    let bob = TestPeer::join(&relay, "bob").await.unwrap();
    bob.connector.fail_negotiation();

    alice.handle.start_call(CallKind::Chat).await.unwrap();
    bob.wait_view(|v| v.call_state == CallState::Incoming)
        .await
        .unwrap();
    bob.handle.accept_call().await.unwrap();

    assert!(
        bob.events
            .wait_for(
                |e| *e == Recorded::Ended(EndReason::SetupFailed),
                EVENT_TIMEOUT_MS
            )
            .await
    );
    assert!(
        alice
            .events
            .wait_for(
                |e| *e == Recorded::Ended(EndReason::RemoteReject),
                EVENT_TIMEOUT_MS
            )
            .await
    );
    let bob_link = bob.session(1).await.unwrap();
    assert!(bob_link.is_closed().await);
}

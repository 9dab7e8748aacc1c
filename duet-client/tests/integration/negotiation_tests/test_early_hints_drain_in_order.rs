use duet_client::CallState;
use duet_client::signaling::MemoryRelay;
use duet_core::CallKind;

use crate::integration::{create_pair, init_tracing, wait_for_call};
use crate::utils::{LinkCall, settle};

#[tokio::test]
async fn test_hints_before_answer_are_applied_after_the_offer() {
    init_tracing();

    let relay = MemoryRelay::new();
    let (alice, bob) = create_pair(&relay).await.expect("Failed to join");

    alice.handle.start_call(CallKind::Chat).await.unwrap();
    bob.wait_view(|v| v.call_state == CallState::Incoming)
        .await
        .unwrap();

    // Alice's candidates trickle in while bob is still ringing.
    let alice_link = alice.session(1).await.unwrap();
    for candidate in ["h1", "h2", "h3"] {
        alice_link.local_hint(candidate).await;
    }
    settle().await;
    assert!(bob.connector.sessions().await.is_empty());

    bob.handle.accept_call().await.unwrap();
    let bob_link = bob.session(1).await.unwrap();
    wait_for_call(&bob_link, |c| *c == LinkCall::CreateAnswer)
        .await
        .expect("Bob never answered");

    assert_eq!(
        bob_link.calls().await,
        vec![
            LinkCall::SetRemoteOffer(format!("fake-offer-{}", alice_link.id.0)),
            LinkCall::AddHint("h1".into()),
            LinkCall::AddHint("h2".into()),
            LinkCall::AddHint("h3".into()),
            LinkCall::CreateAnswer,
        ]
    );

    // Once the offer is applied, hints go straight through.
    alice_link.local_hint("h4").await;
    wait_for_call(&bob_link, |c| *c == LinkCall::AddHint("h4".into()))
        .await
        .expect("Late hint was not applied");
    assert_eq!(bob_link.applied_hints().await, vec!["h1", "h2", "h3", "h4"]);
}

#[tokio::test]
async fn test_caller_buffers_hints_until_answer() {
    init_tracing();

    let relay = MemoryRelay::new();
    let (alice, bob) = create_pair(&relay).await.expect("Failed to join");

    alice.handle.start_call(CallKind::Canvas).await.unwrap();
    bob.wait_view(|v| v.call_state == CallState::Incoming)
        .await
        .unwrap();
    bob.handle.accept_call().await.unwrap();

    let alice_link = alice.session(1).await.unwrap();
    let bob_link = bob.session(1).await.unwrap();
    wait_for_call(&alice_link, |c| matches!(c, LinkCall::SetRemoteAnswer(_)))
        .await
        .unwrap();

    bob_link.local_hint("b1").await;
    wait_for_call(&alice_link, |c| *c == LinkCall::AddHint("b1".into()))
        .await
        .expect("Caller never applied the hint");

    let calls = alice_link.calls().await;
    let answer_at = calls
        .iter()
        .position(|c| matches!(c, LinkCall::SetRemoteAnswer(_)))
        .unwrap();
    let hint_at = calls
        .iter()
        .position(|c| *c == LinkCall::AddHint("b1".into()))
        .unwrap();
    assert!(answer_at < hint_at);
    assert_eq!(calls[0], LinkCall::CreateDataChannel("chat".into()));
}

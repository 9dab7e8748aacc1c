use duet_client::signaling::{RoomEvent, SignalingRoom, WsRelayClient};
use duet_core::{CallKind, PresenceAction, SIGNAL_EVENT, SignalMessage};
use std::sync::Arc;

use crate::integration::init_tracing;
use crate::utils::{recv, spawn_relay};

#[tokio::test]
async fn test_offer_crosses_the_relay() {
    init_tracing();
    let (url, _service) = spawn_relay().await.expect("Failed to start relay");

    let alice_relay = Arc::new(WsRelayClient::connect(&url).await.unwrap());
    let bob_relay = Arc::new(WsRelayClient::connect(&url).await.unwrap());

    let (mut alice, mut alice_rx) =
        SignalingRoom::join(alice_relay, "p2p-chat:lobby".into(), SIGNAL_EVENT.into())
            .await
            .unwrap();
    let (mut bob, mut bob_rx) =
        SignalingRoom::join(bob_relay, "p2p-chat:lobby".into(), SIGNAL_EVENT.into())
            .await
            .unwrap();

    alice.announce_presence().await.unwrap();
    // Round trip so alice's entry is processed before bob asks.
    assert!(alice.current_members().await.unwrap().is_empty());
    bob.announce_presence().await.unwrap();
    assert_eq!(bob.current_members().await.unwrap(), vec![alice.local_id().clone()]);

    let offer = SignalMessage::Offer {
        sdp: "v=0".into(),
        from: alice.local_id().clone(),
        call_type: CallKind::Video,
    };
    alice.publish(&offer).await.unwrap();

    // Bob sees alice's presence and the offer; alice never sees her own offer.
    let mut saw_offer = false;
    while let Some(event) = recv(&mut bob_rx).await {
        if event == RoomEvent::Signal(offer.clone()) {
            saw_offer = true;
            break;
        }
    }
    assert!(saw_offer);

    bob.leave().await;
    let mut saw_leave = false;
    while let Some(event) = recv(&mut alice_rx).await {
        match event {
            RoomEvent::Presence(update) if update.action == PresenceAction::Leave => {
                assert_eq!(&update.client_id, bob.local_id());
                saw_leave = true;
                break;
            }
            RoomEvent::Signal(signal) => panic!("unexpected signal {:?}", signal),
            RoomEvent::Presence(_) => {}
        }
    }
    assert!(saw_leave);
    alice.leave().await;
}

use parley_core::ServerSignal;
use serde_json::json;

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::TestPeer;

#[tokio::test]
async fn test_client_supplied_from_is_ignored() {
    init_tracing();

    let relay = create_test_relay();
    let attacker = TestPeer::attach(&relay);
    let victim = TestPeer::attach(&relay);
    let mut target = TestPeer::attach(&relay);

    for peer in [&attacker, &victim, &target] {
        peer.join(&relay, "room1").unwrap();
    }
    target.drain();

    let frame = json!({
        "event": "answer",
        "data": { "to": target.id, "from": victim.id, "answer": { "sdp": "spoofed" } }
    });
    relay.handle_text(attacker.id, &frame.to_string()).unwrap();

    assert_eq!(
        target.drain(),
        vec![ServerSignal::Answer {
            from: attacker.id,
            answer: json!({ "sdp": "spoofed" })
        }]
    );
}

#[tokio::test]
async fn test_every_kind_is_stamped_with_true_sender() {
    init_tracing();

    let relay = create_test_relay();
    let a = TestPeer::attach(&relay);
    let mut b = TestPeer::attach(&relay);
    a.join(&relay, "room1").unwrap();
    b.join(&relay, "room1").unwrap();

    a.offer(&relay, b.id, json!(1)).unwrap();
    a.answer(&relay, b.id, json!(2)).unwrap();
    a.candidate(&relay, b.id, json!(3)).unwrap();

    let senders: Vec<_> = b
        .drain()
        .into_iter()
        .map(|signal| match signal {
            ServerSignal::Offer { from, .. }
            | ServerSignal::Answer { from, .. }
            | ServerSignal::IceCandidate { from, .. } => from,
            other => panic!("unexpected {:?}", other),
        })
        .collect();

    assert_eq!(senders, vec![a.id, a.id, a.id]);
}

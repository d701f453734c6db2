use parley_core::{ServerSignal, SessionId};
use parley_server::{ConnectionState, RelayError};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::{TestPeer, error_code, guests};

#[tokio::test]
async fn test_join_same_room_twice_is_noop() {
    init_tracing();

    let relay = create_test_relay();
    let mut a = TestPeer::attach(&relay);
    let mut b = TestPeer::attach(&relay);

    a.join(&relay, "room1").unwrap();
    b.join(&relay, "room1").unwrap();
    assert_eq!(guests(&a.drain()), vec![b.id]);

    b.join(&relay, "room1").unwrap();

    a.assert_silent();
    b.assert_silent();
    assert_eq!(relay.members(&SessionId::from("room1")).len(), 2);
}

#[tokio::test]
async fn test_join_other_room_while_joined_is_rejected() {
    init_tracing();

    let relay = create_test_relay();
    let mut a = TestPeer::attach(&relay);
    let mut outsider = TestPeer::attach(&relay);
    outsider.join(&relay, "room2").unwrap();

    a.join(&relay, "room1").unwrap();
    let err = a.join(&relay, "room2").unwrap_err();

    assert_eq!(
        err,
        RelayError::AlreadyJoined {
            current: SessionId::from("room1"),
            requested: SessionId::from("room2"),
        }
    );
    let reply = a.drain();
    assert_eq!(reply.len(), 1);
    assert_eq!(error_code(&reply[0]), Some("already-joined"));

    assert_eq!(relay.session_of(&a.id), Some(SessionId::from("room1")));
    assert!(!relay.members(&SessionId::from("room2")).contains(&a.id));
    outsider.assert_silent();
}

#[tokio::test]
async fn test_leave_then_join_other_room() {
    init_tracing();

    let relay = create_test_relay();
    let mut a = TestPeer::attach(&relay);
    let mut b = TestPeer::attach(&relay);
    let mut c = TestPeer::attach(&relay);

    a.join(&relay, "room1").unwrap();
    b.join(&relay, "room1").unwrap();
    c.join(&relay, "room2").unwrap();
    a.drain();

    b.leave(&relay).unwrap();
    assert_eq!(relay.state_of(&b.id), Some(ConnectionState::Attached));
    assert_eq!(a.drain(), vec![ServerSignal::PeerLeft { id: b.id }]);

    b.join(&relay, "room2").unwrap();
    assert_eq!(guests(&c.drain()), vec![b.id]);
    b.assert_silent();
    a.assert_silent();
}

#[tokio::test]
async fn test_leave_without_join_is_rejected() {
    init_tracing();

    let relay = create_test_relay();
    let mut a = TestPeer::attach(&relay);

    assert_eq!(a.leave(&relay).unwrap_err(), RelayError::NotJoined);
    let reply = a.drain();
    assert_eq!(error_code(&reply[0]), Some("not-joined"));
}

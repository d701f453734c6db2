use crate::model::connection::ConnectionId;
use crate::model::session::SessionId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Addressed negotiation step carried between two connections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::IceCandidate => "ice-candidate",
        };
        f.write_str(name)
    }
}

/// Frames a client sends to the relay.
///
/// There is deliberately no `from` field anywhere: the sender is whatever
/// connection the frame arrived on, and unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientSignal {
    JoinRoom(SessionId),
    LeaveRoom,
    Offer { to: ConnectionId, offer: Value },
    Answer { to: ConnectionId, answer: Value },
    IceCandidate { to: ConnectionId, candidate: Value },
}

impl ClientSignal {
    /// Recipient and kind of an addressed negotiation frame.
    pub fn addressed(&self) -> Option<(ConnectionId, SignalKind)> {
        match self {
            ClientSignal::Offer { to, .. } => Some((*to, SignalKind::Offer)),
            ClientSignal::Answer { to, .. } => Some((*to, SignalKind::Answer)),
            ClientSignal::IceCandidate { to, .. } => Some((*to, SignalKind::IceCandidate)),
            ClientSignal::JoinRoom(_) | ClientSignal::LeaveRoom => None,
        }
    }
}

/// Frames the relay sends to a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerSignal {
    Welcome { id: ConnectionId },
    GuestJoined { id: ConnectionId },
    PeerLeft { id: ConnectionId },
    Offer { from: ConnectionId, offer: Value },
    Answer { from: ConnectionId, answer: Value },
    IceCandidate { from: ConnectionId, candidate: Value },
    DeliveryFailed { to: ConnectionId, kind: SignalKind },
    Error { code: String, message: String },
}

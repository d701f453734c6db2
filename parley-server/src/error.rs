use parley_core::{ConnectionId, ServerSignal, SessionId, SignalKind};

pub type RelayResult<T> = Result<T, RelayError>;

/// Reasons a client frame was not relayed.
///
/// Every variant is reported back to the sending connection only.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RelayError {
    #[error("connection has not joined a session")]
    NotJoined,

    #[error("already joined session '{current}', cannot join '{requested}'")]
    AlreadyJoined {
        current: SessionId,
        requested: SessionId,
    },

    #[error("{kind} for {to} could not be delivered")]
    RecipientUnavailable { to: ConnectionId, kind: SignalKind },

    #[error("unknown connection {0}")]
    UnknownConnection(ConnectionId),

    #[error("malformed message: {0}")]
    Malformed(String),
}

impl RelayError {
    /// Stable wire code.
    pub fn code(&self) -> &'static str {
        match self {
            RelayError::NotJoined => "not-joined",
            RelayError::AlreadyJoined { .. } => "already-joined",
            RelayError::RecipientUnavailable { .. } => "delivery-failed",
            RelayError::UnknownConnection(_) => "unknown-connection",
            RelayError::Malformed(_) => "malformed",
        }
    }

    pub fn to_signal(&self) -> ServerSignal {
        match self {
            RelayError::RecipientUnavailable { to, kind } => ServerSignal::DeliveryFailed {
                to: *to,
                kind: *kind,
            },
            other => ServerSignal::Error {
                code: other.code().to_owned(),
                message: other.to_string(),
            },
        }
    }
}

/// Lifecycle of a single connection.
///
/// `Attached -> Joined -> (Detached | AbnormallyDisconnected)`. A connection may
/// also go back from `Joined` to `Attached` on an explicit leave, or terminate
/// straight from `Attached`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Attached,
    Joined,
    Detached,
    AbnormallyDisconnected,
}

impl ConnectionState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ConnectionState::Detached | ConnectionState::AbnormallyDisconnected
        )
    }

    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;

        match (self, next) {
            (Attached, Joined) | (Joined, Attached) => true,
            (Attached | Joined, Detached | AbnormallyDisconnected) => true,
            _ => false,
        }
    }
}

/// How a transport went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The client closed the channel cleanly.
    Closed,
    /// Transport error or stream ended without a close handshake.
    Abnormal,
}

impl From<DisconnectReason> for ConnectionState {
    fn from(reason: DisconnectReason) -> Self {
        match reason {
            DisconnectReason::Closed => ConnectionState::Detached,
            DisconnectReason::Abnormal => ConnectionState::AbnormallyDisconnected,
        }
    }
}

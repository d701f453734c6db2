use crate::directory::SessionDirectory;
use crate::error::{RelayError, RelayResult};
use crate::registry::connection_state::{ConnectionState, DisconnectReason};
use dashmap::DashMap;
use parley_core::{ConnectionId, ServerSignal, SessionId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

struct ConnectionEntry {
    session: Option<SessionId>,
    state: ConnectionState,
    outbox: mpsc::UnboundedSender<ServerSignal>,
}

/// What was torn down by [`ConnectionRegistry::detach`].
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    pub connection_id: ConnectionId,
    pub session: Option<SessionId>,
    pub state: ConnectionState,
}

/// Live connections, their session binding and their outbound queue.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    connections: Arc<DashMap<ConnectionId, ConnectionEntry>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, outbox: mpsc::UnboundedSender<ServerSignal>) -> ConnectionId {
        let id = ConnectionId::new();
        self.connections.insert(
            id,
            ConnectionEntry {
                session: None,
                state: ConnectionState::Attached,
                outbox,
            },
        );
        id
    }

    /// Removes the connection. If it was joined, it leaves its session first so
    /// nobody can resolve it as a recipient once this returns. Calling it again
    /// for the same id is a no-op.
    pub fn detach(
        &self,
        connection_id: &ConnectionId,
        reason: DisconnectReason,
        directory: &SessionDirectory,
    ) -> Option<Departure> {
        let state = ConnectionState::from(reason);

        let session = {
            let mut entry = self.connections.get_mut(connection_id)?;
            if entry.state.is_terminal() {
                return None;
            }
            entry.state = state;
            let session = entry.session.take();
            if let Some(session) = &session {
                directory.leave(session, connection_id);
            }
            session
        };

        self.connections.remove(connection_id);

        debug!("{} removed from registry ({:?})", connection_id, state);
        Some(Departure {
            connection_id: *connection_id,
            session,
            state,
        })
    }

    pub fn is_live(&self, connection_id: &ConnectionId) -> bool {
        self.connections
            .get(connection_id)
            .is_some_and(|entry| !entry.state.is_terminal())
    }

    pub fn state_of(&self, connection_id: &ConnectionId) -> Option<ConnectionState> {
        self.connections.get(connection_id).map(|entry| entry.state)
    }

    pub fn session_of(&self, connection_id: &ConnectionId) -> Option<SessionId> {
        self.connections
            .get(connection_id)
            .and_then(|entry| entry.session.clone())
    }

    /// Binds the connection to `session` and adds it to the directory while
    /// holding the connection's entry, so a racing join, leave or detach for the
    /// same connection cannot interleave with the directory update.
    ///
    /// Returns the members present before the join, or `None` when the
    /// connection was already in `session`.
    pub fn join_session(
        &self,
        connection_id: &ConnectionId,
        session: &SessionId,
        directory: &SessionDirectory,
    ) -> RelayResult<Option<Vec<ConnectionId>>> {
        let mut entry = self
            .connections
            .get_mut(connection_id)
            .ok_or(RelayError::UnknownConnection(*connection_id))?;

        match &entry.session {
            Some(current) if current == session => return Ok(None),
            Some(current) => {
                return Err(RelayError::AlreadyJoined {
                    current: current.clone(),
                    requested: session.clone(),
                });
            }
            None => {}
        }
        if !entry.state.can_transition_to(ConnectionState::Joined) {
            return Err(RelayError::UnknownConnection(*connection_id));
        }

        let existing = directory.join(session, *connection_id);
        entry.state = ConnectionState::Joined;
        entry.session = Some(session.clone());
        Ok(Some(existing))
    }

    /// Clears the session binding, removes the connection from the directory
    /// and returns the session that was left.
    pub fn leave_session(
        &self,
        connection_id: &ConnectionId,
        directory: &SessionDirectory,
    ) -> Option<SessionId> {
        let mut entry = self.connections.get_mut(connection_id)?;
        if entry.state != ConnectionState::Joined {
            return None;
        }
        let session = entry.session.take()?;
        entry.state = ConnectionState::Attached;
        directory.leave(&session, connection_id);
        Some(session)
    }

    /// Enqueues a signal for a live connection. Returns `false` when the
    /// connection is gone or its outbound queue is closed.
    pub fn deliver(&self, connection_id: &ConnectionId, signal: ServerSignal) -> bool {
        let Some(entry) = self.connections.get(connection_id) else {
            return false;
        };
        if entry.state.is_terminal() {
            return false;
        }
        if entry.outbox.send(signal).is_err() {
            warn!("Outbound queue of {} is closed", connection_id);
            return false;
        }
        true
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

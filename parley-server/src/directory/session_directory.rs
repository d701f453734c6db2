use dashmap::DashMap;
use parley_core::{ConnectionId, SessionId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Session name -> member connections.
///
/// A session exists exactly while it has at least one member: the entry is
/// created by the first join and pruned by the leave that empties it. Every
/// operation on one session runs under that entry's shard lock, so readers never
/// see a half-applied join or leave.
#[derive(Clone, Default)]
pub struct SessionDirectory {
    sessions: Arc<DashMap<SessionId, HashSet<ConnectionId>>>,
}

impl SessionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `connection_id` and returns the members present just before the add.
    /// The joining connection is never part of the returned snapshot.
    pub fn join(&self, session_id: &SessionId, connection_id: ConnectionId) -> Vec<ConnectionId> {
        let mut members = self.sessions.entry(session_id.clone()).or_default();

        let existing: Vec<ConnectionId> = members
            .iter()
            .filter(|id| **id != connection_id)
            .copied()
            .collect();
        members.insert(connection_id);

        debug!(
            "{} joined session '{}' ({} members)",
            connection_id,
            session_id,
            members.len()
        );
        existing
    }

    /// Removes a member and prunes the session once it is empty.
    pub fn leave(&self, session_id: &SessionId, connection_id: &ConnectionId) -> bool {
        let removed = match self.sessions.get_mut(session_id) {
            Some(mut members) => members.remove(connection_id),
            None => return false,
        };

        if self
            .sessions
            .remove_if(session_id, |_, members| members.is_empty())
            .is_some()
        {
            debug!("Session '{}' is empty, pruned", session_id);
        }

        removed
    }

    pub fn members(&self, session_id: &SessionId) -> HashSet<ConnectionId> {
        self.sessions
            .get(session_id)
            .map(|members| members.value().clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, session_id: &SessionId, connection_id: &ConnectionId) -> bool {
        self.sessions
            .get(session_id)
            .is_some_and(|members| members.contains(connection_id))
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

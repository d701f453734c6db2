use crate::config::RelayConfig;
use crate::directory::SessionDirectory;
use crate::error::{RelayError, RelayResult};
use crate::registry::ConnectionRegistry;
use parley_core::{ClientSignal, ConnectionId, ServerSignal, SessionId, SignalKind};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Validates client frames and delivers them to the right connections.
///
/// Join announcements fan out to the members that existed before the join.
/// Offers, answers and ICE candidates go to exactly the addressed recipient,
/// with `from` set to the connection the frame arrived on.
#[derive(Clone)]
pub struct MessageRouter {
    registry: ConnectionRegistry,
    directory: SessionDirectory,
    config: Arc<RelayConfig>,
}

impl MessageRouter {
    pub fn new(
        registry: ConnectionRegistry,
        directory: SessionDirectory,
        config: Arc<RelayConfig>,
    ) -> Self {
        Self {
            registry,
            directory,
            config,
        }
    }

    /// Routes one frame. Failures are reported to `sender` and returned.
    pub fn dispatch(&self, sender: ConnectionId, signal: ClientSignal) -> RelayResult<()> {
        let result = match signal {
            ClientSignal::JoinRoom(session) => self.join(sender, session).map(|_| ()),
            ClientSignal::LeaveRoom => self.leave(sender),
            ClientSignal::Offer { to, offer } => self.forward(
                sender,
                to,
                SignalKind::Offer,
                ServerSignal::Offer {
                    from: sender,
                    offer,
                },
            ),
            ClientSignal::Answer { to, answer } => self.forward(
                sender,
                to,
                SignalKind::Answer,
                ServerSignal::Answer {
                    from: sender,
                    answer,
                },
            ),
            ClientSignal::IceCandidate { to, candidate } => self.forward(
                sender,
                to,
                SignalKind::IceCandidate,
                ServerSignal::IceCandidate {
                    from: sender,
                    candidate,
                },
            ),
        };

        if let Err(e) = &result {
            self.report(sender, e);
        }
        result
    }

    /// Joins `sender` to `session` and announces it to every earlier member.
    /// Returns how many members were notified.
    pub fn join(&self, sender: ConnectionId, session: SessionId) -> RelayResult<usize> {
        let Some(existing) = self.registry.join_session(&sender, &session, &self.directory)?
        else {
            debug!("{} is already in room '{}', ignoring join", sender, session);
            return Ok(0);
        };

        info!("User {} joined room '{}'", sender, session);

        for member in &existing {
            if !self
                .registry
                .deliver(member, ServerSignal::GuestJoined { id: sender })
            {
                debug!("guest-joined for {} not delivered to {}", sender, member);
            }
        }

        Ok(existing.len())
    }

    /// Removes `sender` from its session without closing the connection.
    pub fn leave(&self, sender: ConnectionId) -> RelayResult<()> {
        let session = self
            .registry
            .leave_session(&sender, &self.directory)
            .ok_or(RelayError::NotJoined)?;

        info!("User {} left room '{}'", sender, session);

        self.announce_departure(sender, &session);
        Ok(())
    }

    /// Sends `peer-left` for `departed` to every current member of `session`.
    pub fn announce_departure(&self, departed: ConnectionId, session: &SessionId) -> usize {
        if !self.config.notify_peer_left {
            return 0;
        }

        let mut notified = 0;
        for member in self.directory.members(session) {
            if member != departed
                && self
                    .registry
                    .deliver(&member, ServerSignal::PeerLeft { id: departed })
            {
                notified += 1;
            }
        }
        notified
    }

    /// Reports an unparseable frame back to `sender`.
    pub fn reject_malformed(&self, sender: ConnectionId, detail: impl Into<String>) -> RelayError {
        let err = RelayError::Malformed(detail.into());
        self.report(sender, &err);
        err
    }

    fn forward(
        &self,
        sender: ConnectionId,
        to: ConnectionId,
        kind: SignalKind,
        relayed: ServerSignal,
    ) -> RelayResult<()> {
        let session = self
            .registry
            .session_of(&sender)
            .ok_or(RelayError::NotJoined)?;

        if self.config.enforce_same_session && !self.directory.contains(&session, &to) {
            debug!("Dropping {} from {}: {} is not in room '{}'", kind, sender, to, session);
            return Err(RelayError::RecipientUnavailable { to, kind });
        }

        if !self.registry.deliver(&to, relayed) {
            debug!("Dropping {} from {}: {} is not connected", kind, sender, to);
            return Err(RelayError::RecipientUnavailable { to, kind });
        }

        debug!("Relayed {} {} -> {}", kind, sender, to);
        Ok(())
    }

    fn report(&self, sender: ConnectionId, err: &RelayError) {
        warn!("Rejected message from {}: {}", sender, err);

        if matches!(err, RelayError::RecipientUnavailable { .. })
            && !self.config.report_delivery_failures
        {
            return;
        }
        self.registry.deliver(&sender, err.to_signal());
    }
}

use crate::directory::SessionDirectory;
use crate::registry::{ConnectionRegistry, Departure, DisconnectReason};
use crate::router::MessageRouter;
use parley_core::{ConnectionId, ServerSignal};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Owns the attach and teardown edges of every connection's lifecycle.
#[derive(Clone)]
pub struct LifecycleSupervisor {
    registry: ConnectionRegistry,
    directory: SessionDirectory,
    router: MessageRouter,
}

impl LifecycleSupervisor {
    pub fn new(
        registry: ConnectionRegistry,
        directory: SessionDirectory,
        router: MessageRouter,
    ) -> Self {
        Self {
            registry,
            directory,
            router,
        }
    }

    /// Registers a new transport and greets it with its id.
    pub fn attach(&self, outbox: mpsc::UnboundedSender<ServerSignal>) -> ConnectionId {
        let id = self.registry.attach(outbox);
        self.registry.deliver(&id, ServerSignal::Welcome { id });
        info!("User connected: {}", id);
        id
    }

    /// Tears a connection down: session leave, registry removal, then
    /// `peer-left` to whoever is still in the session.
    pub fn disconnect(&self, id: ConnectionId, reason: DisconnectReason) -> Option<Departure> {
        let departure = self.registry.detach(&id, reason, &self.directory)?;

        match reason {
            DisconnectReason::Closed => info!("User disconnected: {}", id),
            DisconnectReason::Abnormal => warn!("User dropped without close: {}", id),
        }

        if let Some(session) = &departure.session {
            self.router.announce_departure(id, session);
        }
        Some(departure)
    }
}

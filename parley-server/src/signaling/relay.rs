use crate::config::RelayConfig;
use crate::directory::SessionDirectory;
use crate::error::RelayResult;
use crate::registry::{ConnectionRegistry, ConnectionState, Departure, DisconnectReason};
use crate::router::MessageRouter;
use crate::supervisor::LifecycleSupervisor;
use parley_core::{ClientSignal, ConnectionId, ServerSignal, SessionId};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

struct RelayInner {
    registry: ConnectionRegistry,
    directory: SessionDirectory,
    router: MessageRouter,
    supervisor: LifecycleSupervisor,
}

/// One signaling relay instance. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Relay {
    inner: Arc<RelayInner>,
}

impl Relay {
    pub fn new(config: RelayConfig) -> Self {
        let config = Arc::new(config);
        let registry = ConnectionRegistry::new();
        let directory = SessionDirectory::new();
        let router = MessageRouter::new(registry.clone(), directory.clone(), config);
        let supervisor =
            LifecycleSupervisor::new(registry.clone(), directory.clone(), router.clone());

        Self {
            inner: Arc::new(RelayInner {
                registry,
                directory,
                router,
                supervisor,
            }),
        }
    }

    /// Attaches a transport whose outbound frames are read from the other end
    /// of `outbox`. The first frame queued is `welcome`.
    pub fn attach(&self, outbox: mpsc::UnboundedSender<ServerSignal>) -> ConnectionId {
        self.inner.supervisor.attach(outbox)
    }

    pub fn dispatch(&self, sender: ConnectionId, signal: ClientSignal) -> RelayResult<()> {
        self.inner.router.dispatch(sender, signal)
    }

    /// Parses one text frame and routes it.
    pub fn handle_text(&self, sender: ConnectionId, text: &str) -> RelayResult<()> {
        match serde_json::from_str::<ClientSignal>(text) {
            Ok(signal) => self.dispatch(sender, signal),
            Err(e) => Err(self.inner.router.reject_malformed(sender, e.to_string())),
        }
    }

    pub fn reject_malformed(&self, sender: ConnectionId, detail: &str) {
        self.inner.router.reject_malformed(sender, detail);
    }

    pub fn disconnect(&self, id: ConnectionId, reason: DisconnectReason) -> Option<Departure> {
        self.inner.supervisor.disconnect(id, reason)
    }

    pub fn members(&self, session: &SessionId) -> HashSet<ConnectionId> {
        self.inner.directory.members(session)
    }

    pub fn session_of(&self, id: &ConnectionId) -> Option<SessionId> {
        self.inner.registry.session_of(id)
    }

    pub fn state_of(&self, id: &ConnectionId) -> Option<ConnectionState> {
        self.inner.registry.state_of(id)
    }

    pub fn is_live(&self, id: &ConnectionId) -> bool {
        self.inner.registry.is_live(id)
    }

    pub fn session_count(&self) -> usize {
        self.inner.directory.session_count()
    }

    pub fn connection_count(&self) -> usize {
        self.inner.registry.len()
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new(RelayConfig::default())
    }
}

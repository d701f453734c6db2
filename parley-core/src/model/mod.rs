mod connection;
mod session;
mod signaling;

pub use connection::ConnectionId;
pub use session::SessionId;
pub use signaling::{ClientSignal, ServerSignal, SignalKind};

mod connection_registry;
mod connection_state;

pub use connection_registry::*;
pub use connection_state::*;

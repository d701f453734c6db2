pub mod connection_tests;

use parley_server::{Relay, RelayConfig};
use tracing::Level;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn create_test_relay() -> Relay {
    Relay::new(RelayConfig::default())
}

pub fn create_relay_with(config: RelayConfig) -> Relay {
    Relay::new(config)
}

pub use parley_core::model::{ConnectionId, SessionId};

pub mod model {
    pub use parley_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use parley_server::*;
}

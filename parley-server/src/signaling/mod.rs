mod relay;
mod ws_handler;

pub use relay::*;
pub use ws_handler::*;

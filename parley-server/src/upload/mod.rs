mod capture_store;
mod upload_handler;

pub use capture_store::*;
pub use upload_handler::*;

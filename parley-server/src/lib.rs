mod app;
mod config;
mod directory;
mod error;
mod registry;
mod router;
mod signaling;
mod supervisor;
mod upload;

pub use app::*;
pub use config::*;
pub use directory::*;
pub use error::*;
pub use registry::*;
pub use router::*;
pub use signaling::*;
pub use supervisor::*;
pub use upload::*;

mod session_directory;

pub use session_directory::*;

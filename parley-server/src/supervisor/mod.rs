mod lifecycle_supervisor;

pub use lifecycle_supervisor::*;

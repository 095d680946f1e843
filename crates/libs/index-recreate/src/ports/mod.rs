pub mod cluster;
pub mod config;
pub mod populate;
pub mod report;

/// Error raised by a collaborator, kept opaque by the core.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

//! Taxing Core - shared error, configuration and logging types
//!
//! Every other crate in the portal workspace builds on these definitions.

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
pub use logging::*;

// Re-export commonly used external types
pub use tracing;

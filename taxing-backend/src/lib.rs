//! Taxing Backend - typed access to the portal's REST backend
//!
//! The backend owns users, franchises and every permission check. This crate
//! only speaks its wire format: JSON bodies, bearer tokens and `detail` error
//! bodies.

pub mod client;
pub mod messages;
pub mod types;

pub use client::{BackendClient, BackendConfig, PortalBackend};
pub use types::*;

//! Session Management Module
//!
//! The session is the only state the authorization model reads. It is kept
//! behind the [`SessionStore`] trait so guards and navigation receive it
//! explicitly instead of reaching into global storage.

pub mod storage;
pub mod store;
pub mod types;

pub use storage::FileSessionStore;
pub use store::{MemorySessionStore, SessionStore};
pub use types::*;

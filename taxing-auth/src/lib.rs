//! Taxing Auth - client-side authorization model for the portal
//!
//! This crate owns the pieces that decide what a visitor may see:
//!
//! - **Session Store**: `token`, `userEmail` and `userRole`, behind a trait
//! - **Role Resolver**: pure decision from a session and a required role
//! - **Route Guard**: `Loading → Authorized | Unauthorized` per route entry
//! - **Navigation**: menus and post-login destinations derived from the session
//! - **Registration**: form rules checked before the backend is called
//!
//! None of this is a security boundary. The backend re-checks every request.

pub mod guard;
pub mod navigation;
pub mod registration;
pub mod resolver;
pub mod role;
pub mod session;

pub use guard::{GuardOutcome, GuardState, ProtectedRoute, RouteGuard};
pub use navigation::{menu_for, post_login_destination, post_register_destination, MenuItem};
pub use registration::{is_valid_email, RegistrationError, RegistrationForm};
pub use resolver::{authorize, RoleResolver, SuperAdminDirectory};
pub use role::Role;
pub use session::{
    FileSessionStore, MemorySessionStore, Session, SessionGrant, SessionKey, SessionStore,
};

//! Role resolver
//!
//! Decides whether a session may enter a route that requires a given role.
//! Super-admin access is decided by the configured email directory, never by
//! the stored role string.

use crate::role::Role;
use crate::session::Session;
use std::collections::HashSet;
use taxing_core::{AuthSettings, DEFAULT_SUPER_ADMIN_EMAILS};

/// Emails granted super-admin access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperAdminDirectory {
    emails: HashSet<String>,
}

impl SuperAdminDirectory {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            emails: emails.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(settings.super_admin_emails.iter().cloned())
    }

    /// Exact, case-sensitive membership
    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(email)
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

impl Default for SuperAdminDirectory {
    fn default() -> Self {
        Self::new(DEFAULT_SUPER_ADMIN_EMAILS)
    }
}

/// Pure authorization decision.
///
/// Order matters: a missing token denies everything, `super_admin` only
/// looks at the email, and `None` admits any session holding a token.
pub fn authorize(
    session: &Session,
    required: Option<&Role>,
    super_admins: &SuperAdminDirectory,
) -> bool {
    if session.token().is_none() {
        return false;
    }

    match required {
        Some(Role::SuperAdmin) => session
            .email()
            .is_some_and(|email| super_admins.contains(email)),
        Some(Role::Franchise) => session.user_role.as_deref() == Some("franchise"),
        Some(role) => session.user_role.as_deref() == Some(role.as_str()),
        None => true,
    }
}

/// Resolver bound to a super-admin directory, shared by guards and menus
#[derive(Debug, Clone, Default)]
pub struct RoleResolver {
    super_admins: SuperAdminDirectory,
}

impl RoleResolver {
    pub fn new(super_admins: SuperAdminDirectory) -> Self {
        Self { super_admins }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(SuperAdminDirectory::from_settings(settings))
    }

    pub fn is_authorized(&self, session: &Session, required: Option<&Role>) -> bool {
        authorize(session, required, &self.super_admins)
    }

    /// Logged in with an email from the super-admin directory
    pub fn is_super_admin(&self, session: &Session) -> bool {
        self.is_authorized(session, Some(&Role::SuperAdmin))
    }

    /// Email-only check used where the original flow looks at the address
    /// before any token exists, e.g. right after registration
    pub fn is_super_admin_email(&self, email: &str) -> bool {
        self.super_admins.contains(email)
    }

    pub fn super_admins(&self) -> &SuperAdminDirectory {
        &self.super_admins
    }
}

//! Route guard
//!
//! A guard starts in [`GuardState::Loading`], reads the session once per route
//! entry and settles on `Authorized` or `Unauthorized`. Settled states are
//! terminal until [`RouteGuard::enter`] is called for the next navigation.

use crate::resolver::RoleResolver;
use crate::role::Role;
use crate::session::Session;
use taxing_core::PortalResult;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Authorized,
    Unauthorized,
}

/// What the caller should do with the guarded view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Show a placeholder until the session is read
    Pending,
    /// Render the protected content
    Render,
    /// Leave silently; `replace` means the current history entry is replaced
    Redirect { to: String, replace: bool },
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    required: Option<Role>,
    redirect_to: String,
    state: GuardState,
}

impl RouteGuard {
    pub fn new(required: Option<Role>) -> Self {
        Self {
            required,
            redirect_to: "/".to_string(),
            state: GuardState::Loading,
        }
    }

    /// Send denied visitors somewhere other than `/`
    pub fn with_redirect(mut self, path: impl Into<String>) -> Self {
        self.redirect_to = path.into();
        self
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn required(&self) -> Option<&Role> {
        self.required.as_ref()
    }

    pub fn redirect_to(&self) -> &str {
        &self.redirect_to
    }

    /// Start a new route entry
    pub fn enter(&mut self) {
        self.state = GuardState::Loading;
    }

    /// Change the required role; a different role forces re-evaluation
    pub fn set_required_role(&mut self, required: Option<Role>) {
        if self.required != required {
            self.required = required;
            self.state = GuardState::Loading;
        }
    }

    /// Read the session and settle. Once settled, further calls return the
    /// current state without reading the session again.
    pub fn evaluate<F>(&mut self, resolver: &RoleResolver, read_session: F) -> GuardState
    where
        F: FnOnce() -> PortalResult<Session>,
    {
        if self.state != GuardState::Loading {
            return self.state;
        }

        self.state = match read_session() {
            Ok(session) => {
                if resolver.is_authorized(&session, self.required.as_ref()) {
                    GuardState::Authorized
                } else {
                    GuardState::Unauthorized
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to read session, denying access");
                GuardState::Unauthorized
            }
        };

        debug!(
            required = ?self.required.as_ref().map(Role::as_str),
            state = ?self.state,
            "Route guard settled"
        );
        self.state
    }

    pub fn outcome(&self) -> GuardOutcome {
        match self.state {
            GuardState::Loading => GuardOutcome::Pending,
            GuardState::Authorized => GuardOutcome::Render,
            GuardState::Unauthorized => GuardOutcome::Redirect {
                to: self.redirect_to.clone(),
                replace: true,
            },
        }
    }
}

/// The portal's guarded pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectedRoute {
    Dashboard,
    FranchiseDashboard,
    SuperDashboard,
}

impl ProtectedRoute {
    pub const ALL: [ProtectedRoute; 3] = [
        ProtectedRoute::Dashboard,
        ProtectedRoute::FranchiseDashboard,
        ProtectedRoute::SuperDashboard,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            ProtectedRoute::Dashboard => "/dashboard",
            ProtectedRoute::FranchiseDashboard => "/franchise-dashboard",
            ProtectedRoute::SuperDashboard => "/super-dashboard",
        }
    }

    pub fn required_role(&self) -> Option<Role> {
        match self {
            ProtectedRoute::Dashboard => None,
            ProtectedRoute::FranchiseDashboard => Some(Role::Franchise),
            ProtectedRoute::SuperDashboard => Some(Role::SuperAdmin),
        }
    }

    /// Path prefixes guarded like this route
    pub fn prefixes(&self) -> &'static [&'static str] {
        match self {
            ProtectedRoute::Dashboard => &["/dashboard", "/export"],
            ProtectedRoute::FranchiseDashboard => &["/franchise-dashboard"],
            ProtectedRoute::SuperDashboard => &["/super-dashboard"],
        }
    }

    /// Match a request path, including nested paths such as `/dashboard/profile`
    pub fn for_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        Self::ALL.into_iter().find(|route| {
            route.prefixes().iter().any(|base| {
                path == *base
                    || path
                        .strip_prefix(base)
                        .is_some_and(|rest| rest.starts_with('/'))
            })
        })
    }

    /// Fresh guard for one entry into this route
    pub fn guard(&self, home: &str) -> RouteGuard {
        RouteGuard::new(self.required_role()).with_redirect(home)
    }
}

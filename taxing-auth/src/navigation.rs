//! Session-dependent navigation
//!
//! Menus and post-authentication destinations are derived from the session
//! and the resolver, the same inputs the route guard uses.

use crate::guard::ProtectedRoute;
use crate::resolver::RoleResolver;
use crate::role::Role;
use crate::session::Session;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub href: &'static str,
}

impl MenuItem {
    const fn new(
        id: &'static str,
        label: &'static str,
        description: &'static str,
        href: &'static str,
    ) -> Self {
        Self {
            id,
            label,
            description,
            href,
        }
    }
}

const BASE_ITEMS: [MenuItem; 3] = [
    MenuItem::new("home", "Home", "Back to homepage", "/"),
    MenuItem::new("services", "Services", "View all services", "/services"),
    MenuItem::new("enquiry", "Place Enquiry", "Get in touch", "/enquiry"),
];

/// Menu entries for the current visitor, base items first
pub fn menu_for(session: &Session, resolver: &RoleResolver) -> Vec<MenuItem> {
    let mut items = BASE_ITEMS.to_vec();

    if session.is_logged_in() {
        if resolver.is_super_admin(session) {
            items.push(MenuItem::new(
                "dashboard",
                "Dashboard",
                "Admin dashboard",
                ProtectedRoute::Dashboard.path(),
            ));
        }
        items.push(MenuItem::new(
            "logout",
            "Logout",
            "Sign out of account",
            "/logout",
        ));
    } else {
        items.push(MenuItem::new("login", "Login", "Sign in to account", "/login"));
        items.push(MenuItem::new(
            "register",
            "Register",
            "Create new account",
            "/register",
        ));
    }

    items
}

/// Where a successful login lands, based on the role the backend returned
pub fn post_login_destination(role: &Role) -> &'static str {
    match role {
        Role::SuperAdmin => ProtectedRoute::SuperDashboard.path(),
        Role::Franchise => ProtectedRoute::FranchiseDashboard.path(),
        _ => "/",
    }
}

/// Where a successful registration lands, based on the registered email
pub fn post_register_destination(email: &str, resolver: &RoleResolver) -> &'static str {
    if resolver.is_super_admin_email(email) {
        ProtectedRoute::Dashboard.path()
    } else {
        "/"
    }
}

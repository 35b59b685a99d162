//! Session data types

use crate::role::Role;
use serde::{Deserialize, Serialize};

/// Keys the session is persisted under
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionKey {
    Token,
    UserEmail,
    UserRole,
}

impl SessionKey {
    pub const ALL: [SessionKey; 3] = [SessionKey::Token, SessionKey::UserEmail, SessionKey::UserRole];

    /// Name used in cookies and session files
    pub fn storage_name(&self) -> &'static str {
        match self {
            SessionKey::Token => "token",
            SessionKey::UserEmail => "userEmail",
            SessionKey::UserRole => "userRole",
        }
    }

    pub fn from_storage_name(name: &str) -> Option<Self> {
        SessionKey::ALL
            .into_iter()
            .find(|key| key.storage_name() == name)
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.storage_name())
    }
}

/// Snapshot of everything the portal knows about the visitor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    #[serde(rename = "userEmail")]
    pub user_email: Option<String>,
    #[serde(rename = "userRole")]
    pub user_role: Option<String>,
}

impl Session {
    pub fn new(
        token: Option<String>,
        user_email: Option<String>,
        user_role: Option<String>,
    ) -> Self {
        Self {
            token,
            user_email,
            user_role,
        }
    }

    /// Bearer token, treating an empty string as absent
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn email(&self) -> Option<&str> {
        self.user_email.as_deref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user_role.as_deref().map(Role::from)
    }

    pub fn value(&self, key: SessionKey) -> Option<&str> {
        match key {
            SessionKey::Token => self.token.as_deref(),
            SessionKey::UserEmail => self.user_email.as_deref(),
            SessionKey::UserRole => self.user_role.as_deref(),
        }
    }
}

/// Credentials handed out by a successful login or registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    pub token: String,
    pub email: String,
    pub role: Role,
}

impl SessionGrant {
    /// A grant without a role is stored as a regular user
    pub fn new(token: impl Into<String>, email: impl Into<String>, role: Option<&str>) -> Self {
        Self {
            token: token.into(),
            email: email.into(),
            role: role
                .filter(|role| !role.is_empty())
                .map(Role::from)
                .unwrap_or(Role::User),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_names_match_browser_keys() {
        assert_eq!(SessionKey::Token.storage_name(), "token");
        assert_eq!(SessionKey::UserEmail.storage_name(), "userEmail");
        assert_eq!(SessionKey::UserRole.storage_name(), "userRole");
        assert_eq!(SessionKey::from_storage_name("userRole"), Some(SessionKey::UserRole));
        assert_eq!(SessionKey::from_storage_name("theme"), None);
    }

    #[test]
    fn empty_token_is_not_logged_in() {
        let session = Session::new(Some(String::new()), Some("a@b.c".into()), None);
        assert!(!session.is_logged_in());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn grant_defaults_missing_role_to_user() {
        assert_eq!(SessionGrant::new("t", "e@x.io", None).role, Role::User);
        assert_eq!(SessionGrant::new("t", "e@x.io", Some("")).role, Role::User);
        assert_eq!(
            SessionGrant::new("t", "e@x.io", Some("franchise")).role,
            Role::Franchise
        );
    }

    #[test]
    fn serializes_with_browser_key_names() {
        let session = Session::new(Some("abc".into()), Some("a@b.c".into()), Some("user".into()));
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["token"], "abc");
        assert_eq!(json["userEmail"], "a@b.c");
        assert_eq!(json["userRole"], "user");
    }
}

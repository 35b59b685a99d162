//! Session store contract and the in-memory implementation

use super::{Session, SessionGrant, SessionKey};
use std::collections::HashMap;
use tracing::debug;

/// Key-value storage for the visitor's session
///
/// Absence of a key yields `None`; none of the operations can fail.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: SessionKey) -> Option<String>;

    fn set(&mut self, key: SessionKey, value: &str);

    fn clear(&mut self, keys: &[SessionKey]);

    /// Read all keys at once
    fn snapshot(&self) -> Session {
        Session {
            token: self.get(SessionKey::Token),
            user_email: self.get(SessionKey::UserEmail),
            user_role: self.get(SessionKey::UserRole),
        }
    }

    /// Populate every key from a login or registration response
    fn establish(&mut self, grant: &SessionGrant) {
        debug!(email = %grant.email, role = %grant.role, "Establishing session");
        self.set(SessionKey::Token, &grant.token);
        self.set(SessionKey::UserEmail, &grant.email);
        self.set(SessionKey::UserRole, grant.role.as_str());
    }

    /// Log out; clearing an already empty session is a no-op
    fn end(&mut self) {
        self.clear(&SessionKey::ALL);
    }
}

/// Process-local session store
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: HashMap<SessionKey, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_session(session: &Session) -> Self {
        let mut store = Self::new();
        for key in SessionKey::ALL {
            if let Some(value) = session.value(key) {
                store.set(key, value);
            }
        }
        store
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &HashMap<SessionKey, String> {
        &self.entries
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: SessionKey) -> Option<String> {
        self.entries.get(&key).cloned()
    }

    fn set(&mut self, key: SessionKey, value: &str) {
        self.entries.insert(key, value.to_string());
    }

    fn clear(&mut self, keys: &[SessionKey]) {
        for key in keys {
            self.entries.remove(key);
        }
    }
}

//! Portal roles
//!
//! The backend issues roles as free-form strings. The four observed values get
//! their own variants; anything else is kept verbatim so comparisons stay
//! exact and case-sensitive.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Regular registered customer
    User,
    /// Staff member allowed to manage user roles
    Admin,
    /// Franchise partner attributing users through a referral code
    Franchise,
    /// Operator of the whole portal
    SuperAdmin,
    /// Any other role string the backend sends
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Franchise => "franchise",
            Role::SuperAdmin => "super_admin",
            Role::Other(role) => role,
        }
    }

    /// Roles a super admin may assign from the dashboards
    pub fn assignable() -> [Role; 3] {
        [Role::User, Role::Franchise, Role::Admin]
    }

    pub fn is_assignable(&self) -> bool {
        matches!(self, Role::User | Role::Franchise | Role::Admin)
    }
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        match role {
            "user" => Role::User,
            "admin" => Role::Admin,
            "franchise" => Role::Franchise,
            "super_admin" => Role::SuperAdmin,
            other => Role::Other(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        Role::from(role.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::from(s))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Request and response types for the JSON API

use serde::{Deserialize, Serialize};
use taxing_auth::MenuItem;
use utoipa::{IntoParams, ToSchema};

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Portal status, always "healthy" when the server answers
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    /// "ok" when the backend health check succeeded, otherwise "unreachable"
    pub backend: String,
}

/// One navigation entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MenuEntry {
    pub id: String,
    pub label: String,
    pub description: String,
    pub href: String,
}

impl From<&MenuItem> for MenuEntry {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.to_string(),
            label: item.label.to_string(),
            description: item.description.to_string(),
            href: item.href.to_string(),
        }
    }
}

/// What the portal knows about the caller; the token itself is never echoed
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub logged_in: bool,
    pub email: Option<String>,
    pub role: Option<String>,
    pub super_admin: bool,
    pub menu: Vec<MenuEntry>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorizeQuery {
    /// Role to check, for example "franchise" or "super_admin"; omit for any signed-in user
    pub required_role: Option<String>,
}

/// Route guard decision for the caller's session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthorizeResponse {
    pub required_role: Option<String>,
    pub authorized: bool,
    /// Where a protected page would send the caller instead
    pub redirect_to: Option<String>,
}

//! HTTP client for the backend
//!
//! Every call maps a non-success status to [`PortalError::Backend`] carrying
//! the status and the parsed `detail`, so call sites can pick their own
//! user-facing message.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_DISPOSITION, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;
use taxing_core::{BackendSettings, ErrorContext, PortalError, PortalResult};
use tracing::{debug, info};
use url::Url;

use crate::types::*;

const DEFAULT_EXPORT_FILENAME: &str = "users_export.csv";

/// Configuration for [`BackendClient`]
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL, e.g. `http://localhost:8001`
    pub base_url: String,
    /// Request timeout; `None` leaves requests unbounded
    pub timeout_seconds: Option<u64>,
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::from(&BackendSettings::default())
    }
}

impl From<&BackendSettings> for BackendConfig {
    fn from(settings: &BackendSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            timeout_seconds: settings.timeout_seconds,
            user_agent: settings.user_agent.clone(),
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }
}

/// Operations the portal performs against the backend
#[async_trait]
pub trait PortalBackend: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> PortalResult<AuthResponse>;

    async fn register(&self, request: &RegisterRequest) -> PortalResult<AuthResponse>;

    /// `GET /users/me`
    async fn current_user(&self, token: &str) -> PortalResult<UserProfile>;

    /// `GET /users`
    async fn list_users(&self, token: &str) -> PortalResult<Vec<UserProfile>>;

    async fn update_user(&self, token: &str, user_id: i64, update: &UserUpdate)
        -> PortalResult<()>;

    /// `GET /admin/users`; the backend scopes the list to the caller
    async fn admin_users(&self, token: &str) -> PortalResult<Vec<UserProfile>>;

    async fn update_role(&self, token: &str, user_id: i64, role: &str) -> PortalResult<()>;

    async fn export_users(&self, token: &str) -> PortalResult<CsvExport>;

    async fn franchises(&self, token: &str) -> PortalResult<Vec<Franchise>>;

    async fn create_franchise(&self, token: &str, request: &FranchiseCreate)
        -> PortalResult<Franchise>;

    async fn delete_franchise(&self, token: &str, franchise_id: i64) -> PortalResult<()>;

    async fn send_contact(&self, request: &ContactRequest) -> PortalResult<ContactRecord>;

    async fn submit_enquiry(&self, request: &EnquiryRequest) -> PortalResult<EnquiryRecord>;

    async fn subscribe_newsletter(&self, email: &str) -> PortalResult<NewsletterRecord>;

    async fn health(&self) -> PortalResult<HealthStatus>;
}

/// reqwest-backed implementation of [`PortalBackend`]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> PortalResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| PortalError::Config {
            message: format!("Invalid backend URL '{}': {}", config.base_url, e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("backend_client")
                .with_operation("create_client")
                .with_suggestion("Set backend.base_url to an http(s) URL"),
        })?;
        let client = create_http_client(&config)?;

        info!("Created backend client for {}", base_url);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> PortalResult<Url> {
        let url = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&url).map_err(|e| PortalError::Internal {
            message: format!("Failed to build backend URL for '{}': {}", path, e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("backend_client").with_operation("endpoint"),
        })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> PortalResult<reqwest::Response> {
        let response = request.send().await.map_err(|e| PortalError::Network {
            message: format!("Failed to reach backend: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("backend_client")
                .with_operation(operation)
                .with_suggestion("Check that the backend is running and backend.base_url is correct"),
        })?;

        debug!(operation, status = response.status().as_u16(), "Backend responded");

        if !response.status().is_success() {
            return Err(handle_response_error(response, operation).await);
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> PortalResult<T> {
        let response = self.send(request, operation).await?;
        response.json::<T>().await.map_err(|e| PortalError::Network {
            message: format!("Unexpected backend response: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("backend_client").with_operation(operation),
        })
    }

    fn get(&self, path: &str) -> PortalResult<reqwest::RequestBuilder> {
        Ok(self.client.get(self.endpoint(path)?))
    }

    fn post(&self, path: &str) -> PortalResult<reqwest::RequestBuilder> {
        Ok(self.client.post(self.endpoint(path)?))
    }

    fn put(&self, path: &str) -> PortalResult<reqwest::RequestBuilder> {
        Ok(self.client.put(self.endpoint(path)?))
    }
}

#[async_trait]
impl PortalBackend for BackendClient {
    async fn login(&self, request: &LoginRequest) -> PortalResult<AuthResponse> {
        self.send_json(self.post("/auth/login")?.json(request), "login")
            .await
    }

    async fn register(&self, request: &RegisterRequest) -> PortalResult<AuthResponse> {
        self.send_json(self.post("/auth/register")?.json(request), "register")
            .await
    }

    async fn current_user(&self, token: &str) -> PortalResult<UserProfile> {
        self.send_json(self.get("/users/me")?.bearer_auth(token), "current_user")
            .await
    }

    async fn list_users(&self, token: &str) -> PortalResult<Vec<UserProfile>> {
        self.send_json(self.get("/users")?.bearer_auth(token), "list_users")
            .await
    }

    async fn update_user(
        &self,
        token: &str,
        user_id: i64,
        update: &UserUpdate,
    ) -> PortalResult<()> {
        let request = self
            .put(&format!("/users/{}", user_id))?
            .bearer_auth(token)
            .json(update);
        self.send(request, "update_user").await?;
        Ok(())
    }

    async fn admin_users(&self, token: &str) -> PortalResult<Vec<UserProfile>> {
        self.send_json(self.get("/admin/users")?.bearer_auth(token), "admin_users")
            .await
    }

    async fn update_role(&self, token: &str, user_id: i64, role: &str) -> PortalResult<()> {
        let request = self
            .put(&format!("/admin/users/{}/role", user_id))?
            .bearer_auth(token)
            .json(&RoleUpdate {
                role: role.to_string(),
            });
        self.send(request, "update_role").await?;
        Ok(())
    }

    async fn export_users(&self, token: &str) -> PortalResult<CsvExport> {
        let response = self
            .send(
                self.get("/admin/export/users")?.bearer_auth(token),
                "export_users",
            )
            .await?;

        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(attachment_filename)
            .unwrap_or_else(|| DEFAULT_EXPORT_FILENAME.to_string());

        let content = response.bytes().await.map_err(|e| PortalError::Network {
            message: format!("Failed to read export: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("backend_client").with_operation("export_users"),
        })?;

        Ok(CsvExport {
            filename,
            content: content.to_vec(),
        })
    }

    async fn franchises(&self, token: &str) -> PortalResult<Vec<Franchise>> {
        self.send_json(self.get("/admin/franchises")?.bearer_auth(token), "franchises")
            .await
    }

    async fn create_franchise(
        &self,
        token: &str,
        request: &FranchiseCreate,
    ) -> PortalResult<Franchise> {
        let builder = self
            .post("/admin/franchises")?
            .bearer_auth(token)
            .json(request);
        self.send_json(builder, "create_franchise").await
    }

    async fn delete_franchise(&self, token: &str, franchise_id: i64) -> PortalResult<()> {
        let request = self
            .client
            .delete(self.endpoint(&format!("/admin/franchises/{}", franchise_id))?)
            .bearer_auth(token);
        self.send(request, "delete_franchise").await?;
        Ok(())
    }

    async fn send_contact(&self, request: &ContactRequest) -> PortalResult<ContactRecord> {
        self.send_json(self.post("/contact")?.json(request), "send_contact")
            .await
    }

    async fn submit_enquiry(&self, request: &EnquiryRequest) -> PortalResult<EnquiryRecord> {
        self.send_json(self.post("/enquiries")?.json(request), "submit_enquiry")
            .await
    }

    async fn subscribe_newsletter(&self, email: &str) -> PortalResult<NewsletterRecord> {
        let body = NewsletterSubscribe {
            email: email.to_string(),
        };
        self.send_json(
            self.post("/newsletter/subscribe")?.json(&body),
            "subscribe_newsletter",
        )
        .await
    }

    async fn health(&self) -> PortalResult<HealthStatus> {
        self.send_json(self.get("/health")?, "health").await
    }
}

/// Build the shared reqwest client
pub(crate) fn create_http_client(config: &BackendConfig) -> PortalResult<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent).map_err(|e| PortalError::Config {
            message: format!("Invalid user agent: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("http_client").with_operation("create_client"),
        })?,
    );

    let mut builder = reqwest::Client::builder().default_headers(headers);
    if let Some(seconds) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(seconds));
    }

    builder.build().map_err(|e| PortalError::Internal {
        message: format!("Failed to create HTTP client: {}", e),
        source: Some(Box::new(e)),
        context: ErrorContext::new("http_client").with_operation("create_client"),
    })
}

/// Turn a non-success response into a backend error with its `detail`
pub(crate) async fn handle_response_error(
    response: reqwest::Response,
    operation: &str,
) -> PortalError {
    let status = response.status();
    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();

    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.detail)
        .map(|detail| detail.message());

    PortalError::Backend {
        status: status.as_u16(),
        message: format!(
            "HTTP {} from {}: {}",
            status.as_u16(),
            url.path(),
            detail
                .as_deref()
                .or_else(|| status.canonical_reason())
                .unwrap_or("Unknown error")
        ),
        detail,
        context: ErrorContext::new("backend_client")
            .with_operation(operation)
            .with_suggestion(match status.as_u16() {
                401 => "Log in again; the session token may have expired",
                403 => "The signed-in account lacks permission for this action",
                404 => "The requested record does not exist",
                422 => "Check the submitted fields",
                _ => "Check backend logs and connectivity",
            }),
    }
}

/// `attachment; filename=users.csv` → `users.csv`
fn attachment_filename(header: &str) -> Option<String> {
    header.split(';').find_map(|part| {
        part.trim()
            .strip_prefix("filename=")
            .map(|name| name.trim_matches('"').to_string())
            .filter(|name| !name.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attachment_filename() {
        assert_eq!(
            attachment_filename("attachment; filename=users_2024.csv").as_deref(),
            Some("users_2024.csv")
        );
        assert_eq!(
            attachment_filename("attachment; filename=\"quoted.csv\"").as_deref(),
            Some("quoted.csv")
        );
        assert_eq!(attachment_filename("inline"), None);
    }

    #[test]
    fn config_follows_settings() {
        let settings = BackendSettings {
            base_url: "https://api.taxing.example".to_string(),
            timeout_seconds: Some(5),
            ..Default::default()
        };
        let config = BackendConfig::from(&settings);
        assert_eq!(config.base_url, "https://api.taxing.example");
        assert_eq!(config.timeout_seconds, Some(5));
        assert_eq!(BackendConfig::default().timeout_seconds, None);
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(BackendClient::new(BackendConfig::new("not a url")).is_err());
    }

    #[test]
    fn endpoints_join_without_double_slashes() {
        let client = BackendClient::new(BackendConfig::new("http://localhost:8001/")).unwrap();
        assert_eq!(
            client.endpoint("/users/me").unwrap().as_str(),
            "http://localhost:8001/users/me"
        );
    }
}

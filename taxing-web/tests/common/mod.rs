//! Shared test infrastructure for the portal's router tests
//!
//! Provides an in-memory backend and a thin wrapper that drives the router
//! with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use std::sync::{Arc, Mutex, Once};
use taxing_backend::{
    AuthResponse, ContactRecord, ContactRequest, CsvExport, EnquiryRecord, EnquiryRequest,
    Franchise, FranchiseCreate, HealthStatus, LoginRequest, NewsletterRecord, PortalBackend,
    RegisterRequest, UserProfile, UserUpdate,
};
use taxing_core::{PortalConfig, PortalError, PortalResult};
use taxing_web::{create_app, AppState};
use tower::ServiceExt;

static INIT: Once = Once::new();

/// Initialize logging for tests
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("taxing=debug,info")
            .with_test_writer()
            .try_init();
    });
}

pub const SUPER_ADMIN: &str = "paras@gmail.com";
pub const GOOD_PASSWORD: &str = "correct-horse";

pub fn user(id: i64, email: &str, role: &str, referral_code: Option<&str>) -> UserProfile {
    UserProfile {
        id,
        first_name: format!("User{}", id),
        last_name: Some("Tester".to_string()),
        email: email.to_string(),
        company: None,
        phone: None,
        role: role.to_string(),
        franchise_code: None,
        referral_code: referral_code.map(str::to_string),
        created_at: Some("2024-05-01T10:00:00".to_string()),
    }
}

/// In-memory stand-in for the REST backend
///
/// Tokens are `token-<user id>`; every call is recorded by name.
pub struct StubBackend {
    pub users: Mutex<Vec<UserProfile>>,
    pub franchises: Mutex<Vec<Franchise>>,
    pub calls: Mutex<Vec<String>>,
    pub fail_newsletter: bool,
}

impl StubBackend {
    pub fn new() -> Self {
        let mut franchise_owner = user(2, "north@x.io", "franchise", None);
        franchise_owner.franchise_code = Some("TXN1".to_string());

        Self {
            users: Mutex::new(vec![
                user(1, SUPER_ADMIN, "user", None),
                franchise_owner,
                user(3, "client@x.io", "user", Some("TXN1")),
                user(4, "admin@x.io", "admin", None),
                user(5, "other@x.io", "user", Some("TXS9")),
            ]),
            franchises: Mutex::new(vec![Franchise {
                id: 10,
                user_id: 2,
                franchise_name: "North Branch".to_string(),
                referral_code: "TXN1".to_string(),
                first_name: Some("User2".to_string()),
                last_name: Some("Tester".to_string()),
                email: Some("north@x.io".to_string()),
                created_at: None,
            }]),
            calls: Mutex::new(Vec::new()),
            fail_newsletter: false,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn find_by_token(&self, token: &str) -> PortalResult<UserProfile> {
        let id = token
            .strip_prefix("token-")
            .and_then(|id| id.parse::<i64>().ok());
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|user| Some(user.id) == id)
            .cloned()
            .ok_or_else(|| PortalError::backend(401, Some("Could not validate credentials".into()), "stub"))
    }
}

#[async_trait]
impl PortalBackend for StubBackend {
    async fn login(&self, request: &LoginRequest) -> PortalResult<AuthResponse> {
        self.record("login");
        if request.password != GOOD_PASSWORD {
            return Err(PortalError::backend(401, Some("Incorrect email or password".into()), "stub"));
        }
        let users = self.users.lock().unwrap();
        let user = users
            .iter()
            .find(|user| user.email == request.email)
            .ok_or_else(|| PortalError::backend(404, None, "stub"))?;
        Ok(AuthResponse {
            access_token: format!("token-{}", user.id),
            email: user.email.clone(),
            role: Some(user.role.clone()),
            user_id: Some(user.id),
            franchise_code: user.franchise_code.clone(),
            referral_code: user.referral_code.clone(),
            message: None,
            token_type: Some("bearer".into()),
        })
    }

    async fn register(&self, request: &RegisterRequest) -> PortalResult<AuthResponse> {
        self.record("register");
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|user| user.email == request.email) {
            return Err(PortalError::backend(409, Some("Email already registered".into()), "stub"));
        }
        let id = users.len() as i64 + 1;
        let mut created = user(id, &request.email, "user", request.referral_code.as_deref());
        created.first_name = request.first_name.clone();
        users.push(created);
        Ok(AuthResponse {
            access_token: format!("token-{}", id),
            email: request.email.clone(),
            role: None,
            user_id: Some(id),
            franchise_code: None,
            referral_code: request.referral_code.clone(),
            message: Some("User registered successfully".into()),
            token_type: Some("bearer".into()),
        })
    }

    async fn current_user(&self, token: &str) -> PortalResult<UserProfile> {
        self.record("current_user");
        self.find_by_token(token)
    }

    async fn list_users(&self, token: &str) -> PortalResult<Vec<UserProfile>> {
        self.record("list_users");
        self.find_by_token(token)?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn update_user(&self, token: &str, user_id: i64, update: &UserUpdate) -> PortalResult<()> {
        self.record("update_user");
        let caller = self.find_by_token(token)?;
        if caller.id != user_id {
            return Err(PortalError::backend(403, Some("Not allowed".into()), "stub"));
        }
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|user| user.id == user_id) {
            if let Some(first_name) = &update.first_name {
                user.first_name = first_name.clone();
            }
            user.last_name = update.last_name.clone();
        }
        Ok(())
    }

    async fn admin_users(&self, token: &str) -> PortalResult<Vec<UserProfile>> {
        self.record("admin_users");
        self.find_by_token(token)?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn update_role(&self, token: &str, user_id: i64, role: &str) -> PortalResult<()> {
        self.record("update_role");
        let caller = self.find_by_token(token)?;
        if caller.role != "admin" && caller.email != SUPER_ADMIN {
            return Err(PortalError::backend(403, Some("Admin access required".into()), "stub"));
        }
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|user| user.id == user_id) {
            user.role = role.to_string();
        }
        Ok(())
    }

    async fn export_users(&self, token: &str) -> PortalResult<CsvExport> {
        self.record("export_users");
        self.find_by_token(token)?;
        Ok(CsvExport {
            filename: "users_export.csv".into(),
            content: b"id,email\n1,paras@gmail.com\n".to_vec(),
        })
    }

    async fn franchises(&self, token: &str) -> PortalResult<Vec<Franchise>> {
        self.record("franchises");
        self.find_by_token(token)?;
        Ok(self.franchises.lock().unwrap().clone())
    }

    async fn create_franchise(&self, token: &str, request: &FranchiseCreate) -> PortalResult<Franchise> {
        self.record("create_franchise");
        self.find_by_token(token)?;
        let owner = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.email == request.email)
            .cloned()
            .ok_or_else(|| PortalError::backend(404, Some("User not found".into()), "stub"))?;
        let mut franchises = self.franchises.lock().unwrap();
        let franchise = Franchise {
            id: 10 + franchises.len() as i64,
            user_id: owner.id,
            franchise_name: request
                .franchise_name
                .clone()
                .unwrap_or_else(|| format!("{} Franchise", owner.first_name)),
            referral_code: format!("TX{}", owner.id),
            first_name: Some(owner.first_name.clone()),
            last_name: owner.last_name.clone(),
            email: Some(owner.email.clone()),
            created_at: None,
        };
        franchises.push(franchise.clone());
        Ok(franchise)
    }

    async fn delete_franchise(&self, token: &str, franchise_id: i64) -> PortalResult<()> {
        self.record("delete_franchise");
        self.find_by_token(token)?;
        self.franchises
            .lock()
            .unwrap()
            .retain(|franchise| franchise.id != franchise_id);
        Ok(())
    }

    async fn send_contact(&self, request: &ContactRequest) -> PortalResult<ContactRecord> {
        self.record("send_contact");
        Ok(ContactRecord {
            id: 1,
            name: request.name.clone(),
            email: request.email.clone(),
            message: request.message.clone(),
            created_at: None,
        })
    }

    async fn submit_enquiry(&self, request: &EnquiryRequest) -> PortalResult<EnquiryRecord> {
        self.record("submit_enquiry");
        Ok(EnquiryRecord {
            id: 1,
            first_name: request.first_name.clone(),
            email: request.email.clone(),
            message: request.message.clone(),
            created_at: None,
        })
    }

    async fn subscribe_newsletter(&self, email: &str) -> PortalResult<NewsletterRecord> {
        self.record("subscribe_newsletter");
        if self.fail_newsletter {
            return Err(PortalError::backend(500, None, "stub"));
        }
        Ok(NewsletterRecord {
            id: 1,
            email: email.to_string(),
            status: "active".into(),
            created_at: None,
        })
    }

    async fn health(&self) -> PortalResult<HealthStatus> {
        self.record("health");
        Ok(HealthStatus {
            status: "healthy".into(),
            time: None,
        })
    }
}

/// Response parts a test cares about
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    /// All `Set-Cookie` header values
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{}=", name);
        self.set_cookies()
            .into_iter()
            .find(|cookie| cookie.starts_with(&prefix))
    }

    /// Decoded value of a cookie set by the response
    pub fn cookie_value(&self, name: &str) -> Option<String> {
        let cookie = self.cookie(name)?;
        let value = cookie.split(';').next()?.split_once('=')?.1;
        urlencoding::decode(value).ok().map(|value| value.into_owned())
    }
}

/// Router plus the backend it talks to
pub struct TestApp {
    pub router: Router,
    pub backend: Arc<StubBackend>,
}

impl TestApp {
    pub fn spawn() -> Self {
        Self::with_backend(StubBackend::new())
    }

    pub fn with_backend(backend: StubBackend) -> Self {
        init_logging();
        let backend = Arc::new(backend);
        let state = AppState::with_backend(PortalConfig::default(), backend.clone());
        Self {
            router: create_app(state),
            backend,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, form: &str, cookie: Option<&str>) -> TestResponse {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::from(form.to_string())).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// Cookie header for a signed-in visitor
pub fn session_cookie(token: &str, email: &str, role: &str) -> String {
    format!(
        "token={}; userEmail={}; userRole={}",
        token,
        urlencoding::encode(email),
        role
    )
}

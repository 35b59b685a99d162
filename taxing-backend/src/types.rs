//! Request and response bodies exchanged with the backend

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub referral_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub password: String,
    pub referral_code: Option<String>,
}

/// Body returned by both `/auth/login` and `/auth/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub franchise_code: Option<String>,
    #[serde(default)]
    pub referral_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: String,
    #[serde(default)]
    pub franchise_code: Option<String>,
    #[serde(default)]
    pub referral_code: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name,
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    /// Users whose referral code is exactly `code`
    pub fn referred_by<'a>(users: &'a [UserProfile], code: &str) -> Vec<&'a UserProfile> {
        users
            .iter()
            .filter(|user| user.referral_code.as_deref() == Some(code))
            .collect()
    }
}

/// Profile edit; the dashboards send every field back
#[derive(Debug, Clone, Serialize)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
}

impl UserUpdate {
    /// Rename `user`, keeping the rest of the profile unchanged
    pub fn rename(user: &UserProfile, first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            email: Some(user.email.clone()),
            company: user.company.clone(),
            phone: user.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleUpdate {
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Franchise {
    pub id: i64,
    pub user_id: i64,
    pub franchise_name: String,
    pub referral_code: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FranchiseCreate {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub franchise_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Enquiry form; the backend expects camelCase field names here
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryRequest {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub service_type: Option<String>,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub message: String,
    pub how_did_you_hear: Option<String>,
    pub franchise_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryRecord {
    pub id: i64,
    pub first_name: String,
    pub email: String,
    pub message: String,
    #[serde(default, rename = "created_at")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsletterSubscribe {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsletterRecord {
    pub id: i64,
    pub email: String,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub time: Option<String>,
}

/// CSV export as returned by `/admin/export/users`
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Error body: `{"detail": "..."}` or `{"detail": [{"msg": "..."}]}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Text(String),
    Validation(Vec<ValidationIssue>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidationIssue {
    pub msg: String,
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
}

impl ErrorDetail {
    /// Single line for display; validation messages are joined with ", "
    pub fn message(&self) -> String {
        match self {
            ErrorDetail::Text(text) => text.clone(),
            ErrorDetail::Validation(issues) => issues
                .iter()
                .map(|issue| issue.msg.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

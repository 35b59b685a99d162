//! Template system for server-side rendering
//!
//! Every page extends `base.html`, which needs a [`Chrome`] for the title,
//! the navigation menu and an optional flash message.

use crate::content::{Choice, Faq, Service, Testimonial};
use askama::Template;
use axum::response::Html;
use taxing_auth::{MenuItem, Role};
use taxing_backend::{Franchise, UserProfile};

/// Status line shown above the page content
#[derive(Debug, Clone)]
pub struct Flash {
    pub kind: &'static str,
    pub text: String,
}

/// Layout data shared by all pages
#[derive(Debug, Clone)]
pub struct Chrome {
    pub title: String,
    pub menu: Vec<MenuItem>,
    pub show_header: bool,
    pub flash: Option<Flash>,
}

impl Chrome {
    pub fn new(title: &str, menu: Vec<MenuItem>) -> Self {
        Self {
            title: title.to_string(),
            menu,
            show_header: false,
            flash: None,
        }
    }

    /// Chrome without navigation, for error pages
    pub fn bare(title: &str) -> Self {
        Self::new(title, Vec::new())
    }

    /// The site header is only shown on the home page
    pub fn with_header(mut self) -> Self {
        self.show_header = true;
        self
    }

    pub fn with_success(mut self, text: impl Into<String>) -> Self {
        self.flash = Some(Flash {
            kind: "success",
            text: text.into(),
        });
        self
    }

    pub fn with_error(mut self, text: impl Into<String>) -> Self {
        self.flash = Some(Flash {
            kind: "error",
            text: text.into(),
        });
        self
    }

    /// Apply an outcome message; `None` leaves the chrome untouched
    pub fn with_outcome(self, outcome: Option<Result<String, String>>) -> Self {
        match outcome {
            Some(Ok(text)) => self.with_success(text),
            Some(Err(text)) => self.with_error(text),
            None => self,
        }
    }
}

/// One `<option>` of a `<select>`
#[derive(Debug, Clone)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl OptionView {
    pub fn from_choices(choices: &[Choice], current: &str) -> Vec<Self> {
        choices
            .iter()
            .map(|(value, label)| OptionView {
                value: value.to_string(),
                label: label.to_string(),
                selected: *value == current,
            })
            .collect()
    }

    /// Roles an administrator may assign, with the user's role preselected
    pub fn roles(current: &str) -> Vec<Self> {
        Role::assignable()
            .iter()
            .map(|role| {
                let value = role.as_str().to_string();
                let mut label = value.clone();
                if let Some(first) = label.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                OptionView {
                    selected: value == current,
                    value,
                    label,
                }
            })
            .collect()
    }
}

/// Signed-in user's own profile card
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub company: String,
    pub phone: String,
    pub referral_code: String,
    pub franchise_code: String,
}

impl From<&UserProfile> for ProfileView {
    fn from(user: &UserProfile) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone().unwrap_or_default(),
            full_name: user.full_name(),
            email: user.email.clone(),
            role: user.role.clone(),
            company: user.company.clone().unwrap_or_default(),
            phone: user.phone.clone().unwrap_or_default(),
            referral_code: user.referral_code.clone().unwrap_or_default(),
            franchise_code: user.franchise_code.clone().unwrap_or_default(),
        }
    }
}

/// Row of a user table
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub role: String,
    pub referral_code: String,
    pub joined: String,
    pub role_options: Vec<OptionView>,
}

impl From<&UserProfile> for UserRow {
    fn from(user: &UserProfile) -> Self {
        Self {
            id: user.id,
            name: user.full_name(),
            email: user.email.clone(),
            company: user.company.clone().unwrap_or_default(),
            phone: user.phone.clone().unwrap_or_default(),
            role: user.role.clone(),
            referral_code: user.referral_code.clone().unwrap_or_default(),
            joined: short_date(user.created_at.as_deref()),
            role_options: OptionView::roles(&user.role),
        }
    }
}

/// Row of the franchise table
#[derive(Debug, Clone)]
pub struct FranchiseRow {
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub email: String,
    pub referral_code: String,
    pub created: String,
    pub selected: bool,
}

impl FranchiseRow {
    pub fn new(franchise: &Franchise, selected_code: Option<&str>) -> Self {
        let owner = [franchise.first_name.as_deref(), franchise.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            id: franchise.id,
            name: franchise.franchise_name.clone(),
            owner,
            email: franchise.email.clone().unwrap_or_default(),
            referral_code: franchise.referral_code.clone(),
            created: short_date(franchise.created_at.as_deref()),
            selected: selected_code == Some(franchise.referral_code.as_str()),
        }
    }
}

/// Date part of an ISO timestamp
fn short_date(timestamp: Option<&str>) -> String {
    timestamp
        .map(|ts| ts.split('T').next().unwrap_or(ts).to_string())
        .unwrap_or_default()
}

/// Home page template
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: Chrome,
    pub services: &'static [Service],
    pub faqs: &'static [Faq],
    pub testimonials: &'static [Testimonial],
    pub newsletter_email: String,
}

/// Service catalogue template
#[derive(Template)]
#[template(path = "services.html")]
pub struct ServicesTemplate {
    pub chrome: Chrome,
    pub services: &'static [Service],
}

/// Contact form template
#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub chrome: Chrome,
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Values typed into the enquiry form
#[derive(Debug, Clone, Default)]
pub struct EnquiryView {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub job_title: String,
    pub message: String,
    pub franchise_code: String,
}

/// Enquiry form template
#[derive(Template)]
#[template(path = "enquiry.html")]
pub struct EnquiryTemplate {
    pub chrome: Chrome,
    pub form: EnquiryView,
    pub submitted: bool,
    pub services: Vec<OptionView>,
    pub budgets: Vec<OptionView>,
    pub timelines: Vec<OptionView>,
    pub sources: Vec<OptionView>,
}

/// Login page template
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub chrome: Chrome,
    pub email: String,
    pub referral_code: String,
}

/// Registration page template
#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub chrome: Chrome,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub referral_code: String,
    pub subscribe_newsletter: bool,
}

/// Success page that forwards the browser after a short delay
#[derive(Template)]
#[template(path = "redirect.html")]
pub struct RedirectTemplate {
    pub chrome: Chrome,
    pub message: String,
    pub destination: String,
    pub delay_ms: u64,
    pub delay_seconds: u64,
}

/// User dashboard template
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub chrome: Chrome,
    pub profile: Option<ProfileView>,
    pub users: Vec<UserRow>,
    pub users_title: String,
    pub role_editor: bool,
    pub can_export: bool,
}

/// Franchise dashboard template
#[derive(Template)]
#[template(path = "franchise_dashboard.html")]
pub struct FranchiseDashboardTemplate {
    pub chrome: Chrome,
    pub profile: Option<ProfileView>,
    pub franchise_name: String,
    pub users: Vec<UserRow>,
}

/// Super administrator dashboard template
#[derive(Template)]
#[template(path = "super_dashboard.html")]
pub struct SuperDashboardTemplate {
    pub chrome: Chrome,
    pub profile: Option<ProfileView>,
    pub franchises: Vec<FranchiseRow>,
    pub users: Vec<UserRow>,
    pub user_options: Vec<OptionView>,
    pub selected: Option<FranchiseRow>,
    pub franchise_users: Vec<UserRow>,
}

/// Error page template
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub chrome: Chrome,
    pub error_code: u16,
    pub error_message: String,
}

impl ErrorTemplate {
    pub fn new(error_code: u16, error_message: &str) -> Self {
        Self {
            chrome: Chrome::bare("Error"),
            error_code,
            error_message: error_message.to_string(),
        }
    }

    pub fn render_html(&self) -> Result<Html<String>, askama::Error> {
        Ok(Html(self.render()?))
    }
}

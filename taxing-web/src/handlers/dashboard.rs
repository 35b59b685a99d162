//! Role-gated dashboards
//!
//! These handlers sit behind [`crate::guard::guarded`], which puts the
//! authorized [`Session`] into the request extensions. Every mutation
//! re-renders the page it came from with an outcome message.

use crate::{
    render,
    templates::{
        DashboardTemplate, FranchiseDashboardTemplate, FranchiseRow, OptionView, ProfileView,
        SuperDashboardTemplate, UserRow,
    },
    AppState, WebResult,
};
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use taxing_auth::{ProtectedRoute, Role, Session};
use taxing_backend::{messages, FranchiseCreate, UserProfile, UserUpdate};
use tracing::{info, warn};

type Outcome = Option<Result<String, String>>;

fn to_home(state: &AppState) -> WebResult<Response> {
    Ok(Redirect::to(state.home()).into_response())
}

fn rows<'a>(users: impl IntoIterator<Item = &'a UserProfile>) -> Vec<UserRow> {
    users.into_iter().map(UserRow::from).collect()
}

async fn load_current_user(state: &AppState, token: &str) -> Option<UserProfile> {
    match state.backend.current_user(token).await {
        Ok(user) => Some(user),
        Err(e) => {
            warn!(error = %e, "Failed to load current user");
            None
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoleForm {
    pub role: String,
}

/// Save the signed-in user's name
async fn save_profile(state: &AppState, token: &str, form: &ProfileForm) -> Result<String, String> {
    let user = state
        .backend
        .current_user(token)
        .await
        .map_err(|e| messages::profile_save_failure(&e))?;

    let update = UserUpdate::rename(&user, form.first_name.trim(), form.last_name.trim());
    match state.backend.update_user(token, user.id, &update).await {
        Ok(_) => {
            info!(user_id = user.id, "Profile updated");
            Ok(messages::PROFILE_SAVED.to_string())
        }
        Err(e) => {
            warn!(user_id = user.id, error = %e, "Profile update failed");
            Err(messages::profile_save_failure(&e))
        }
    }
}

async fn change_role(state: &AppState, token: &str, user_id: i64, role: &str) -> Result<String, String> {
    match state.backend.update_role(token, user_id, role).await {
        Ok(()) => {
            info!(user_id, role, "Role updated");
            Ok(messages::ROLE_UPDATED.to_string())
        }
        Err(e) => {
            warn!(user_id, role, error = %e, "Role update failed");
            Err(messages::role_update_failure(&e))
        }
    }
}

/// User dashboard; super administrators are handed off to their own page
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> WebResult<Response> {
    if session
        .email()
        .is_some_and(|email| state.resolver.is_super_admin_email(email))
    {
        return Ok(Redirect::to(ProtectedRoute::SuperDashboard.path()).into_response());
    }
    render_dashboard(&state, &session, None).await
}

async fn render_dashboard(state: &AppState, session: &Session, outcome: Outcome) -> WebResult<Response> {
    let Some(token) = session.token() else {
        return to_home(state);
    };

    let stored_role = session.role();
    let mut outcome = outcome;
    let mut users = Vec::new();
    let mut users_title = String::new();
    let mut role_editor = false;

    let profile = load_current_user(state, token).await;
    if let Some(user) = &profile {
        let franchise_code = user.franchise_code.as_deref().filter(|code| !code.is_empty());
        let scope = match franchise_code {
            Some(code) if user.role == Role::Franchise.as_str() => Some(Some(code)),
            _ if stored_role == Some(Role::Admin) => Some(None),
            _ => None,
        };

        if let Some(code) = scope {
            match state.backend.admin_users(token).await {
                Ok(all) => match code {
                    Some(code) => {
                        users = rows(UserProfile::referred_by(&all, code));
                        users_title = "Referred Users".to_string();
                    }
                    None => {
                        users = rows(&all);
                        users_title = "All Users".to_string();
                        role_editor = true;
                    }
                },
                Err(e) => {
                    warn!(error = %e, "Failed to load users");
                    outcome.get_or_insert(Err(messages::USERS_UNAVAILABLE.to_string()));
                }
            }
        }
    }

    let page = render(&DashboardTemplate {
        chrome: state.chrome("Dashboard", session).with_outcome(outcome),
        profile: profile.as_ref().map(ProfileView::from),
        users,
        users_title,
        role_editor,
        can_export: matches!(stored_role, Some(Role::Admin | Role::Franchise)),
    })?;
    Ok(page.into_response())
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(form): Form<ProfileForm>,
) -> WebResult<Response> {
    let Some(token) = session.token() else {
        return to_home(&state);
    };
    let outcome = save_profile(&state, token, &form).await;
    render_dashboard(&state, &session, Some(outcome)).await
}

pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(user_id): Path<i64>,
    Form(form): Form<RoleForm>,
) -> WebResult<Response> {
    let Some(token) = session.token() else {
        return to_home(&state);
    };
    let outcome = change_role(&state, token, user_id, &form.role).await;
    render_dashboard(&state, &session, Some(outcome)).await
}

/// Proxy the backend CSV export as a download
pub async fn export_users(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> WebResult<Response> {
    let Some(token) = session.token() else {
        return to_home(&state);
    };

    let export = state.backend.export_users(token).await?;
    info!(filename = %export.filename, bytes = export.content.len(), "User export downloaded");

    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.content,
    )
        .into_response())
}

pub async fn franchise_dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> WebResult<Response> {
    render_franchise_dashboard(&state, &session, None).await
}

async fn render_franchise_dashboard(
    state: &AppState,
    session: &Session,
    outcome: Outcome,
) -> WebResult<Response> {
    let Some(token) = session.token() else {
        return to_home(state);
    };

    let mut outcome = outcome;
    let mut franchise_name = "Franchise Dashboard".to_string();
    let mut users = Vec::new();

    let profile = load_current_user(state, token).await;
    if let Some(user) = &profile {
        franchise_name = user.full_name();

        if let Some(code) = user.franchise_code.as_deref().filter(|code| !code.is_empty()) {
            match state.backend.franchises(token).await {
                Ok(franchises) => {
                    if let Some(own) = franchises.iter().find(|f| f.referral_code == code) {
                        franchise_name = own.franchise_name.clone();
                    }
                }
                Err(e) => warn!(error = %e, "Failed to load franchise details"),
            }

            match state.backend.admin_users(token).await {
                Ok(all) => users = rows(UserProfile::referred_by(&all, code)),
                Err(e) => {
                    warn!(error = %e, "Failed to load franchise users");
                    outcome.get_or_insert(Err(messages::USERS_UNAVAILABLE.to_string()));
                }
            }
        }
    }

    let page = render(&FranchiseDashboardTemplate {
        chrome: state.chrome("Franchise Dashboard", session).with_outcome(outcome),
        profile: profile.as_ref().map(ProfileView::from),
        franchise_name,
        users,
    })?;
    Ok(page.into_response())
}

pub async fn update_franchise_profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(form): Form<ProfileForm>,
) -> WebResult<Response> {
    let Some(token) = session.token() else {
        return to_home(&state);
    };
    let outcome = save_profile(&state, token, &form).await;
    render_franchise_dashboard(&state, &session, Some(outcome)).await
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SuperDashboardQuery {
    pub franchise: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FranchiseForm {
    pub email: String,
    pub selected_user_email: String,
    pub franchise_name: String,
}

impl FranchiseForm {
    /// A selected user wins over a typed email
    pub fn owner_email(&self) -> Option<&str> {
        [self.selected_user_email.trim(), self.email.trim()]
            .into_iter()
            .find(|email| !email.is_empty())
    }
}

pub async fn super_dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<SuperDashboardQuery>,
) -> WebResult<Response> {
    render_super_dashboard(&state, &session, query.franchise.as_deref(), None).await
}

async fn render_super_dashboard(
    state: &AppState,
    session: &Session,
    selected_code: Option<&str>,
    outcome: Outcome,
) -> WebResult<Response> {
    let Some(token) = session.token() else {
        return to_home(state);
    };
    let selected_code = selected_code.filter(|code| !code.is_empty());

    let profile = match state.backend.list_users(token).await {
        Ok(users) => users
            .iter()
            .find(|user| Some(user.email.as_str()) == session.email())
            .map(ProfileView::from),
        Err(e) => {
            warn!(error = %e, "Failed to load user list");
            None
        }
    };

    let franchises = state.backend.franchises(token).await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load franchises");
        Vec::new()
    });
    let all_users = state.backend.admin_users(token).await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load users");
        Vec::new()
    });

    let franchise_rows: Vec<FranchiseRow> = franchises
        .iter()
        .map(|franchise| FranchiseRow::new(franchise, selected_code))
        .collect();
    let selected = franchise_rows.iter().find(|row| row.selected).cloned();
    let franchise_users = match &selected {
        Some(row) => rows(UserProfile::referred_by(&all_users, &row.referral_code)),
        None => Vec::new(),
    };
    let user_options = all_users
        .iter()
        .map(|user| OptionView {
            value: user.email.clone(),
            label: format!("{} ({})", user.full_name(), user.email),
            selected: false,
        })
        .collect();

    let page = render(&SuperDashboardTemplate {
        chrome: state.chrome("Super Admin Dashboard", session).with_outcome(outcome),
        profile,
        franchises: franchise_rows,
        users: rows(&all_users),
        user_options,
        selected,
        franchise_users,
    })?;
    Ok(page.into_response())
}

pub async fn create_franchise(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(form): Form<FranchiseForm>,
) -> WebResult<Response> {
    let Some(token) = session.token() else {
        return to_home(&state);
    };

    let outcome = match form.owner_email() {
        None => Err(messages::FRANCHISE_EMAIL_REQUIRED.to_string()),
        Some(email) => {
            let request = FranchiseCreate {
                email: email.to_string(),
                franchise_name: Some(form.franchise_name.trim())
                    .filter(|name| !name.is_empty())
                    .map(str::to_string),
            };
            match state.backend.create_franchise(token, &request).await {
                Ok(franchise) => {
                    info!(
                        franchise_id = franchise.id,
                        referral_code = %franchise.referral_code,
                        "Franchise created"
                    );
                    Ok(messages::FRANCHISE_CREATED.to_string())
                }
                Err(e) => {
                    warn!(email, error = %e, "Franchise creation failed");
                    Err(messages::franchise_create_failure(&e))
                }
            }
        }
    };

    render_super_dashboard(&state, &session, None, Some(outcome)).await
}

/// Failures are only logged; the list is reloaded either way
pub async fn delete_franchise(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(franchise_id): Path<i64>,
) -> WebResult<Response> {
    let Some(token) = session.token() else {
        return to_home(&state);
    };

    match state.backend.delete_franchise(token, franchise_id).await {
        Ok(()) => info!(franchise_id, "Franchise deleted"),
        Err(e) => warn!(franchise_id, error = %e, "Franchise deletion failed"),
    }
    Ok(Redirect::to(ProtectedRoute::SuperDashboard.path()).into_response())
}

pub async fn super_update_user_role(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(user_id): Path<i64>,
    Form(form): Form<RoleForm>,
) -> WebResult<Response> {
    let Some(token) = session.token() else {
        return to_home(&state);
    };
    let outcome = change_role(&state, token, user_id, &form.role).await;
    render_super_dashboard(&state, &session, None, Some(outcome)).await
}

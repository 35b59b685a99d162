//! JSON API handlers

use super::types::{
    AuthorizeQuery, AuthorizeResponse, HealthResponse, MenuEntry, SessionResponse,
};
use crate::{openapi::ApiDoc, session::read_session, session::PortalSession, AppState};
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Json,
};
use taxing_auth::{menu_for, GuardOutcome, Role, RouteGuard};
use tracing::debug;
use utoipa::OpenApi;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    summary = "Health check",
    description = "Check the portal and its backend",
    responses(
        (status = 200, description = "Portal is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend = match state.backend.health().await {
        Ok(_) => "ok",
        Err(e) => {
            debug!(error = %e, "Backend health check failed");
            "unreachable"
        }
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: backend.to_string(),
    })
}

/// Current session
#[utoipa::path(
    get,
    path = "/api/session",
    tag = "Session",
    summary = "Current session",
    description = "Session state and navigation menu derived from the session cookies",
    responses(
        (status = 200, description = "Session view", body = SessionResponse)
    )
)]
pub async fn current_session(
    State(state): State<AppState>,
    PortalSession(session): PortalSession,
) -> Json<SessionResponse> {
    let menu = menu_for(&session, &state.resolver);
    Json(SessionResponse {
        logged_in: session.is_logged_in(),
        email: session.user_email.clone(),
        role: session.user_role.clone(),
        super_admin: state.resolver.is_super_admin(&session),
        menu: menu.iter().map(MenuEntry::from).collect(),
    })
}

/// Route guard decision
#[utoipa::path(
    get,
    path = "/api/authorize",
    tag = "Session",
    summary = "Check authorization",
    description = "Evaluate the route guard for the caller and an optional required role",
    params(AuthorizeQuery),
    responses(
        (status = 200, description = "Guard decision", body = AuthorizeResponse)
    )
)]
pub async fn authorize_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AuthorizeQuery>,
) -> Json<AuthorizeResponse> {
    let required_role = query.required_role.filter(|role| !role.is_empty());

    let mut guard = RouteGuard::new(required_role.as_deref().map(Role::from))
        .with_redirect(state.home());
    guard.evaluate(&state.resolver, || read_session(&headers));

    let (authorized, redirect_to) = match guard.outcome() {
        GuardOutcome::Render => (true, None),
        GuardOutcome::Redirect { to, .. } => (false, Some(to)),
        GuardOutcome::Pending => (false, Some(state.home().to_string())),
    };

    Json(AuthorizeResponse {
        required_role,
        authorized,
        redirect_to,
    })
}

/// OpenAPI document for the JSON API
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

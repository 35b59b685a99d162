//! Route definitions for the portal
//!
//! Public pages, guarded dashboards and the JSON API are separate routers so
//! the guard layer only wraps the dashboards.

use crate::{guard::guarded, handlers, AppState};
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use taxing_auth::ProtectedRoute;
use tower_http::cors::{Any, CorsLayer};

/// Marketing pages, forms and sign-in flows
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::home))
        .route("/services", get(handlers::services))
        .route("/contact", get(handlers::contact_page).post(handlers::contact))
        .route("/enquiry", get(handlers::enquiry_page).post(handlers::enquiry))
        .route("/newsletter", post(handlers::newsletter))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/register", get(handlers::register_page).post(handlers::register))
        .route("/logout", get(handlers::logout).post(handlers::logout))
}

/// Dashboards behind the route guard, one guard per protected route
pub fn protected_routes(state: AppState) -> Router<AppState> {
    let signed_in = Router::new()
        .route("/dashboard", get(handlers::dashboard))
        .route("/dashboard/profile", post(handlers::update_profile))
        .route("/dashboard/users/{id}/role", post(handlers::update_user_role))
        .route("/export/users", get(handlers::export_users));

    let franchise = Router::new()
        .route("/franchise-dashboard", get(handlers::franchise_dashboard))
        .route(
            "/franchise-dashboard/profile",
            post(handlers::update_franchise_profile),
        );

    let super_admin = Router::new()
        .route("/super-dashboard", get(handlers::super_dashboard))
        .route("/super-dashboard/franchises", post(handlers::create_franchise))
        .route(
            "/super-dashboard/franchises/{id}/delete",
            post(handlers::delete_franchise),
        )
        .route(
            "/super-dashboard/users/{id}/role",
            post(handlers::super_update_user_role),
        );

    Router::new()
        .merge(guarded(signed_in, &state, ProtectedRoute::Dashboard))
        .merge(guarded(franchise, &state, ProtectedRoute::FranchiseDashboard))
        .merge(guarded(super_admin, &state, ProtectedRoute::SuperDashboard))
}

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/session", get(handlers::current_session))
        .route("/authorize", get(handlers::authorize_session))
        .route("/openapi.json", get(handlers::openapi_json))
        .layer(cors)
}

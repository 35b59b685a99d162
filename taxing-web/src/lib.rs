//! Taxing Solutions Web Portal
//!
//! Server-rendered marketing site and role-gated dashboards. Browser storage
//! is replaced by three cookies (`token`, `userEmail`, `userRole`) and the
//! client-side route guard becomes a route layer.

pub mod content;
pub mod guard;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;
pub mod templates;

// Re-export main types
pub use server::{PortalServer, PortalServerBuilder};
pub use state::AppState;

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{Html, IntoResponse, Response},
    Router,
};
use taxing_core::PortalError;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::page_routes())
        .merge(routes::protected_routes(state.clone()))
        .nest("/api", routes::api_routes())
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error(transparent)]
    Portal(#[from] PortalError),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

impl WebError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::Portal(PortalError::Backend { .. } | PortalError::Network { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            WebError::Portal(PortalError::Validation { .. }) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match &self {
            WebError::Portal(e) => e.log(),
            other => error!(error = %other, "Request failed"),
        }

        let status = self.status_code();
        let message = match status {
            StatusCode::BAD_GATEWAY => "The service is temporarily unavailable. Please try again.",
            StatusCode::BAD_REQUEST => "The request could not be processed.",
            _ => "Something went wrong. Please try again.",
        };

        match templates::ErrorTemplate::new(status.as_u16(), message).render_html() {
            Ok(page) => (status, page).into_response(),
            Err(_) => (status, [(CONTENT_TYPE, "text/plain")], message).into_response(),
        }
    }
}

/// Render any askama template into an HTML response body
pub(crate) fn render<T: askama::Template>(template: &T) -> WebResult<Html<String>> {
    Ok(Html(template.render()?))
}

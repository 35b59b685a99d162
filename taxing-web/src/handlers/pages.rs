//! Public marketing pages

use crate::{
    content::{CORE_SERVICES, FAQS, SERVICE_CATALOG, TESTIMONIALS},
    render,
    session::PortalSession,
    templates::{Chrome, ErrorTemplate, HomeTemplate, ServicesTemplate},
    AppState, WebResult,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use taxing_auth::Session;

/// Home page with the site header
pub async fn home(
    State(state): State<AppState>,
    PortalSession(session): PortalSession,
) -> WebResult<Html<String>> {
    render_home(&state, &session, None, String::new())
}

/// Shared by the newsletter form, which re-renders the home page
pub(crate) fn render_home(
    state: &AppState,
    session: &Session,
    outcome: Option<Result<String, String>>,
    newsletter_email: String,
) -> WebResult<Html<String>> {
    render(&HomeTemplate {
        chrome: home_chrome(state, session).with_outcome(outcome),
        services: &CORE_SERVICES,
        faqs: &FAQS,
        testimonials: &TESTIMONIALS,
        newsletter_email,
    })
}

fn home_chrome(state: &AppState, session: &Session) -> Chrome {
    state.chrome("Home", session).with_header()
}

pub async fn services(
    State(state): State<AppState>,
    PortalSession(session): PortalSession,
) -> WebResult<Html<String>> {
    render(&ServicesTemplate {
        chrome: state.chrome("Services", &session),
        services: &SERVICE_CATALOG,
    })
}

/// Fallback for unknown paths
pub async fn not_found() -> Response {
    match ErrorTemplate::new(404, "The page you are looking for does not exist.").render_html() {
        Ok(page) => (StatusCode::NOT_FOUND, page).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

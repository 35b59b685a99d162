//! Login, registration and logout
//!
//! Successful sign-ins write the session cookies and show a short
//! confirmation page that forwards to the role's landing page.

use crate::{
    render,
    session::{CookieSessionStore, PortalSession},
    templates::{LoginTemplate, RedirectTemplate, RegisterTemplate},
    AppState, WebResult,
};
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use taxing_auth::{
    post_login_destination, post_register_destination, RegistrationForm, Session, SessionGrant,
    SessionStore,
};
use taxing_backend::{messages, LoginRequest, RegisterRequest};
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub referral_code: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub referral_code: String,
    pub password: String,
    pub confirm_password: String,
    // Checkboxes are only submitted when ticked
    pub accept_terms: Option<String>,
    pub subscribe_newsletter: Option<String>,
}

impl From<RegisterForm> for RegistrationForm {
    fn from(form: RegisterForm) -> Self {
        RegistrationForm {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            company: form.company,
            phone: form.phone,
            referral_code: form.referral_code,
            password: form.password,
            confirm_password: form.confirm_password,
            accept_terms: form.accept_terms.is_some(),
            subscribe_newsletter: form.subscribe_newsletter.is_some(),
        }
    }
}

pub async fn login_page(
    State(state): State<AppState>,
    PortalSession(session): PortalSession,
) -> WebResult<Html<String>> {
    render(&LoginTemplate {
        chrome: state.chrome("Login", &session),
        email: String::new(),
        referral_code: String::new(),
    })
}

pub async fn login(
    State(state): State<AppState>,
    PortalSession(session): PortalSession,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> WebResult<Response> {
    let referral_code = Some(form.referral_code.trim())
        .filter(|code| !code.is_empty())
        .map(str::to_string);
    let request = LoginRequest {
        email: form.email.clone(),
        password: form.password,
        referral_code,
    };

    match state.backend.login(&request).await {
        Ok(response) => {
            let grant = SessionGrant::new(response.access_token, &form.email, response.role.as_deref());
            info!(email = %grant.email, role = %grant.role, "Login succeeded");

            let mut store = CookieSessionStore::new(jar);
            store.establish(&grant);
            let destination = post_login_destination(&grant.role);
            signed_in(&state, store, messages::LOGIN_SUCCESS, destination)
        }
        Err(e) => {
            warn!(email = %form.email, error = %e, "Login failed");
            let page = render(&LoginTemplate {
                chrome: state
                    .chrome("Login", &session)
                    .with_error(messages::login_failure(&e)),
                email: form.email,
                referral_code: form.referral_code,
            })?;
            Ok(page.into_response())
        }
    }
}

pub async fn register_page(
    State(state): State<AppState>,
    PortalSession(session): PortalSession,
) -> WebResult<Html<String>> {
    render(&register_template(&state, &session, &RegistrationForm::default(), None))
}

pub async fn register(
    State(state): State<AppState>,
    PortalSession(session): PortalSession,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> WebResult<Response> {
    let form = RegistrationForm::from(form);
    if let Err(problem) = form.validate() {
        let page = render(&register_template(&state, &session, &form, Some(problem.message())))?;
        return Ok(page.into_response());
    }

    let request = RegisterRequest {
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        email: form.email.clone(),
        company: form.company.clone(),
        phone: form.phone.clone(),
        password: form.password.clone(),
        referral_code: form.referral(),
    };

    match state.backend.register(&request).await {
        Ok(response) => {
            let grant = SessionGrant::new(response.access_token, response.email, response.role.as_deref());
            info!(email = %grant.email, "Registration succeeded");

            if form.subscribe_newsletter {
                if let Err(e) = state.backend.subscribe_newsletter(&form.email).await {
                    warn!(email = %form.email, error = %e, "Newsletter opt-in failed");
                }
            }

            let mut store = CookieSessionStore::new(jar);
            store.establish(&grant);
            let destination = post_register_destination(&grant.email, &state.resolver);
            signed_in(&state, store, messages::REGISTER_SUCCESS, destination)
        }
        Err(e) => {
            warn!(email = %form.email, error = %e, "Registration failed");
            let message = messages::register_failure(&e);
            let page = render(&register_template(&state, &session, &form, Some(&message)))?;
            Ok(page.into_response())
        }
    }
}

fn register_template(
    state: &AppState,
    session: &Session,
    form: &RegistrationForm,
    error: Option<&str>,
) -> RegisterTemplate {
    let mut chrome = state.chrome("Register", session);
    if let Some(error) = error {
        chrome = chrome.with_error(error);
    }
    RegisterTemplate {
        chrome,
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        email: form.email.clone(),
        company: form.company.clone(),
        phone: form.phone.clone(),
        referral_code: form.referral_code.clone(),
        subscribe_newsletter: form.subscribe_newsletter,
    }
}

/// Confirmation page sent together with the new session cookies
fn signed_in(
    state: &AppState,
    store: CookieSessionStore,
    message: &str,
    destination: &str,
) -> WebResult<Response> {
    let session = store.snapshot();
    let page = render(&RedirectTemplate {
        chrome: state.chrome("Welcome", &session),
        message: message.to_string(),
        destination: destination.to_string(),
        delay_ms: state.redirect_delay_ms(),
        delay_seconds: state.redirect_delay_seconds(),
    })?;
    Ok((store.into_jar(), page).into_response())
}

/// Clears every session key; safe to repeat
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let mut store = CookieSessionStore::new(jar);
    store.end();
    info!("Session ended");
    (store.into_jar(), Redirect::to(state.home())).into_response()
}

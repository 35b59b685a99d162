//! Cookie-backed session store
//!
//! Each session key is one cookie. Writes go through the axum-extra jar,
//! which percent-encodes values. Reads for authorization parse the raw
//! `Cookie` headers so that a value which fails to decode is reported
//! instead of silently dropped.

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::collections::HashMap;
use std::convert::Infallible;
use taxing_auth::{Session, SessionKey, SessionStore};
use taxing_core::{session_error, PortalResult};
use tracing::warn;

/// [`SessionStore`] over the request's cookie jar
///
/// Writes accumulate in the jar; return [`CookieSessionStore::into_jar`] from
/// the handler to send them.
#[derive(Debug, Clone, Default)]
pub struct CookieSessionStore {
    jar: CookieJar,
}

impl CookieSessionStore {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

fn session_cookie(key: SessionKey, value: &str) -> Cookie<'static> {
    Cookie::build((key.storage_name(), value.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

impl SessionStore for CookieSessionStore {
    fn get(&self, key: SessionKey) -> Option<String> {
        self.jar
            .get(key.storage_name())
            .map(|cookie| cookie.value().to_string())
    }

    fn set(&mut self, key: SessionKey, value: &str) {
        let jar = std::mem::take(&mut self.jar);
        self.jar = jar.add(session_cookie(key, value));
    }

    fn clear(&mut self, keys: &[SessionKey]) {
        for key in keys {
            let jar = std::mem::take(&mut self.jar);
            self.jar = jar.remove(Cookie::build(key.storage_name()).path("/"));
        }
    }
}

/// Read the session from the request's `Cookie` headers
///
/// Fails when a header is not text or a session value does not
/// percent-decode to UTF-8. Unrelated cookies are ignored.
pub fn read_session(headers: &HeaderMap) -> PortalResult<Session> {
    let mut values: HashMap<SessionKey, String> = HashMap::new();

    for header in headers.get_all(COOKIE) {
        let header = header.to_str().map_err(|e| {
            session_error!("Cookie header is not valid text", "cookie_session", e)
        })?;

        for pair in header.split(';') {
            let Some((name, value)) = pair.trim().split_once('=') else {
                continue;
            };
            let Some(key) = SessionKey::from_storage_name(name.trim()) else {
                continue;
            };
            let value = urlencoding::decode(value.trim()).map_err(|e| {
                session_error!(
                    format!("Cookie '{}' is not valid UTF-8", key),
                    "cookie_session",
                    e
                )
            })?;
            values.insert(key, value.into_owned());
        }
    }

    Ok(Session::new(
        values.remove(&SessionKey::Token),
        values.remove(&SessionKey::UserEmail),
        values.remove(&SessionKey::UserRole),
    ))
}

/// Session for pages that only adapt to the visitor, such as the menu
///
/// Unreadable cookies are treated as an anonymous visitor.
#[derive(Debug, Clone)]
pub struct PortalSession(pub Session);

impl<S> FromRequestParts<S> for PortalSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = read_session(&parts.headers).unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring unreadable session cookies");
            Session::default()
        });
        Ok(PortalSession(session))
    }
}

//! Route guard middleware
//!
//! Every request to a protected page is one route entry: a fresh
//! [`RouteGuard`] reads the cookies, and either the handler runs with the
//! session in its extensions or the visitor is sent home with `303 See Other`.
//!
//! The protected route is fixed when the layer is attached, so every path
//! behind a layer is checked against that route's role.

use crate::{session::read_session, AppState};
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    Router,
};
use taxing_auth::{GuardOutcome, ProtectedRoute, Session};
use tracing::debug;

/// Put every route of `router` behind the guard for `route`
pub fn guarded(
    router: Router<AppState>,
    state: &AppState,
    route: ProtectedRoute,
) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state((state.clone(), route), protect))
}

pub async fn protect(
    State((state, route)): State<(AppState, ProtectedRoute)>,
    mut req: Request,
    next: Next,
) -> Response {
    let mut guard = route.guard(state.home());
    let mut current: Option<Session> = None;
    guard.evaluate(&state.resolver, || {
        let session = read_session(req.headers())?;
        current = Some(session.clone());
        Ok(session)
    });

    match (guard.outcome(), current) {
        (GuardOutcome::Render, Some(session)) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        (GuardOutcome::Redirect { to, .. }, _) => {
            debug!(
                path = %req.uri().path(),
                route = route.path(),
                to = %to,
                "Protected route denied"
            );
            Redirect::to(&to).into_response()
        }
        _ => Redirect::to(state.home()).into_response(),
    }
}

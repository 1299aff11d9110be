use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    error::AppError,
    handlers::auth::{create_secure_cookie, SESSION_COOKIE},
    models::session::CurrentSession,
    services::guard::{self, Access, Decision},
    state::AppState,
};

/// Extracts the session token from the request cookies.
///
/// # Arguments
///
/// * `cookies` - The request cookies.
///
/// # Returns
///
/// An `Option` containing the session ID if found.
fn extract_session_token(cookies: &Cookies) -> Option<Uuid> {
    cookies
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// A middleware that attaches the caller's session to the request.
///
/// Creates a session context (and its cookie) when none exists, then inserts a
/// [`CurrentSession`] snapshot into the request extensions.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
pub async fn load_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let (session, created) = state
        .sessions
        .resolve(extract_session_token(&cookies))
        .await;

    if created {
        cookies.add(create_secure_cookie(
            SESSION_COOKIE,
            session.id.to_string(),
            state.config.session_duration_days,
            state.config.production,
        ));
        tracing::debug!("🍪 Session cookie issued: {}", session.id);
    }

    request.extensions_mut().insert(session);
    next.run(request).await
}

/// Runs the route guard for `required` against the request's session.
async fn gate(required: Access, session: CurrentSession, request: Request<Body>, next: Next) -> Response {
    match guard::evaluate(required, session.identity.as_ref()) {
        Decision::Render => next.run(request).await,
        Decision::Redirect(target) => {
            tracing::debug!(
                "🔒 {:?} view {} denied for session {}",
                required,
                request.uri().path(),
                session.id
            );
            AppError::Unauthorized { redirect_to: target }.into_response()
        }
    }
}

/// A middleware that requires a signed-in identity.
pub async fn require_user(
    Extension(session): Extension<CurrentSession>,
    request: Request<Body>,
    next: Next,
) -> Response {
    gate(Access::User, session, request, next).await
}

/// A middleware that requires a signed-in administrator.
pub async fn require_admin(
    Extension(session): Extension<CurrentSession>,
    request: Request<Body>,
    next: Next,
) -> Response {
    gate(Access::Admin, session, request, next).await
}

/// A middleware marking a page navigation: any login attempt still pending
/// for this session belongs to a dismissed view and is cancelled.
pub async fn track_navigation(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    request: Request<Body>,
    next: Next,
) -> Response {
    state.sessions.dismiss_pending(session.id).await;
    next.run(request).await
}

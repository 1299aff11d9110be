use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    http::Method,
    Extension,
};
use tower_cookies::Cookies;

use crate::{
    crypto::csrf::tokens_match,
    error::AppError,
    handlers::auth::CSRF_COOKIE,
    models::session::CurrentSession,
    state::AppState,
};

/// A middleware that verifies the CSRF token.
///
/// The `csrf_token` cookie, the `x-csrf-token` header and the token stored in
/// the session context must all agree.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `session` - The caller's session.
/// * `cookies` - The request cookies.
/// * `req` - The incoming request.
/// * `next` - The next middleware in the chain.
pub async fn verify_csrf(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    cookies: Cookies,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.method() == Method::GET
        || req.method() == Method::HEAD
        || req.method() == Method::OPTIONS
    {
        tracing::debug!("✅ CSRF exemption: {} request", req.method());
        return next.run(req).await;
    }

    let csrf_token_cookie = match cookies.get(CSRF_COOKIE) {
        Some(c) => c.value().to_string(),
        None => {
            tracing::warn!("❌ CSRF: csrf_token cookie missing");
            return AppError::Authentication("Missing CSRF token cookie".to_string())
                .into_response();
        }
    };

    let csrf_token_header = match req.headers().get("x-csrf-token") {
        Some(token) => match token.to_str() {
            Ok(t) => t.to_string(),
            Err(_) => {
                tracing::warn!("❌ CSRF: malformed header");
                return AppError::Authentication("Invalid CSRF token format".to_string())
                    .into_response();
            }
        },
        None => {
            tracing::warn!("❌ CSRF: x-csrf-token header missing");
            return AppError::Authentication("Missing CSRF token header".to_string())
                .into_response();
        }
    };

    if !tokens_match(&csrf_token_header, &csrf_token_cookie) {
        tracing::warn!("❌ CSRF: cookie and header disagree");
        return AppError::Authentication("CSRF token mismatch".to_string()).into_response();
    }

    match state.sessions.csrf_token(session.id).await {
        Some(expected) if tokens_match(&csrf_token_cookie, &expected) => {
            tracing::debug!("✅ CSRF token valid");
            next.run(req).await
        }
        _ => {
            tracing::warn!("❌ CSRF: token not issued for session {}", session.id);
            AppError::Authentication("CSRF token expired or invalid".to_string()).into_response()
        }
    }
}

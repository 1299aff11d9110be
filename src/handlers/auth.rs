use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    Extension,
};
use serde::Serialize;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::time::Duration;

use crate::{
    crypto::csrf::generate_csrf_token,
    error::Result,
    handlers::respond::{self, JsonBody},
    models::{
        identity::{Identity, Role},
        notification::Notification,
        session::CurrentSession,
    },
    services::auth as auth_service,
    state::AppState,
    validation::auth::{LoginRequest, RegisterRequest},
};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session_id";
/// Name of the CSRF cookie, readable by scripts.
pub const CSRF_COOKIE: &str = "csrf_token";

/// The response payload for authentication-related requests.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub identity: Option<Identity>,
    /// The view the client should navigate to next.
    pub redirect_to: &'static str,
    pub toast: Notification,
}

/// Creates a secure cookie with the given name, value, and max age.
pub fn create_secure_cookie(
    name: &'static str,
    value: String,
    max_age_days: i64,
    production: bool,
) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);

    if name != CSRF_COOKIE {
        cookie.set_http_only(true);
    }

    if production {
        cookie.set_secure(true);
    }

    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::seconds(max_age_days * 86400));
    cookie.set_path("/");

    cookie
}

/// The view an identity lands on after signing in.
fn landing_view(identity: &Identity) -> &'static str {
    match identity.role {
        Role::Admin => "/admin",
        Role::User => "/dashboard",
    }
}

/// Signs `identity` into the session if the attempt is still live, then
/// issues the rotated session cookie and a fresh CSRF cookie. Both live as
/// long as the session.
async fn finish_attempt(
    state: &AppState,
    cookies: &Cookies,
    session: &CurrentSession,
    attempt_id: u64,
    identity: Identity,
) -> Result<Identity> {
    let csrf_token = generate_csrf_token();
    tracing::debug!("🔐 Generated CSRF token: {}...", &csrf_token[..8]);

    let session_id = state
        .sessions
        .complete_attempt(session.id, attempt_id, identity.clone(), csrf_token.clone())
        .await?;

    cookies.add(create_secure_cookie(
        SESSION_COOKIE,
        session_id.to_string(),
        state.config.session_duration_days,
        state.config.production,
    ));
    cookies.add(create_secure_cookie(
        CSRF_COOKIE,
        csrf_token,
        state.config.session_duration_days,
        state.config.production,
    ));
    tracing::info!("✅ Session {} signed in as {}", session_id, identity.id);

    Ok(identity)
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    cookies: Cookies,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Response> {
    tracing::info!("🔐 Login attempt for session {}", session.id);
    let credentials = payload.into_credentials()?;

    let attempt = state.sessions.begin_attempt(session.id).await;
    let authenticator = state.authenticator.clone();
    let outcome = auth_service::run_attempt(
        state.config.auth_delay,
        attempt.token.clone(),
        move || authenticator.authenticate(&credentials),
    )
    .await;

    let identity = match outcome {
        Ok(identity) => identity,
        Err(e) => {
            state.sessions.abandon_attempt(session.id, attempt.id).await;
            return Err(e);
        }
    };

    let identity = finish_attempt(&state, &cookies, &session, attempt.id, identity).await?;
    let description = match identity.role {
        Role::Admin => "Successfully logged in as admin.",
        Role::User => "Successfully logged in.",
    };

    respond::json(
        StatusCode::OK,
        &AuthResponse {
            success: true,
            message: "Login successful".to_string(),
            redirect_to: landing_view(&identity),
            identity: Some(identity),
            toast: Notification::success("Welcome back!", description),
        },
    )
}

/// Handles user registration.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    cookies: Cookies,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<Response> {
    tracing::info!("📝 Register attempt for session {}", session.id);
    let registration = payload.into_registration()?;
    tracing::info!("✅ Validations passed for: {}", registration.email);

    let attempt = state.sessions.begin_attempt(session.id).await;
    let authenticator = state.authenticator.clone();
    let outcome = auth_service::run_attempt(
        state.config.auth_delay,
        attempt.token.clone(),
        move || authenticator.register(&registration),
    )
    .await;

    let identity = match outcome {
        Ok(identity) => identity,
        Err(e) => {
            state.sessions.abandon_attempt(session.id, attempt.id).await;
            return Err(e);
        }
    };

    let identity =
        match finish_attempt(&state, &cookies, &session, attempt.id, identity.clone()).await {
            Ok(identity) => identity,
            Err(e) => {
                // Cancelled after the account was created: undo it.
                state.authenticator.revoke(identity.id)?;
                return Err(e);
            }
        };

    respond::json(
        StatusCode::CREATED,
        &AuthResponse {
            success: true,
            message: "Registration successful. Welcome!".to_string(),
            redirect_to: landing_view(&identity),
            identity: Some(identity),
            toast: Notification::success(
                "Welcome to Blixora Labs!",
                "Your account has been created successfully.",
            ),
        },
    )
}

/// Handles user logout. Idempotent.
#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    cookies: Cookies,
) -> Result<Response> {
    tracing::info!("👋 Logout for session: {}", session.id);

    state.sessions.logout(session.id).await;

    let mut csrf_cookie = Cookie::new(CSRF_COOKIE, "");
    csrf_cookie.set_max_age(Duration::seconds(0));
    csrf_cookie.set_path("/");
    cookies.remove(csrf_cookie);

    respond::json(
        StatusCode::OK,
        &AuthResponse {
            success: true,
            message: "Logout successful".to_string(),
            identity: None,
            redirect_to: "/",
            toast: Notification::success("Signed out", "See you soon."),
        },
    )
}

/// The response payload of `/api/auth/me`.
#[derive(Serialize)]
pub struct MeResponse {
    pub authenticated: bool,
    pub identity: Option<Identity>,
}

/// Returns the identity signed in on this session, if any.
#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Result<Response> {
    let identity = state.sessions.current_identity(session.id).await;

    respond::json(
        StatusCode::OK,
        &MeResponse {
            authenticated: identity.is_some(),
            identity,
        },
    )
}

use axum::{
    Router,
    routing::{get, post, put},
    middleware::{from_fn, from_fn_with_state},
};

use http::{HeaderName, HeaderValue, Method, header};
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    services::ServeDir,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
    cors::CorsLayer,
};
use tracing::Level;

pub mod config;
pub mod error;
pub mod state;
pub mod crypto {
    pub mod csrf;
}

pub mod models {
    pub mod enrollment;
    pub mod identity;
    pub mod notification;
    pub mod session;
    pub mod simulation;
}

pub mod repositories {
    pub mod catalog;
    pub mod enrollment;
    pub mod session;
}

pub mod services {
    pub mod auth;
    pub mod catalog;
    pub mod guard;
}

pub mod handlers {
    pub mod admin;
    pub mod auth;
    pub mod enrollments;
    pub mod pages;
    pub mod respond;
}

pub mod middleware_layer {
    pub mod auth;
    pub mod csrf;
}

pub mod validation {
    pub mod auth;
    pub mod simulation;
}

use state::AppState;

/// Builds the CORS layer for the configured origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::COOKIE,
            HeaderName::from_static("x-csrf-token"),
        ])
        .allow_credentials(true)
        .expose_headers([header::LOCATION])
        .max_age(Duration::from_secs(86400))
}

/// Builds the application router.
///
/// Page views answer with JSON view models; gated views redirect to
/// `/login` when the route guard denies them.
pub fn router(state: AppState) -> Router {
    let public_pages = Router::new()
        .route("/", get(handlers::pages::landing))
        .route("/simulations", get(handlers::pages::simulations))
        .route("/login", get(handlers::pages::login_form))
        .route("/register", get(handlers::pages::register_form))
        .with_state(state.clone());

    let user_pages = Router::new()
        .route("/dashboard", get(handlers::pages::dashboard))
        .route_layer(from_fn(middleware_layer::auth::require_user))
        .with_state(state.clone());

    let admin_pages = Router::new()
        .route("/admin", get(handlers::pages::admin))
        .route_layer(from_fn(middleware_layer::auth::require_admin))
        .with_state(state.clone());

    let pages = Router::new()
        .merge(public_pages)
        .merge(user_pages)
        .merge(admin_pages)
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::track_navigation,
        ));

    let auth_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
        .with_state(state.clone());

    let enrollment_routes = Router::new()
        .route("/api/enrollments", post(handlers::enrollments::enroll))
        .route(
            "/api/enrollments/{enrollment_id}/progress",
            put(handlers::enrollments::update_progress),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::csrf::verify_csrf,
        ))
        .route_layer(from_fn(middleware_layer::auth::require_user))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route(
            "/api/admin/simulations",
            post(handlers::admin::create_simulation),
        )
        .route(
            "/api/admin/simulations/{simulation_id}",
            put(handlers::admin::update_simulation)
                .delete(handlers::admin::delete_simulation),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::csrf::verify_csrf,
        ))
        .route_layer(from_fn(middleware_layer::auth::require_admin))
        .with_state(state.clone());

    Router::new()
        .merge(pages)
        .merge(auth_routes)
        .merge(enrollment_routes)
        .merge(admin_routes)
        .fallback_service(ServeDir::new(&state.config.public_dir))
        .layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::load_session,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors_layer(&state.config.cors_origins))
}

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::models::notification::Notification;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Input rejected at the boundary (form fields, query parameters).
    #[error("Validation error: {0}")]
    Validation(String),

    /// An authentication error.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A route guard denial. Surfaces as a silent redirect.
    #[error("Authorization failed")]
    Unauthorized {
        /// Where the client is sent instead.
        redirect_to: &'static str,
    },

    /// A resource not found error.
    #[error("Resource not found")]
    NotFound,

    /// The email address is already bound to an identity.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A login or registration attempt was superseded or dismissed.
    #[error("Login attempt was cancelled")]
    Cancelled,

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    toast: Notification,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::Authentication(ref msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                (StatusCode::UNAUTHORIZED, msg.clone())
            }

            AppError::Unauthorized { redirect_to } => {
                tracing::debug!("Route guard redirect to {}", redirect_to);
                return Redirect::to(redirect_to).into_response();
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }

            AppError::Conflict(ref msg) => {
                tracing::debug!("Conflict: {}", msg);
                (StatusCode::CONFLICT, msg.clone())
            }

            AppError::Cancelled => {
                tracing::info!("Pending login attempt cancelled");
                (StatusCode::CONFLICT, "Login attempt was cancelled".to_string())
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = sonic_rs::to_string(&ErrorBody {
            toast: Notification::error(message.clone()),
            error: message,
        })
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (
            status,
            [(http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

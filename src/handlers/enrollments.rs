use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Extension,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    handlers::respond::{self, JsonBody},
    models::{
        enrollment::EnrollmentRecord,
        identity::Identity,
        notification::Notification,
        session::CurrentSession,
    },
    services::guard::LOGIN_PATH,
    state::AppState,
};

/// The request payload for enrolling in a simulation.
#[derive(Deserialize)]
pub struct EnrollRequest {
    pub simulation_id: Uuid,
}

/// The request payload for reporting progress.
#[derive(Deserialize)]
pub struct ProgressRequest {
    pub progress: i64,
}

#[derive(Serialize)]
struct EnrollmentResponse {
    enrollment: EnrollmentRecord,
    toast: Notification,
}

fn signed_in(session: &CurrentSession) -> Result<&Identity> {
    session
        .identity
        .as_ref()
        .ok_or(AppError::Unauthorized { redirect_to: LOGIN_PATH })
}

/// Enrolls the signed-in learner in a simulation.
#[axum::debug_handler]
pub async fn enroll(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    JsonBody(payload): JsonBody<EnrollRequest>,
) -> Result<Response> {
    let identity = signed_in(&session)?;

    let simulation = state
        .catalog
        .find(payload.simulation_id)
        .await
        .ok_or(AppError::NotFound)?;

    let (enrollment, created) = state.enrollments.enroll(identity.id, simulation.id).await;

    if !created {
        return respond::json(
            StatusCode::OK,
            &EnrollmentResponse {
                enrollment,
                toast: Notification::success("Already enrolled", simulation.title),
            },
        );
    }

    if let Err(e) = state.catalog.record_enrollment(simulation.id).await {
        // Deleted between lookup and enrollment.
        state.enrollments.withdraw(enrollment.id).await;
        return Err(e);
    }
    tracing::info!("✅ {} enrolled in {}", identity.id, simulation.id);

    respond::json(
        StatusCode::CREATED,
        &EnrollmentResponse {
            enrollment,
            toast: Notification::success(
                "Enrolled",
                format!("You are now enrolled in {}", simulation.title),
            ),
        },
    )
}

/// Records progress on one of the learner's own enrollments.
#[axum::debug_handler]
pub async fn update_progress(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(enrollment_id): Path<Uuid>,
    JsonBody(payload): JsonBody<ProgressRequest>,
) -> Result<Response> {
    let identity = signed_in(&session)?;

    let enrollment = state
        .enrollments
        .update_progress(identity.id, enrollment_id, payload.progress)
        .await?;

    tracing::debug!(
        "📈 Enrollment {} at {}% ({})",
        enrollment.id,
        enrollment.progress(),
        enrollment.status().as_str()
    );

    respond::json(
        StatusCode::OK,
        &EnrollmentResponse {
            enrollment,
            toast: Notification::success("Progress saved", "Keep going!"),
        },
    )
}

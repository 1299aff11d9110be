use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Extension,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::Result,
    handlers::respond::{self, JsonBody},
    models::{
        notification::Notification,
        session::CurrentSession,
        simulation::SimulationRecord,
    },
    state::AppState,
    validation::simulation::SimulationForm,
};

#[derive(Serialize)]
struct SimulationResponse {
    simulation: SimulationRecord,
    toast: Notification,
}

#[derive(Serialize)]
struct DeleteResponse {
    id: Uuid,
    deleted: bool,
    toast: Notification,
}

/// Adds a simulation to the catalog.
#[axum::debug_handler]
pub async fn create_simulation(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    JsonBody(form): JsonBody<SimulationForm>,
) -> Result<Response> {
    let fields = form.into_fields()?;
    let simulation = state.catalog.create(fields).await;

    tracing::info!(
        "✅ Simulation {} created by session {}",
        simulation.id,
        session.id
    );

    respond::json(
        StatusCode::CREATED,
        &SimulationResponse {
            simulation,
            toast: Notification::success("Success", "Simulation added successfully"),
        },
    )
}

/// Replaces the editable fields of a simulation. Unknown ids are a 404.
#[axum::debug_handler]
pub async fn update_simulation(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(simulation_id): Path<Uuid>,
    JsonBody(form): JsonBody<SimulationForm>,
) -> Result<Response> {
    let fields = form.into_fields()?;
    let simulation = state.catalog.update(simulation_id, fields).await?;

    tracing::info!(
        "✅ Simulation {} updated by session {}",
        simulation.id,
        session.id
    );

    respond::json(
        StatusCode::OK,
        &SimulationResponse {
            simulation,
            toast: Notification::success("Success", "Simulation updated successfully"),
        },
    )
}

/// Removes a simulation. Deleting an unknown id succeeds without changes.
#[axum::debug_handler]
pub async fn delete_simulation(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(simulation_id): Path<Uuid>,
) -> Result<Response> {
    let deleted = state.catalog.delete(simulation_id).await;

    let toast = if deleted {
        let dropped = state.enrollments.remove_simulation(simulation_id).await;
        tracing::info!(
            "🗑️ Simulation {} deleted by session {} ({} enrollments dropped)",
            simulation_id,
            session.id,
            dropped
        );
        Notification::success("Success", "Simulation deleted successfully")
    } else {
        tracing::debug!("Delete of unknown simulation {} ignored", simulation_id);
        Notification::success("Nothing to delete", "Simulation was already removed")
    };

    respond::json(
        StatusCode::OK,
        &DeleteResponse {
            id: simulation_id,
            deleted,
            toast,
        },
    )
}

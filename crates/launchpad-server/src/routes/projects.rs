use axum::extract::State;
use axum::Json;
use launchpad_core::types::{CreateProjectInput, CreateProjectOutput, OperationResult, ProjectRef};

use crate::error::AppError;
use crate::extract::Action;
use crate::state::AppState;

/// POST /create_project
pub async fn create_project(
    State(app): State<AppState>,
    action: Action<CreateProjectInput>,
) -> Result<Json<CreateProjectOutput>, AppError> {
    tracing::debug!(user = %action.user, name = %action.input.name, "create_project");
    let out = app
        .orchestrator
        .create_project(&action.input, &action.user)
        .await?;
    Ok(Json(out))
}

/// POST /start_project
pub async fn start_project(
    State(app): State<AppState>,
    action: Action<ProjectRef>,
) -> Result<Json<OperationResult>, AppError> {
    tracing::debug!(user = %action.user, id = action.input.id, "start_project");
    Ok(Json(app.orchestrator.start_project(action.input.id).await?))
}

/// POST /stop_project
pub async fn stop_project(
    State(app): State<AppState>,
    action: Action<ProjectRef>,
) -> Result<Json<OperationResult>, AppError> {
    tracing::debug!(user = %action.user, id = action.input.id, "stop_project");
    Ok(Json(app.orchestrator.stop_project(action.input.id).await?))
}

/// POST /delete_project
pub async fn delete_project(
    State(app): State<AppState>,
    action: Action<ProjectRef>,
) -> Result<Json<OperationResult>, AppError> {
    tracing::debug!(user = %action.user, id = action.input.id, "delete_project");
    Ok(Json(app.orchestrator.delete_project(action.input.id).await?))
}

use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;
use uuid::Uuid;

use scholaris_core::AppError;
use scholaris_models::StudentProfile;

use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

/// Get a student record
///
/// Admins see every student. Students see themselves, parents their linked
/// children and teachers the students of the classes they teach.
#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student record ID")),
    responses(
        (status = 200, description = "Student found", body = StudentProfile),
        (status = 400, description = "Invalid resource id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not permitted or not owned", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentProfile>, AppError> {
    let student = state
        .store
        .find_student(id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

    Ok(Json(student))
}

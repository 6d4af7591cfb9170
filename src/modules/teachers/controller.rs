use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;
use uuid::Uuid;

use scholaris_core::AppError;
use scholaris_models::TeacherProfile;

use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

/// Get a teacher record
#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher record ID")),
    responses(
        (status = 200, description = "Teacher found", body = TeacherProfile),
        (status = 400, description = "Invalid resource id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not permitted or not owned", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teacher(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeacherProfile>, AppError> {
    let teacher = state
        .store
        .find_teacher(id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))?;

    Ok(Json(teacher))
}

use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;
use uuid::Uuid;

use scholaris_core::AppError;
use scholaris_models::ParentProfile;

use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

/// Get a parent record
#[utoipa::path(
    get,
    path = "/api/parents/{id}",
    params(("id" = Uuid, Path, description = "Parent record ID")),
    responses(
        (status = 200, description = "Parent found", body = ParentProfile),
        (status = 400, description = "Invalid resource id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not permitted or not owned", body = ErrorResponse),
        (status = 404, description = "Parent not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn get_parent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ParentProfile>, AppError> {
    let parent = state
        .store
        .find_parent(id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Parent not found")))?;

    Ok(Json(parent))
}

use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;
use uuid::Uuid;

use scholaris_core::AppError;
use scholaris_models::Account;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

/// Get any account by id (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/accounts/{id}",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account found", body = Account),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state, admin), fields(admin_id = %admin.user_id))]
pub async fn get_account(
    State(state): State<AppState>,
    AuthUser(admin): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Account>, AppError> {
    let account = state
        .store
        .find_account(id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Account not found")))?;

    Ok(Json(account))
}

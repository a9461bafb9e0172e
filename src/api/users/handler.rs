//! Account administration handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::UserProfile;
use crate::utils::AppError;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub ok: bool,
}

/// List all accounts (sanitized profiles)
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<UserProfile>>, AppError> {
    let users = state.users().find_all().await?;
    Ok(Json(users.iter().map(|u| u.profile()).collect()))
}

/// Fetch one account by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, AppError> {
    let user = state
        .users()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
    Ok(Json(user.profile()))
}

/// Delete an account
///
/// Outstanding session tokens for the account keep verifying until expiry;
/// the session middleware rejects them with `UserNotFound` on the next
/// request, so deletion takes effect immediately in practice.
pub async fn delete(
    State(state): State<ServerState>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    if admin.id == id {
        return Err(AppError::validation("Cannot delete your own account"));
    }

    state.users().delete(&id).await?;
    tracing::info!(user_id = %id, deleted_by = %admin.id, "User deleted");
    Ok(Json(DeleteResponse { ok: true }))
}

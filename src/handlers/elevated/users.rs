// handlers/elevated/users.rs - account administration

use axum::extract::State;

use crate::database::models::Role;
use crate::middleware::{ApiResponse, ApiResult, ValidJson, ValidPath};
use crate::services::accounts::{self, NewAccountRequest, ProfileRequest, RegisterRequest};
use crate::state::AppState;

/// GET /api/admin/users (alias GET /api/users)
pub async fn list(State(state): State<AppState>) -> ApiResult {
    let users = state.store.list_users().await?;
    Ok(ApiResponse::success().with("users", users))
}

pub async fn show(State(state): State<AppState>, ValidPath(id): ValidPath<i64>) -> ApiResult {
    let user = accounts::find_user(&state, id).await?;
    Ok(ApiResponse::success().with("user", user))
}

/**
 * POST /api/admin/users - Create an account on someone's behalf
 *
 * Expected Input:
 * ```json
 * {
 *   "nom": "string",
 *   "prenom": "string",
 *   "email": "string",
 *   "mdp": "string",          // at least 8 characters
 *   "fonction": "player"      // optional: "player" (default) or "admin"
 * }
 * ```
 */
pub async fn create(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewAccountRequest>,
) -> ApiResult {
    let user = accounts::create_user(&state, &payload).await?;
    Ok(ApiResponse::created()
        .with_message("Utilisateur ajouté avec succès")
        .with("user", user))
}

/// POST /api/admin/register - Same form as `/api/register`, creates an admin.
/// The calling admin stays signed in as themselves.
pub async fn register_admin(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> ApiResult {
    let user = accounts::register(&state, &payload, Role::Admin).await?;
    Ok(ApiResponse::created()
        .with_message("Administrateur ajouté avec succès")
        .with("user", user))
}

/// PUT /api/admin/users/:id - `fonction` is optional and kept when absent
pub async fn update(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(payload): ValidJson<ProfileRequest>,
) -> ApiResult {
    accounts::update_user(&state, id, &payload).await?;
    Ok(ApiResponse::message("Utilisateur mis à jour avec succès"))
}

/// DELETE /api/admin/users/:id - The user's orders go with it
pub async fn delete(State(state): State<AppState>, ValidPath(id): ValidPath<i64>) -> ApiResult {
    accounts::delete_user(&state, id).await?;
    Ok(ApiResponse::message("Utilisateur supprimé avec succès"))
}

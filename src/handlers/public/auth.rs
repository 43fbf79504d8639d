// handlers/public/auth.rs - login, self-service registration, logout

use axum::{extract::State, http::HeaderMap};

use crate::auth::Principal;
use crate::database::models::Role;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::services::accounts::{self, LoginRequest, RegisterRequest};
use crate::state::AppState;

/**
 * POST /api/login - Authenticate with email and password
 *
 * Expected Input:
 * ```json
 * { "email": "string", "password": "string" }
 * ```
 *
 * Expected Output (Success):
 * ```json
 * { "success": true, "message": "Connexion réussie" }
 * ```
 * Session mode sets the session cookie. Token mode adds `token` and
 * `expires_in` to the body.
 *
 * Unknown email and wrong password both answer 401 with the same message.
 */
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> ApiResult {
    let principal = accounts::login(&state, &payload).await?;
    let credential = state.authenticator.establish(&principal).await?;

    Ok(ApiResponse::message("Connexion réussie").with_credential(credential))
}

/**
 * POST /api/register - Create a player account and sign it in
 *
 * Expected Input:
 * ```json
 * {
 *   "nom": "string",
 *   "prenom": "string",
 *   "email": "string",      // simple two-part address
 *   "password": "string",   // at least 8 characters
 *   "confirm": "string"     // must equal password
 * }
 * ```
 *
 * Expected Output (201):
 * ```json
 * {
 *   "success": true,
 *   "message": "Utilisateur enregistré avec succès",
 *   "user": { "id": 1, "nom": "...", "prenom": "...", "email": "...", "fonction": "player" }
 * }
 * ```
 *
 * A duplicate email answers 409 "Cet email est déjà utilisé".
 */
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> ApiResult {
    let user = accounts::register(&state, &payload, Role::Player).await?;
    let credential = state.authenticator.establish(&Principal::from(&user)).await?;

    Ok(ApiResponse::created()
        .with_message("Utilisateur enregistré avec succès")
        .with("user", &user)
        .with_credential(credential))
}

/// GET /api/logout - Drop the caller's session. Token mode has nothing to revoke server-side.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult {
    let credential = state.authenticator.revoke(&headers).await;
    Ok(ApiResponse::message("Déconnexion réussie").with_credential(credential))
}

// handlers/protected/account.rs - the signed-in user's own profile and password

use axum::{extract::State, http::HeaderMap, Extension};

use crate::auth::Principal;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::services::accounts::{self, PasswordChangeRequest, ProfileRequest};
use crate::state::AppState;

/// GET /api/user - Principal snapshot held by the current credential
pub async fn whoami(Extension(principal): Extension<Principal>) -> ApiResult {
    Ok(ApiResponse::success().with("user", principal))
}

/**
 * POST /api/user - Update nom, prenom and email
 *
 * Expected Input:
 * ```json
 * { "nom": "string", "prenom": "string", "email": "string" }
 * ```
 *
 * The credential is renewed so later reads of `/api/user` see the new values.
 * In token mode the response carries the replacement token.
 */
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    headers: HeaderMap,
    ValidJson(payload): ValidJson<ProfileRequest>,
) -> ApiResult {
    let updated = accounts::update_profile(&state, &principal, &payload).await?;
    let credential = state.authenticator.renew(&headers, &updated).await?;

    Ok(ApiResponse::message("Informations de l'utilisateur mises à jour avec succès")
        .with("user", updated)
        .with_credential(credential))
}

/**
 * POST /api/password - Change password
 *
 * Expected Input:
 * ```json
 * { "oldPassword": "string", "password": "string", "confirm": "string" }
 * ```
 *
 * Length and confirmation are checked before the stored hash is read.
 */
pub async fn change_password(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidJson(payload): ValidJson<PasswordChangeRequest>,
) -> ApiResult {
    accounts::change_password(&state, &principal, &payload).await?;
    Ok(ApiResponse::message("Mot de passe mis à jour avec succès"))
}

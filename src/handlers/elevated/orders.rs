use axum::extract::State;
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult, ValidPath};
use crate::services::orders;
use crate::state::AppState;

/// GET /api/admin/commandes - Every order, enriched, with owner nom/prenom/email
pub async fn list(State(state): State<AppState>) -> ApiResult {
    let commandes = orders::all_orders(&state).await?;
    Ok(ApiResponse::success().with("commandes", commandes))
}

pub async fn delete(State(state): State<AppState>, ValidPath(id): ValidPath<Uuid>) -> ApiResult {
    orders::delete_order(&state, id).await?;
    Ok(ApiResponse::message("Commande supprimée avec succès"))
}

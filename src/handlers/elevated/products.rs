// handlers/elevated/products.rs - catalog writes (admin only)

use axum::extract::State;

use crate::middleware::{ApiResponse, ApiResult, ValidJson, ValidPath};
use crate::services::catalog::{self, ProductRequest};
use crate::state::AppState;

/// GET /api/admin/produits - Whole catalog, not truncated
pub async fn list(State(state): State<AppState>) -> ApiResult {
    let produits = catalog::list_all(&state).await?;
    Ok(ApiResponse::success().with("produits", produits))
}

/**
 * POST /api/admin/produits (alias POST /api/produits)
 *
 * Expected Input:
 * ```json
 * {
 *   "nom": "string",           // required
 *   "quantite": 10,            // integer >= 0, number or numeric string
 *   "prix": 12.5,              // decimal >= 0, number or numeric string
 *   "description": "string",   // optional
 *   "image": "string"          // optional
 * }
 * ```
 */
pub async fn create(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<ProductRequest>,
) -> ApiResult {
    let produit = catalog::create_product(&state, &payload).await?;
    Ok(ApiResponse::created()
        .with_message("Produit ajouté avec succès")
        .with("produit", produit))
}

/// PUT /api/admin/produits/:id - Full replacement; 404 when the id is unknown
pub async fn update(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(payload): ValidJson<ProductRequest>,
) -> ApiResult {
    let produit = catalog::update_product(&state, id, &payload).await?;
    Ok(ApiResponse::message("Produit mis à jour avec succès").with("produit", produit))
}

pub async fn delete(State(state): State<AppState>, ValidPath(id): ValidPath<i64>) -> ApiResult {
    catalog::delete_product(&state, id).await?;
    Ok(ApiResponse::message("Produit supprimé avec succès"))
}

use axum::{extract::State, Extension};

use crate::auth::Principal;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::services::orders::{self, OrderRequest};
use crate::state::AppState;

/**
 * POST /api/commande - Place an order
 *
 * Expected Input:
 * ```json
 * { "produits": "[{\"id\":1,\"quantity\":2}]" }
 * ```
 * `produits` may also be sent as a plain array. Every quantity must be at least 1.
 *
 * Expected Output (201):
 * ```json
 * { "success": true, "message": "success", "id": "uuid" }
 * ```
 */
pub async fn place_order(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidJson(payload): ValidJson<OrderRequest>,
) -> ApiResult {
    let id = orders::create_order(&state, &principal, &payload).await?;
    Ok(ApiResponse::created().with_message("success").with("id", id))
}

/// GET /api/commandes - Caller's orders, priced against the current catalog
pub async fn my_orders(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult {
    let commands = orders::orders_for(&state, &principal).await?;
    Ok(ApiResponse::success().with("commands", commands))
}

use axum::extract::State;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::catalog;
use crate::state::AppState;

/// GET /api/produits - First page of the catalog, in insertion order
pub async fn products(State(state): State<AppState>) -> ApiResult {
    let produits = catalog::list_public(&state).await?;
    Ok(ApiResponse::success().with("produits", produits))
}

/// GET /api/articles
pub async fn articles(State(state): State<AppState>) -> ApiResult {
    let articles = catalog::list_articles(&state).await?;
    Ok(ApiResponse::success().with("articles", articles))
}

/// GET /api/annonces
pub async fn announcements() -> ApiResult {
    Ok(ApiResponse::success().with("annonces", catalog::announcements()))
}

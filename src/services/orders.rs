use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{InvalidReason, Principal};
use crate::database::DatabaseError;
use crate::database::models::{Order, OrderLine};
use crate::error::ApiError;
use crate::services::pricing::{enrich_order, CatalogIndex, EnrichedOrder};
use crate::services::validation::MISSING_FIELDS;
use crate::state::AppState;

pub const INVALID_LINES: &str = "Liste de produits invalide";
pub const EMPTY_ORDER: &str = "La commande est vide";
pub const INVALID_LINE_QUANTITY: &str = "Quantité invalide";
pub const ORDER_NOT_FOUND: &str = "Commande introuvable";

/// Checkout body. `produits` is either the JSON-encoded line list (as the
/// storefront sends it) or the list itself.
#[derive(Debug, Default, Deserialize)]
pub struct OrderRequest {
    pub produits: Option<Value>,
}

/// Validate the line list and return the text to persist. An encoded string is
/// stored verbatim; an array is serialized.
pub fn parse_lines(produits: Option<&Value>) -> Result<(Vec<OrderLine>, String), ApiError> {
    let (lines, stored) = match produits {
        None | Some(Value::Null) => return Err(ApiError::validation_error(MISSING_FIELDS)),
        Some(Value::String(encoded)) if encoded.trim().is_empty() => {
            return Err(ApiError::validation_error(MISSING_FIELDS))
        }
        Some(Value::String(encoded)) => {
            let lines = serde_json::from_str::<Vec<OrderLine>>(encoded)
                .map_err(|_| ApiError::field_error("produits", INVALID_LINES))?;
            (lines, encoded.clone())
        }
        Some(array @ Value::Array(_)) => {
            let lines = serde_json::from_value::<Vec<OrderLine>>(array.clone())
                .map_err(|_| ApiError::field_error("produits", INVALID_LINES))?;
            let stored = serde_json::to_string(&lines)
                .map_err(|_| ApiError::field_error("produits", INVALID_LINES))?;
            (lines, stored)
        }
        Some(_) => return Err(ApiError::field_error("produits", INVALID_LINES)),
    };

    if lines.is_empty() {
        return Err(ApiError::field_error("produits", EMPTY_ORDER));
    }
    if lines.iter().any(|line| line.quantity < 1) {
        return Err(ApiError::field_error("produits", INVALID_LINE_QUANTITY));
    }

    Ok((lines, stored))
}

/// Persist a checkout. Nothing is priced or reserved here.
pub async fn create_order(state: &AppState, principal: &Principal, req: &OrderRequest) -> Result<Uuid, ApiError> {
    let (lines, produits) = parse_lines(req.produits.as_ref())?;

    let order = Order {
        id: Uuid::new_v4(),
        date: Utc::now(),
        produits,
        id_utilisateur: principal.id,
    };
    match state.store.insert_order(&order).await {
        Ok(()) => {}
        // the account behind this credential has been removed
        Err(DatabaseError::ForeignKeyViolation(_)) => {
            warn!("Order rejected: user {} no longer exists", principal.id);
            return Err(InvalidReason::UnknownSession.into());
        }
        Err(e) => return Err(e.into()),
    }

    info!("User {} placed order {} ({} lines)", principal.id, order.id, lines.len());
    Ok(order.id)
}

async fn catalog(state: &AppState) -> Result<CatalogIndex, ApiError> {
    Ok(CatalogIndex::new(state.store.list_products(None).await?))
}

pub async fn orders_for(state: &AppState, principal: &Principal) -> Result<Vec<EnrichedOrder>, ApiError> {
    let orders = state.store.orders_for_user(principal.id).await?;
    let catalog = catalog(state).await?;

    Ok(orders
        .iter()
        .map(|order| enrich_order(order, &catalog, None))
        .collect())
}

/// Every order with its owner's name and email
pub async fn all_orders(state: &AppState) -> Result<Vec<EnrichedOrder>, ApiError> {
    let orders = state.store.orders_with_owner().await?;
    let catalog = catalog(state).await?;

    Ok(orders
        .into_iter()
        .map(|(order, owner)| enrich_order(&order, &catalog, Some(owner)))
        .collect())
}

pub async fn delete_order(state: &AppState, id: Uuid) -> Result<(), ApiError> {
    if !state.store.delete_order(id).await? {
        return Err(ApiError::not_found(ORDER_NOT_FOUND));
    }
    info!("Deleted order {}", id);
    Ok(())
}

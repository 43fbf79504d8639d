use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use tracing::info;

use crate::database::models::{Article, Product, ProductInput};
use crate::error::ApiError;
use crate::services::validation::{required, MISSING_FIELDS};
use crate::state::AppState;

pub const PRODUCT_NOT_FOUND: &str = "Produit introuvable";
pub const INVALID_QUANTITY: &str = "Quantité invalide";
pub const INVALID_PRICE: &str = "Prix invalide";

/// Product form body. Numbers are accepted as JSON numbers or numeric strings
/// since HTML form inputs submit strings.
#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    pub nom: Option<String>,
    pub quantite: Option<Value>,
    pub prix: Option<Value>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Editorial announcement shown on the home page
#[derive(Debug, Clone, Serialize)]
pub struct Announcement {
    pub id: &'static str,
    pub nom: &'static str,
    pub contenu: &'static str,
    pub auteur: &'static str,
}

const ANNOUNCEMENTS: &[Announcement] = &[Announcement {
    id: "123",
    nom: "annonce 1",
    contenu: "description 1",
    auteur: "Auteur",
}];

pub fn announcements() -> &'static [Announcement] {
    ANNOUNCEMENTS
}

fn number_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn parse_quantity(value: &Value) -> Result<i32, ApiError> {
    number_text(value)
        .and_then(|s| s.parse::<i32>().ok())
        .filter(|q| *q >= 0)
        .ok_or_else(|| ApiError::field_error("quantite", INVALID_QUANTITY))
}

/// Largest value the `NUMERIC(12, 2)` price column holds
const MAX_PRICE: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

fn parse_price(value: &Value) -> Result<Decimal, ApiError> {
    number_text(value)
        .and_then(|s| Decimal::from_str(&s).or_else(|_| Decimal::from_scientific(&s)).ok())
        .map(|p| p.normalize())
        .filter(|p| !p.is_sign_negative() && p.scale() <= 2 && *p <= MAX_PRICE)
        .ok_or_else(|| ApiError::field_error("prix", INVALID_PRICE))
}

fn optional_text(value: &Option<String>) -> Option<String> {
    required(value).map(|v| v.trim().to_string())
}

/// `nom` non-empty, `quantite` a non-negative integer, `prix` a non-negative decimal
pub fn validate_product(req: &ProductRequest) -> Result<ProductInput, ApiError> {
    let (Some(nom), Some(quantite), Some(prix)) = (
        required(&req.nom),
        req.quantite.as_ref().filter(|v| !v.is_null()),
        req.prix.as_ref().filter(|v| !v.is_null()),
    ) else {
        return Err(ApiError::validation_error(MISSING_FIELDS));
    };

    Ok(ProductInput {
        nom: nom.trim().to_string(),
        quantite: parse_quantity(quantite)?,
        prix: parse_price(prix)?,
        description: optional_text(&req.description),
        image: optional_text(&req.image),
    })
}

/// Storefront listing, truncated to the configured catalog size
pub async fn list_public(state: &AppState) -> Result<Vec<Product>, ApiError> {
    Ok(state
        .store
        .list_products(Some(state.config.api.catalog_limit))
        .await?)
}

pub async fn list_all(state: &AppState) -> Result<Vec<Product>, ApiError> {
    Ok(state.store.list_products(None).await?)
}

pub async fn create_product(state: &AppState, req: &ProductRequest) -> Result<Product, ApiError> {
    let input = validate_product(req)?;
    let product = state.store.insert_product(&input).await?;
    info!("Created product {} ({})", product.id, product.nom);
    Ok(product)
}

pub async fn update_product(state: &AppState, id: i64, req: &ProductRequest) -> Result<Product, ApiError> {
    let input = validate_product(req)?;
    state
        .store
        .update_product(id, &input)
        .await?
        .ok_or_else(|| ApiError::not_found(PRODUCT_NOT_FOUND))
}

pub async fn delete_product(state: &AppState, id: i64) -> Result<(), ApiError> {
    if !state.store.delete_product(id).await? {
        return Err(ApiError::not_found(PRODUCT_NOT_FOUND));
    }
    info!("Deleted product {}", id);
    Ok(())
}

pub async fn list_articles(state: &AppState) -> Result<Vec<Article>, ApiError> {
    Ok(state.store.list_articles().await?)
}

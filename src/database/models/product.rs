use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `stock` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub nom: String,
    pub quantite: i32,
    pub prix: Decimal,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Validated product fields for inserts and full updates
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub nom: String,
    pub quantite: i32,
    pub prix: Decimal,
    pub description: Option<String>,
    pub image: Option<String>,
}

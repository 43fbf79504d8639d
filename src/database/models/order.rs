use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of the `commande` table. `produits` is the caller's JSON line list, stored as received.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub produits: String,
    pub id_utilisateur: i64,
}

/// One `(product reference, quantity)` pair as stored on an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: i64,
    pub quantity: i64,
}

/// Owner columns joined onto orders for the admin listing
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct OrderOwner {
    pub nom: String,
    pub prenom: String,
    pub email: String,
}

//! Order enrichment: stored `(id, quantity)` lines are joined against the live
//! catalog at read time. Prices are not locked at purchase, so totals follow
//! the current catalog.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

use crate::database::models::{Order, OrderLine, OrderOwner, Product};

/// Order line merged with current catalog fields. A product removed from the
/// catalog yields `disponible: false` with null display fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedLine {
    pub id: i64,
    pub quantity: i64,
    pub nom: Option<String>,
    pub prix: Option<Decimal>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub disponible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedOrder {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub id_utilisateur: i64,
    pub produits: Vec<EnrichedLine>,
    pub total: Decimal,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub owner: Option<OrderOwner>,
}

/// Catalog snapshot indexed by product id
pub struct CatalogIndex {
    products: HashMap<i64, Product>,
}

impl CatalogIndex {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn get(&self, id: i64) -> Option<&Product> {
        self.products.get(&id)
    }
}

pub fn enrich_line(line: OrderLine, catalog: &CatalogIndex) -> EnrichedLine {
    match catalog.get(line.id) {
        Some(product) => EnrichedLine {
            id: line.id,
            quantity: line.quantity,
            nom: Some(product.nom.clone()),
            prix: Some(product.prix),
            image: product.image.clone(),
            description: product.description.clone(),
            disponible: true,
        },
        None => EnrichedLine {
            id: line.id,
            quantity: line.quantity,
            nom: None,
            prix: None,
            image: None,
            description: None,
            disponible: false,
        },
    }
}

/// Σ(current price × quantity); unavailable lines count for nothing
pub fn order_total(lines: &[EnrichedLine]) -> Decimal {
    lines.iter().fold(Decimal::ZERO, |total, line| {
        let Some(prix) = line.prix else {
            return total;
        };
        prix.checked_mul(Decimal::from(line.quantity))
            .and_then(|subtotal| total.checked_add(subtotal))
            .unwrap_or_else(|| {
                warn!("Order total overflow on product {}", line.id);
                Decimal::MAX
            })
    })
}

/// Decode a stored `produits` column. Rows written before validation existed
/// may not parse; they are reported and treated as empty.
pub fn stored_lines(order: &Order) -> Vec<OrderLine> {
    match serde_json::from_str::<Vec<OrderLine>>(&order.produits) {
        Ok(lines) => lines,
        Err(e) => {
            warn!("Order {} has unreadable product list: {}", order.id, e);
            Vec::new()
        }
    }
}

pub fn enrich_order(order: &Order, catalog: &CatalogIndex, owner: Option<OrderOwner>) -> EnrichedOrder {
    let produits: Vec<EnrichedLine> = stored_lines(order)
        .into_iter()
        .map(|line| enrich_line(line, catalog))
        .collect();
    let total = order_total(&produits);

    EnrichedOrder {
        id: order.id,
        date: order.date,
        id_utilisateur: order.id_utilisateur,
        produits,
        total,
        owner,
    }
}

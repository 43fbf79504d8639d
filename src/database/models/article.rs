use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Article {
    pub id: i64,
    pub titre: String,
    pub contenu: String,
    pub auteur: String,
    pub date: DateTime<Utc>,
}

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Article, NewUser, Order, OrderOwner, Product, ProductInput, User, UserProfile,
};

/// Data-access handle injected into every handler through `AppState`.
///
/// Each method maps to a single parameterized statement. Uniqueness of
/// `utilisateur.email` is enforced by the backing store and surfaces as
/// [`DatabaseError::UniqueViolation`]; callers never pre-check it.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round-trip used by `/health`
    async fn ping(&self) -> Result<(), DatabaseError>;

    // Users
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn find_user(&self, id: i64) -> Result<Option<User>, DatabaseError>;
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    /// Returns `false` when no row has this id
    async fn update_user(&self, id: i64, profile: &UserProfile) -> Result<bool, DatabaseError>;
    async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<bool, DatabaseError>;
    async fn delete_user(&self, id: i64) -> Result<bool, DatabaseError>;
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;

    // Catalog
    /// Products in insertion order, truncated to `limit` when given
    async fn list_products(&self, limit: Option<i64>) -> Result<Vec<Product>, DatabaseError>;
    async fn insert_product(&self, product: &ProductInput) -> Result<Product, DatabaseError>;
    async fn update_product(&self, id: i64, product: &ProductInput) -> Result<Option<Product>, DatabaseError>;
    async fn delete_product(&self, id: i64) -> Result<bool, DatabaseError>;

    // Orders
    async fn insert_order(&self, order: &Order) -> Result<(), DatabaseError>;
    async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, DatabaseError>;
    async fn orders_with_owner(&self) -> Result<Vec<(Order, OrderOwner)>, DatabaseError>;
    async fn delete_order(&self, id: Uuid) -> Result<bool, DatabaseError>;

    // Editorial
    async fn list_articles(&self) -> Result<Vec<Article>, DatabaseError>;
}

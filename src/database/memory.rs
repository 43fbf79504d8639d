//! In-process `Store` used for local demos (`STORAGE_BACKEND=memory`) and tests.
//! Mirrors the constraints of the SQL schema: unique emails, cascading order
//! deletion, insertion-ordered catalog.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Article, NewUser, Order, OrderOwner, Product, ProductInput, User, UserProfile,
};
use crate::database::store::Store;

const EMAIL_CONSTRAINT: &str = "utilisateur_email_key";
const OWNER_CONSTRAINT: &str = "commande_id_utilisateur_fkey";

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    products: Vec<Product>,
    orders: Vec<Order>,
    articles: Vec<Article>,
    next_user_id: i64,
    next_product_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    statements: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of statements executed so far
    pub fn statement_count(&self) -> u64 {
        self.statements.load(Ordering::SeqCst)
    }

    /// Seed an article; there is no public write path for editorial content
    pub async fn add_article(&self, article: Article) {
        self.tables.write().await.articles.push(article);
    }

    fn record(&self) {
        self.statements.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        self.record();
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        self.record();
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        self.record();
        // check and insert under one write lock, like a unique index would
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(DatabaseError::UniqueViolation(EMAIL_CONSTRAINT.to_string()));
        }

        tables.next_user_id += 1;
        let created = User {
            id: tables.next_user_id,
            last_name: user.last_name,
            first_name: user.first_name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn update_user(&self, id: i64, profile: &UserProfile) -> Result<bool, DatabaseError> {
        self.record();
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.id != id && u.email.eq_ignore_ascii_case(&profile.email))
        {
            return Err(DatabaseError::UniqueViolation(EMAIL_CONSTRAINT.to_string()));
        }

        match tables.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.last_name = profile.last_name.clone();
                user.first_name = profile.first_name.clone();
                user.email = profile.email.clone();
                if let Some(role) = profile.role {
                    user.role = role;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<bool, DatabaseError> {
        self.record();
        let mut tables = self.tables.write().await;
        match tables.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, id: i64) -> Result<bool, DatabaseError> {
        self.record();
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }
        // ON DELETE CASCADE
        tables.orders.retain(|o| o.id_utilisateur != id);
        Ok(true)
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        self.record();
        Ok(self.tables.read().await.users.clone())
    }

    async fn list_products(&self, limit: Option<i64>) -> Result<Vec<Product>, DatabaseError> {
        self.record();
        let tables = self.tables.read().await;
        let take = limit
            .map(|l| usize::try_from(l.max(0)).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);
        Ok(tables.products.iter().take(take).cloned().collect())
    }

    async fn insert_product(&self, product: &ProductInput) -> Result<Product, DatabaseError> {
        self.record();
        let mut tables = self.tables.write().await;
        tables.next_product_id += 1;
        let created = Product {
            id: tables.next_product_id,
            nom: product.nom.clone(),
            quantite: product.quantite,
            prix: product.prix,
            description: product.description.clone(),
            image: product.image.clone(),
        };
        tables.products.push(created.clone());
        Ok(created)
    }

    async fn update_product(&self, id: i64, product: &ProductInput) -> Result<Option<Product>, DatabaseError> {
        self.record();
        let mut tables = self.tables.write().await;
        Ok(tables.products.iter_mut().find(|p| p.id == id).map(|existing| {
            existing.nom = product.nom.clone();
            existing.quantite = product.quantite;
            existing.prix = product.prix;
            existing.description = product.description.clone();
            existing.image = product.image.clone();
            existing.clone()
        }))
    }

    async fn delete_product(&self, id: i64) -> Result<bool, DatabaseError> {
        self.record();
        let mut tables = self.tables.write().await;
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        Ok(tables.products.len() != before)
    }

    async fn insert_order(&self, order: &Order) -> Result<(), DatabaseError> {
        self.record();
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == order.id_utilisateur) {
            return Err(DatabaseError::ForeignKeyViolation(OWNER_CONSTRAINT.to_string()));
        }
        tables.orders.push(order.clone());
        Ok(())
    }

    async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, DatabaseError> {
        self.record();
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .iter()
            .filter(|o| o.id_utilisateur == user_id)
            .cloned()
            .collect())
    }

    async fn orders_with_owner(&self) -> Result<Vec<(Order, OrderOwner)>, DatabaseError> {
        self.record();
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .iter()
            .filter_map(|order| {
                tables
                    .users
                    .iter()
                    .find(|u| u.id == order.id_utilisateur)
                    .map(|u| {
                        let owner = OrderOwner {
                            nom: u.last_name.clone(),
                            prenom: u.first_name.clone(),
                            email: u.email.clone(),
                        };
                        (order.clone(), owner)
                    })
            })
            .collect())
    }

    async fn delete_order(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.record();
        let mut tables = self.tables.write().await;
        let before = tables.orders.len();
        tables.orders.retain(|o| o.id != id);
        Ok(tables.orders.len() != before)
    }

    async fn list_articles(&self) -> Result<Vec<Article>, DatabaseError> {
        self.record();
        Ok(self.tables.read().await.articles.clone())
    }
}

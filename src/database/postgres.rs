use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    Article, NewUser, Order, OrderOwner, Product, ProductInput, Role, User, UserProfile,
};
use crate::database::store::Store;

const USER_COLUMNS: &str = "id, nom, prenom, email, mdp, fonction";
const PRODUCT_COLUMNS: &str = "id, nom, quantite, prix, description, image";

/// `Store` backed by the shared PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn user_from_row(row: &PgRow) -> Result<User, DatabaseError> {
    let role: String = row.try_get("fonction")?;
    let role = role.parse::<Role>().map_err(DatabaseError::QueryError)?;

    Ok(User {
        id: row.try_get("id")?,
        last_name: row.try_get("nom")?,
        first_name: row.try_get("prenom")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("mdp")?,
        role,
    })
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!(
            "SELECT {} FROM utilisateur WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {} FROM utilisateur WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let query = format!(
            "INSERT INTO utilisateur (nom, prenom, email, mdp, fonction)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(&user.last_name)
            .bind(&user.first_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .fetch_one(&self.pool)
            .await?;

        user_from_row(&row)
    }

    async fn update_user(&self, id: i64, profile: &UserProfile) -> Result<bool, DatabaseError> {
        // COALESCE keeps the stored role when the caller is not changing it
        let result = sqlx::query(
            "UPDATE utilisateur
             SET nom = $1, prenom = $2, email = $3, fonction = COALESCE($4, fonction)
             WHERE id = $5",
        )
        .bind(&profile.last_name)
        .bind(&profile.first_name)
        .bind(&profile.email)
        .bind(profile.role.map(|r| r.as_str()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE utilisateur SET mdp = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM utilisateur WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let query = format!("SELECT {} FROM utilisateur ORDER BY id", USER_COLUMNS);
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        rows.iter().map(user_from_row).collect()
    }

    async fn list_products(&self, limit: Option<i64>) -> Result<Vec<Product>, DatabaseError> {
        // LIMIT NULL means no limit in PostgreSQL
        let query = format!("SELECT {} FROM stock ORDER BY id LIMIT $1", PRODUCT_COLUMNS);
        let products = sqlx::query_as::<_, Product>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn insert_product(&self, product: &ProductInput) -> Result<Product, DatabaseError> {
        let query = format!(
            "INSERT INTO stock (nom, quantite, prix, description, image)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            PRODUCT_COLUMNS
        );
        let inserted = sqlx::query_as::<_, Product>(&query)
            .bind(&product.nom)
            .bind(product.quantite)
            .bind(product.prix)
            .bind(&product.description)
            .bind(&product.image)
            .fetch_one(&self.pool)
            .await?;

        Ok(inserted)
    }

    async fn update_product(&self, id: i64, product: &ProductInput) -> Result<Option<Product>, DatabaseError> {
        let query = format!(
            "UPDATE stock
             SET nom = $1, quantite = $2, prix = $3, description = $4, image = $5
             WHERE id = $6
             RETURNING {}",
            PRODUCT_COLUMNS
        );
        let updated = sqlx::query_as::<_, Product>(&query)
            .bind(&product.nom)
            .bind(product.quantite)
            .bind(product.prix)
            .bind(&product.description)
            .bind(&product.image)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    async fn delete_product(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM stock WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_order(&self, order: &Order) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO commande (id, date, produits, id_utilisateur) VALUES ($1, $2, $3, $4)")
            .bind(order.id)
            .bind(order.date)
            .bind(&order.produits)
            .bind(order.id_utilisateur)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, DatabaseError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT id, date, produits, id_utilisateur FROM commande
             WHERE id_utilisateur = $1
             ORDER BY date",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn orders_with_owner(&self) -> Result<Vec<(Order, OrderOwner)>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT c.id, c.date, c.produits, c.id_utilisateur, u.nom, u.prenom, u.email
             FROM commande c
             INNER JOIN utilisateur u ON c.id_utilisateur = u.id
             ORDER BY c.date",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<(Order, OrderOwner), DatabaseError> {
                let order = Order {
                    id: row.try_get("id")?,
                    date: row.try_get("date")?,
                    produits: row.try_get("produits")?,
                    id_utilisateur: row.try_get("id_utilisateur")?,
                };
                let owner = OrderOwner {
                    nom: row.try_get("nom")?,
                    prenom: row.try_get("prenom")?,
                    email: row.try_get("email")?,
                };
                Ok((order, owner))
            })
            .collect()
    }

    async fn delete_order(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM commande WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_articles(&self) -> Result<Vec<Article>, DatabaseError> {
        let articles = sqlx::query_as::<_, Article>(
            "SELECT id, titre, contenu, auteur, date FROM article ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(articles)
    }
}

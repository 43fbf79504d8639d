use anyhow::Context;
use serde_json::json;
use std::sync::Arc;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::{config, AppConfig, StorageBackend};
use crate::database::models::User;
use crate::database::{DatabaseManager, PgStore};
use crate::services::accounts::{self, NewAccountRequest};
use crate::state::AppState;

/// Bootstrap an admin with the same validation rules as the admin API
pub async fn handle(
    email: String,
    nom: String,
    prenom: String,
    password: String,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let request = NewAccountRequest {
        nom: Some(nom),
        prenom: Some(prenom),
        email: Some(email),
        mdp: Some(password),
        fonction: Some("admin".to_string()),
    };
    let user = create_admin(config().clone(), &request).await?;

    output_success(
        output_format,
        &format!("Administrator {} created", user.email),
        Some(json!({ "user": user })),
    )
}

/// Pending migrations run first so a fresh database can be bootstrapped in one step
pub async fn create_admin(config: AppConfig, request: &NewAccountRequest) -> anyhow::Result<User> {
    if config.database.backend == StorageBackend::Memory {
        anyhow::bail!("create-admin needs a persistent store; unset STORAGE_BACKEND=memory");
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the database")?;
    DatabaseManager::migrate(&pool).await.context("migration failed")?;
    let state = AppState::new(Arc::new(PgStore::new(pool)), config);

    Ok(accounts::create_user(&state, request).await?)
}

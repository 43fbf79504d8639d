use anyhow::Context;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::{config, StorageBackend};
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let database = &config().database;
    if database.backend == StorageBackend::Memory {
        anyhow::bail!("STORAGE_BACKEND=memory has no schema to migrate");
    }

    let pool = DatabaseManager::connect(database)
        .await
        .context("failed to connect to the database")?;
    DatabaseManager::migrate(&pool).await.context("migration failed")?;

    output_success(output_format, &format!("Migrations applied to '{}'", database.name), None)
}

#![cfg(test)]
use sea_orm::DatabaseConnection;

use models::db::{connect_single, migrate};

/// Fresh in-memory database per test, migrated with the production `Migrator`.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_single("sqlite::memory:").await?;
    migrate(&db).await?;
    Ok(db)
}

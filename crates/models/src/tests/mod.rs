use anyhow::Result;
use sea_orm::DatabaseConnection;

use crate::db::{connect_single, migrate};




/// Fresh in-memory database with every migration applied.
pub(crate) async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect_single("sqlite::memory:").await?;
    migrate(&db).await?;
    Ok(db)
}

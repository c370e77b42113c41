#![cfg(test)]
use sea_orm::DatabaseConnection;
use configs::DatabaseConfig;
use models::db::connect_and_migrate;

/// Fresh, migrated in-memory database for the current test.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    connect_and_migrate(&DatabaseConfig::sqlite_in_memory()).await
}

/// Register a bare user row (no credentials) for service tests.
pub async fn seed_user(db: &DatabaseConnection, email: &str) -> Result<models::user::Model, anyhow::Error> {
    Ok(models::user::create(db, email, "Seed").await?)
}

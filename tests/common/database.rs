//! Test database setup and management
#![allow(dead_code)]

use lunch_voting::app_config::DatabaseConfig;
use lunch_voting::db::{create_schema, init_db};
use sea_orm::{DatabaseConnection, DbErr};
use std::env;

/// Get a test database connection
/// Uses TEST_DATABASE_URL environment variable or falls back to a fresh
/// in-memory SQLite database.
pub async fn get_test_db() -> Result<DatabaseConnection, DbErr> {
    let database_url =
        env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());

    init_db(&database_url, &DatabaseConfig::default()).await
}

/// Setup test database - connect and make sure the schema exists
pub async fn setup_test_database() -> Result<DatabaseConnection, DbErr> {
    let db = get_test_db().await?;
    create_schema(&db).await?;
    Ok(db)
}

/// Cleanup function to remove test data
///
/// Only matters when TEST_DATABASE_URL points at a shared database.
/// Child tables are cleared before parent tables.
pub async fn cleanup_test_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    use lunch_voting::orm::{menus, restaurants, users, votes};
    use sea_orm::EntityTrait;

    votes::Entity::delete_many().exec(db).await?;
    menus::Entity::delete_many().exec(db).await?;
    restaurants::Entity::delete_many().exec(db).await?;
    users::Entity::delete_many().exec(db).await?;

    Ok(())
}

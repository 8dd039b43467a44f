//! Database connection and schema bootstrap.
//!
//! The schema is built with sea-query so the same statements run on
//! Postgres, MySQL and SQLite. Uniqueness rules that the voting logic relies
//! on live here as store constraints:
//! - `restaurants.name`
//! - `menus (restaurant_id, day_of_week)`
//! - `votes (user_id, menu_id)` and `votes (user_id, day_of_week)`

use crate::app_config::DatabaseConfig;
use crate::orm::{menus, restaurants, users, votes};
use sea_orm::sea_query::{ColumnDef, ForeignKey, ForeignKeyAction, Index, Table};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use std::time::Duration;

/// Lifetime given to the single in-memory SQLite connection. Closing it
/// drops the database, so it must outlive the process.
const IN_MEMORY_CONNECTION_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365);

fn is_in_memory_sqlite(url: &str) -> bool {
    url.starts_with("sqlite::memory:") || url.contains("mode=memory")
}

/// Pool options for `url`.
pub fn connect_options(url: &str, config: &DatabaseConfig) -> ConnectOptions {
    let mut opt = ConnectOptions::new(url.to_owned());
    // Every connection to an in-memory SQLite database sees its own empty
    // database, so the pool must hold exactly one and never recycle it.
    if is_in_memory_sqlite(url) {
        opt.max_connections(1)
            .min_connections(1)
            .idle_timeout(IN_MEMORY_CONNECTION_LIFETIME)
            .max_lifetime(IN_MEMORY_CONNECTION_LIFETIME);
    } else {
        opt.max_connections(config.max_connections);
    }
    opt.sqlx_logging(config.sqlx_logging);
    opt
}

/// Opens a connection pool.
pub async fn init_db(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(connect_options(url, config)).await?;
    log::info!("Connected to {:?} database", db.get_database_backend());
    Ok(db)
}

/// Creates all tables and constraints if they do not exist yet.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    let users_table = Table::create()
        .table(users::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(users::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(users::Column::Username)
                .string_len(255)
                .not_null()
                .unique_key(),
        )
        .col(ColumnDef::new(users::Column::Email).string_len(255))
        .col(ColumnDef::new(users::Column::Password).text().not_null())
        .col(ColumnDef::new(users::Column::CreatedAt).timestamp().not_null())
        .to_owned();

    let restaurants_table = Table::create()
        .table(restaurants::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(restaurants::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(restaurants::Column::Name)
                .string_len(255)
                .not_null()
                .unique_key(),
        )
        .to_owned();

    let menus_table = Table::create()
        .table(menus::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(menus::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(menus::Column::RestaurantId).integer().not_null())
        .col(ColumnDef::new(menus::Column::Dish).string_len(255).not_null())
        .col(ColumnDef::new(menus::Column::DayOfWeek).string_len(3).not_null())
        .index(
            Index::create()
                .name("uq_menus_restaurant_day")
                .col(menus::Column::RestaurantId)
                .col(menus::Column::DayOfWeek)
                .unique(),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_menus_restaurant")
                .from(menus::Entity, menus::Column::RestaurantId)
                .to(restaurants::Entity, restaurants::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::NoAction),
        )
        .to_owned();

    let votes_table = Table::create()
        .table(votes::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(votes::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(votes::Column::UserId).integer().not_null())
        .col(ColumnDef::new(votes::Column::MenuId).integer().not_null())
        .col(ColumnDef::new(votes::Column::DayOfWeek).string_len(3).not_null())
        .col(ColumnDef::new(votes::Column::CreatedAt).timestamp().not_null())
        .index(
            Index::create()
                .name("uq_votes_user_menu")
                .col(votes::Column::UserId)
                .col(votes::Column::MenuId)
                .unique(),
        )
        .index(
            Index::create()
                .name("uq_votes_user_day")
                .col(votes::Column::UserId)
                .col(votes::Column::DayOfWeek)
                .unique(),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_votes_menu")
                .from(votes::Entity, votes::Column::MenuId)
                .to(menus::Entity, menus::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::NoAction),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_votes_user")
                .from(votes::Entity, votes::Column::UserId)
                .to(users::Entity, users::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::NoAction),
        )
        .to_owned();

    // Parents before children.
    for table in [users_table, restaurants_table, menus_table, votes_table] {
        db.execute(backend.build(&table)).await?;
    }

    log::debug!("Database schema is up to date");
    Ok(())
}

/// Returns true if the error came from a violated unique constraint.
///
/// sea-orm reports driver errors as strings, so this matches the wording of
/// each supported backend.
pub fn is_unique_violation(err: &DbErr) -> bool {
    let message = err.to_string();
    message.contains("UNIQUE constraint failed") // SQLite
        || message.contains("duplicate key value violates unique constraint") // Postgres
        || message.contains("Duplicate entry") // MySQL
}

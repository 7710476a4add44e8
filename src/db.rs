//! Storage handle lifecycle.
//!
//! The pool is opened once at startup, migrated, handed to actix as
//! `web::Data<PgPool>` and closed explicitly after the server stops.

use sqlx::{migrate::MigrateError, postgres::PgPoolOptions, PgPool};

use crate::config::DatabaseConfig;

pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = config.connect_options()?;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;
    log::info!(
        "connected to database (max_connections = {})",
        config.max_connections
    );
    Ok(pool)
}

/// Applies the embedded migrations under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

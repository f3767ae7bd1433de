//! PostgreSQL pool bootstrap.
//!
//! One entry point: connect, then bring the schema up to date from the
//! embedded migrations. A service that cannot reach its schema must not
//! start serving, so both steps fail the caller.

use crate::config::DatabaseConfig;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub async fn init(config: &DatabaseConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.url)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))
        })?;

    tracing::info!(
        max_connections = config.max_connections,
        "PostgreSQL pool established"
    );

    sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
        AppError::DatabaseError(anyhow::anyhow!("Failed to run migrations: {}", e))
    })?;

    tracing::info!("Database schema up to date");

    Ok(pool)
}

use anyhow::Result;
use sqlx::{SqlitePool, migrate::MigrateDatabase};

use crate::config::Config;

/// Opens the configured database, applying pending migrations first.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let pool = crate::db::create_pool(&config.database.url, config.database.max_connections).await?;
    crate::db::run_migrations(&pool).await?;

    Ok(pool)
}

#[tracing::instrument(skip(config))]
pub async fn migrate(config: &Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    let pool = crate::db::create_pool(&config.database.url, 1).await?;
    crate::db::run_migrations(&pool).await?;
    pool.close().await;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn reset(config: &Config) -> Result<()> {
    tracing::info!("Resetting database...");

    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate(config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}

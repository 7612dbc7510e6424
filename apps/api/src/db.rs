use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use tracing::info;

const TASKS_SCHEMA: &str = include_str!("../schema/tasks.sql");

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the `tasks` table and its index if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    // Unprepared execution: the schema file holds more than one statement.
    pool.execute(TASKS_SCHEMA)
        .await
        .context("Failed to apply tasks schema")?;
    info!("Tasks schema ready");
    Ok(())
}

//! Postgres connection lifecycle for the credential store.

pub mod users;

use anyhow::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Establish the pool, retrying on a fixed delay until it succeeds.
///
/// Connectivity failures at startup are treated as transient: the process
/// stays up and keeps retrying instead of exiting. Once connected, later
/// drops are the pool's own concern.
pub async fn connect_with_retry(dsn: &str) -> PgPool {
    loop {
        match PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
        {
            Ok(pool) => {
                info!("Database connected");
                return pool;
            }
            Err(err) => {
                error!(
                    "Database connection failed: {err}, retrying in {}s",
                    RETRY_DELAY.as_secs()
                );
                sleep(RETRY_DELAY).await;
            }
        }
    }
}

/// Bootstrap the users table. The UNIQUE constraint on `username` is the
/// arbiter for concurrent registrations, not application-level checks.
///
/// # Errors
///
/// Returns an error if the DDL statement fails
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

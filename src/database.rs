use crate::error::ApiError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DatabasePool = Pool<Postgres>;

pub async fn create_connection_pool(database_url: &str) -> Result<DatabasePool, ApiError> {
    let pool = sqlx::PgPool::connect(database_url).await?;

    // Run database migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Connect at process start without making a down database fatal: on
/// failure the pool degrades to lazy connections, the HTTP surface still
/// boots, and checks fail with a persistence error until the database is
/// reachable again.
pub async fn connect_with_fallback(database_url: &str) -> Result<DatabasePool, ApiError> {
    match create_connection_pool(database_url).await {
        Ok(pool) => Ok(pool),
        Err(err) => {
            tracing::error!(
                error = %err,
                "database connection failed at startup; checks will fail until it is reachable"
            );
            Ok(PgPoolOptions::new().connect_lazy(database_url)?)
        }
    }
}

pub async fn health_check(pool: &DatabasePool) -> Result<(), ApiError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Run database migrations
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), ApiError> {
    tracing::info!("Running database migrations...");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            tracing::info!("Database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Database migration failed: {}", e);
            Err(ApiError::Migration(e))
        }
    }
}

// Note: connection tests require a PostgreSQL instance available via DATABASE_URL

use app_state::constants;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Pool, Postgres};
use std::time::Duration;
use tracing::info;

/// Run migrations and get a database connection pool.
pub async fn get_db_pool(database_url: &str) -> color_eyre::Result<Pool<Postgres>> {
    let db = &constants().database;
    info!("Connecting to database.");
    let pool = PgPoolOptions::new()
        .max_connections(db.max_connections)
        .min_connections(db.min_connections)
        .max_lifetime(Duration::from_secs(db.max_lifetime))
        .idle_timeout(Duration::from_secs(db.idle_timeout))
        .acquire_timeout(Duration::from_secs(db.acquire_timeout))
        .test_before_acquire(true)
        .connect(database_url)
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

async fn run_migrations(pool: &PgPool) -> color_eyre::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

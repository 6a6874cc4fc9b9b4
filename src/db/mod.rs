use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Open the connection pool for the announcement and teacher tables.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Apply the schema migrations embedded from ./migrations/ (idempotent,
/// runs on every startup).
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

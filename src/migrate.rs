use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    create_schema(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Create the `research_reports` table and its indexes. Idempotent.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    // key_metrics holds a JSON object: metric name -> {Value, Explanation, Description}
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS research_reports (
            id TEXT PRIMARY KEY,
            title TEXT,
            company_name TEXT,
            timestamp TEXT,
            pdf_url TEXT,
            key_metrics TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_research_reports_company ON research_reports(company_name)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

//! SQLite-backed [`Store`] implementation.
//!
//! Reads the `research_reports` table created by [`crate::migrate`]. The
//! `key_metrics` column holds a JSON object; rows where it is missing,
//! empty, `{}` or `null` never match a query.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::warn;

use crate::models::{parse_metrics, DocumentId, RawDocument};
use crate::query::{CompanyFilter, DocumentQuery};

use super::Store;

/// Ids bound per statement, below SQLite's default variable limit.
const ID_BATCH: usize = 500;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_document(row: &SqliteRow) -> Option<RawDocument> {
    match read_row(row) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("Skipping unreadable stored document: {}", e);
            None
        }
    }
}

fn read_row(row: &SqliteRow) -> sqlx::Result<Option<RawDocument>> {
    let raw_id: String = row.try_get("id")?;
    let id = match raw_id.parse::<DocumentId>() {
        Ok(id) => id,
        Err(e) => {
            warn!("Skipping stored document with invalid id {}: {}", raw_id, e);
            return Ok(None);
        }
    };

    let metrics_json: Option<String> = row.try_get("key_metrics")?;
    let metrics = match metrics_json.as_deref().map(parse_metrics) {
        Some(Ok(m)) => Some(m),
        Some(Err(e)) => {
            warn!("Skipping document {}: key metrics are not a JSON object: {}", id, e);
            return Ok(None);
        }
        None => None,
    };

    Ok(Some(RawDocument {
        id,
        title: row.try_get("title")?,
        company_name: row.try_get("company_name")?,
        timestamp: row.try_get("timestamp")?,
        pdf_url: row.try_get("pdf_url")?,
        metrics,
    }))
}

#[async_trait]
impl Store for SqliteStore {
    async fn find_documents(&self, query: &DocumentQuery) -> Result<Vec<RawDocument>> {
        let ids: Vec<&DocumentId> = query.ids.iter().collect();
        let mut docs = Vec::new();

        for batch in ids.chunks(ID_BATCH) {
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
                "SELECT id, title, company_name, timestamp, pdf_url, key_metrics \
                 FROM research_reports \
                 WHERE key_metrics IS NOT NULL \
                 AND key_metrics NOT IN ('', '{}', 'null') \
                 AND id IN (",
            );
            let mut separated = qb.separated(", ");
            for id in batch {
                separated.push_bind(id.to_string());
            }
            separated.push_unseparated(")");

            if let CompanyFilter::Named(name) = &query.company {
                qb.push(" AND company_name = ");
                qb.push_bind(name.clone());
            }
            qb.push(" ORDER BY id");

            let rows = qb.build().fetch_all(&self.pool).await?;
            docs.extend(rows.iter().filter_map(row_to_document));
        }

        Ok(docs)
    }

    async fn company_names(&self) -> Result<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT company_name FROM research_reports \
             WHERE company_name IS NOT NULL AND company_name != '' \
             ORDER BY company_name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }
}

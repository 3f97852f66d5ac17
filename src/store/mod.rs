//! Storage abstraction for research documents.
//!
//! The [`Store`] trait is the read-only boundary to document storage. It
//! needs set membership on the primary key, equality on `company_name`, and
//! existence of the key-metrics field; both backends express that directly.
//!
//! | Backend | Use |
//! |---------|-----|
//! | [`sqlite::SqliteStore`] | The `research_reports` table via sqlx |
//! | [`memory::InMemoryStore`] | Tests and embedding without a database |

pub mod memory;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::RawDocument;
use crate::query::DocumentQuery;

#[async_trait]
pub trait Store: Send + Sync {
    /// Return every stored document matching `query`, with full bodies.
    ///
    /// Order is unspecified; [`crate::query::find_documents`] sorts.
    async fn find_documents(&self, query: &DocumentQuery) -> Result<Vec<RawDocument>>;

    /// Distinct company names present in storage, sorted ascending.
    async fn company_names(&self) -> Result<Vec<String>>;
}

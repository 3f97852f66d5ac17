//! In-memory [`Store`] implementation for tests and embedding.
//!
//! Documents live in a `Vec` behind `std::sync::RwLock`; every lookup is a
//! linear scan.

use std::collections::BTreeSet;
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::RawDocument;
use crate::query::DocumentQuery;

use super::Store;

pub struct InMemoryStore {
    docs: RwLock<Vec<RawDocument>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }

    /// Insert a document, replacing any existing one with the same id.
    pub fn insert(&self, doc: RawDocument) -> Result<()> {
        let mut docs = self
            .docs
            .write()
            .map_err(|_| anyhow!("document store lock poisoned"))?;
        docs.retain(|d| d.id != doc.id);
        docs.push(doc);
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<RawDocument> for InMemoryStore {
    fn from_iter<I: IntoIterator<Item = RawDocument>>(iter: I) -> Self {
        Self {
            docs: RwLock::new(iter.into_iter().collect()),
        }
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn find_documents(&self, query: &DocumentQuery) -> Result<Vec<RawDocument>> {
        let docs = self
            .docs
            .read()
            .map_err(|_| anyhow!("document store lock poisoned"))?;
        Ok(docs
            .iter()
            .filter(|d| query.ids.contains(&d.id))
            .filter(|d| d.has_metrics())
            .filter(|d| query.company.matches(d.company_name.as_deref()))
            .cloned()
            .collect())
    }

    async fn company_names(&self) -> Result<Vec<String>> {
        let docs = self
            .docs
            .read()
            .map_err(|_| anyhow!("document store lock poisoned"))?;
        let names: BTreeSet<String> = docs
            .iter()
            .filter_map(|d| d.company_name.clone())
            .collect();
        Ok(names.into_iter().collect())
    }
}

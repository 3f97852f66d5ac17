//! Document query construction and execution.
//!
//! A [`DocumentQuery`] is the logical lookup
//! `{ id ∈ allowed ids, key metrics present, [company_name == selected] }`.
//! Backends implement it through [`Store::find_documents`]; this module adds
//! the parts every backend shares: the empty allow-list short-circuit,
//! default filling, and a deterministic order by identifier.

use anyhow::Result;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

use crate::models::{DocumentId, ResearchDocument};
use crate::store::Store;

/// Selector label meaning "no company filter".
pub const ALL_COMPANIES: &str = "All Companies";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CompanyFilter {
    #[default]
    All,
    Named(String),
}

impl CompanyFilter {
    /// Interpret a selector value. Blank input and the `All Companies`
    /// sentinel both clear the filter.
    pub fn from_selection(selection: &str) -> Self {
        let selection = selection.trim();
        if selection.is_empty() || selection == ALL_COMPANIES {
            CompanyFilter::All
        } else {
            CompanyFilter::Named(selection.to_string())
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            CompanyFilter::All => None,
            CompanyFilter::Named(name) => Some(name),
        }
    }

    /// Exact, case-sensitive match against a stored company name.
    pub fn matches(&self, company_name: Option<&str>) -> bool {
        match self {
            CompanyFilter::All => true,
            CompanyFilter::Named(name) => company_name == Some(name.as_str()),
        }
    }
}

impl fmt::Display for CompanyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompanyFilter::All => f.write_str("all companies"),
            CompanyFilter::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
    pub ids: BTreeSet<DocumentId>,
    pub company: CompanyFilter,
}

impl DocumentQuery {
    pub fn new<I>(ids: I, company: CompanyFilter) -> Self
    where
        I: IntoIterator<Item = DocumentId>,
    {
        Self {
            ids: ids.into_iter().collect(),
            company,
        }
    }
}

/// Run `query` against `store`, returning normalized documents sorted by id.
pub async fn find_documents<S>(store: &S, query: &DocumentQuery) -> Result<Vec<ResearchDocument>>
where
    S: Store + ?Sized,
{
    if query.ids.is_empty() {
        debug!("empty allow-list, skipping storage lookup");
        return Ok(Vec::new());
    }

    let raw = store.find_documents(query).await?;
    let mut docs: Vec<ResearchDocument> = raw
        .into_iter()
        .filter(|d| {
            query.ids.contains(&d.id)
                && d.has_metrics()
                && query.company.matches(d.company_name.as_deref())
        })
        .map(|d| d.normalize())
        .collect();
    docs.sort_by(|a, b| a.id.cmp(&b.id));
    docs.dedup_by(|a, b| a.id == b.id);

    debug!(
        "query matched {} of {} allowed ids for {}",
        docs.len(),
        query.ids.len(),
        query.company
    );
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricEntry, Metrics, RawDocument};
    use crate::store::memory::InMemoryStore;

    fn id(n: u8) -> DocumentId {
        format!("{:024x}", n).parse().unwrap()
    }

    fn metrics() -> Metrics {
        let mut m = Metrics::new();
        m.insert(
            "Revenue".to_string(),
            MetricEntry {
                value: Some("10".into()),
                ..Default::default()
            },
        );
        m
    }

    fn raw(n: u8, company: &str, with_metrics: bool) -> RawDocument {
        RawDocument {
            id: id(n),
            title: Some(format!("Report {}", n)),
            company_name: Some(company.to_string()),
            metrics: with_metrics.then(metrics),
            ..Default::default()
        }
    }

    #[test]
    fn test_company_filter_from_selection() {
        assert_eq!(CompanyFilter::from_selection("All Companies"), CompanyFilter::All);
        assert_eq!(CompanyFilter::from_selection("  "), CompanyFilter::All);
        assert_eq!(
            CompanyFilter::from_selection(" Acme Corp "),
            CompanyFilter::Named("Acme Corp".into())
        );
    }

    #[test]
    fn test_company_filter_is_case_sensitive() {
        let filter = CompanyFilter::Named("Acme Corp".into());
        assert!(filter.matches(Some("Acme Corp")));
        assert!(!filter.matches(Some("acme corp")));
        assert!(!filter.matches(None));
        assert!(CompanyFilter::All.matches(None));
    }

    #[tokio::test]
    async fn test_company_filter_selects_only_that_company() {
        let store = InMemoryStore::new();
        store.insert(raw(1, "Acme Corp", true)).unwrap();
        store.insert(raw(2, "Other", true)).unwrap();

        let query = DocumentQuery::new(
            vec![id(1), id(2)],
            CompanyFilter::Named("Acme Corp".into()),
        );
        let docs = find_documents(&store, &query).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id(1));
    }

    #[tokio::test]
    async fn test_requires_allow_list_and_metrics() {
        let store = InMemoryStore::new();
        store.insert(raw(1, "Acme Corp", true)).unwrap();
        store.insert(raw(2, "Acme Corp", false)).unwrap();
        store.insert(raw(3, "Acme Corp", true)).unwrap();

        let query = DocumentQuery::new(vec![id(1), id(2)], CompanyFilter::All);
        let docs = find_documents(&store, &query).await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec![id(1)]);
    }

    #[tokio::test]
    async fn test_empty_allow_list_yields_nothing() {
        let store = InMemoryStore::new();
        store.insert(raw(1, "Acme Corp", true)).unwrap();

        let docs = find_documents(&store, &DocumentQuery::default()).await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_results_sorted_by_id() {
        let store = InMemoryStore::new();
        for n in [9, 3, 7, 1] {
            store.insert(raw(n, "Acme Corp", true)).unwrap();
        }

        let query = DocumentQuery::new(vec![id(7), id(1), id(9), id(3)], CompanyFilter::All);
        let docs = find_documents(&store, &query).await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec![id(1), id(3), id(7), id(9)]);
    }
}

//! Browsing session state.
//!
//! [`SessionState`] holds everything one user session mutates: the selected
//! company, the current result list, the cursor and the metrics search text.
//! Transitions are applied with [`SessionState::apply`] and never touch
//! storage; [`Browser`] performs the I/O (loading inputs, querying the store)
//! and feeds the outcome back in as [`Event::Results`].

use anyhow::{bail, Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use crate::cursor::{NavigationCursor, NavigationError};
use crate::loaders::{CompanySource, IdSource};
use crate::metrics::{filter_metrics, MetricView};
use crate::models::{DocumentId, ResearchDocument};
use crate::query::{find_documents, CompanyFilter, DocumentQuery};
use crate::store::Store;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A fresh result list for `company`.
    Results {
        company: CompanyFilter,
        documents: Vec<ResearchDocument>,
    },
    Previous,
    Next,
    /// 1-based position.
    JumpTo(usize),
    Search(String),
    ClearSearch,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    company: CompanyFilter,
    results: Vec<ResearchDocument>,
    cursor: NavigationCursor,
    search: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event. On error the state is left as it was.
    pub fn apply(&mut self, event: Event) -> Result<(), NavigationError> {
        match event {
            Event::Results { company, documents } => {
                self.company = company;
                self.cursor.reset(documents.len());
                self.results = documents;
            }
            Event::Previous => self.cursor.previous(),
            Event::Next => self.cursor.next(),
            Event::JumpTo(position) => self.cursor.jump_to(position)?,
            Event::Search(text) => self.search = text,
            Event::ClearSearch => self.search.clear(),
        }
        Ok(())
    }

    /// Builder form of [`apply`](Self::apply) for infallible events.
    pub fn with_results(mut self, company: CompanyFilter, documents: Vec<ResearchDocument>) -> Self {
        self.company = company;
        self.cursor.reset(documents.len());
        self.results = documents;
        self
    }

    pub fn company(&self) -> &CompanyFilter {
        &self.company
    }

    pub fn results(&self) -> &[ResearchDocument] {
        &self.results
    }

    pub fn cursor(&self) -> &NavigationCursor {
        &self.cursor
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn current(&self) -> Option<&ResearchDocument> {
        self.cursor.current().and_then(|i| self.results.get(i))
    }

    /// Metrics of the current document narrowed by the search text.
    pub fn metrics_view(&self) -> Option<MetricView<'_>> {
        self.current()
            .map(|doc| filter_metrics(&doc.metrics, &self.search))
    }
}

/// A session bound to a store and its input sources.
pub struct Browser<S, P> {
    store: S,
    sources: P,
    ids: Vec<DocumentId>,
    companies: Vec<String>,
    timeout: Duration,
    state: SessionState,
}

impl<S, P> Browser<S, P>
where
    S: Store,
    P: IdSource + CompanySource,
{
    /// Load the allow-list and company directory, then run the first query.
    pub async fn open(store: S, sources: P, company: CompanyFilter, timeout: Duration) -> Result<Self> {
        let companies = sources.load_companies()?;
        let ids = sources.load_ids();
        info!(
            "loaded {} document ids and {} companies",
            ids.len(),
            companies.len()
        );

        let mut browser = Self {
            store,
            sources,
            ids,
            companies,
            timeout,
            state: SessionState::new(),
        };
        browser.select_company(company).await?;
        Ok(browser)
    }

    /// Re-run the document query for `company` and install the results.
    pub async fn select_company(&mut self, company: CompanyFilter) -> Result<()> {
        if let Some(name) = company.name() {
            if !self.companies.iter().any(|c| c == name) {
                bail!("Unknown company: {}", name);
            }
        }

        let query = DocumentQuery::new(self.ids.iter().cloned(), company.clone());
        let documents = tokio::time::timeout(self.timeout, find_documents(&self.store, &query))
            .await
            .with_context(|| format!("Document query timed out after {:?}", self.timeout))??;

        if documents.is_empty() {
            warn!("No documents found for {}", company);
        }

        self.state
            .apply(Event::Results { company, documents })
            .map_err(anyhow::Error::from)
    }

    /// Re-read the identifier allow-list and re-run the current query.
    pub async fn reload(&mut self) -> Result<()> {
        self.ids = self.sources.load_ids();
        let company = self.state.company().clone();
        self.select_company(company).await
    }

    pub fn apply(&mut self, event: Event) -> Result<(), NavigationError> {
        self.state.apply(event)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::StaticSource;
    use crate::models::{MetricEntry, Metrics, RawDocument};
    use crate::store::memory::InMemoryStore;

    fn id(n: u8) -> DocumentId {
        format!("{:024x}", n).parse().unwrap()
    }

    fn doc(n: u8, company: &str) -> RawDocument {
        let mut metrics = Metrics::new();
        for name in ["EPS", "Revenue", "Net Margin"] {
            metrics.insert(name.to_string(), MetricEntry::default());
        }
        RawDocument {
            id: id(n),
            title: Some(format!("Report {}", n)),
            company_name: Some(company.to_string()),
            metrics: Some(metrics),
            ..Default::default()
        }
    }

    fn documents(count: u8) -> Vec<ResearchDocument> {
        (1..=count).map(|n| doc(n, "Acme Corp").normalize()).collect()
    }

    async fn browser() -> Browser<InMemoryStore, StaticSource> {
        let store: InMemoryStore = vec![
            doc(1, "Acme Corp"),
            doc(2, "Other"),
            doc(3, "Acme Corp"),
            doc(4, "Other"),
            doc(5, "Other"),
        ]
        .into_iter()
        .collect();
        let sources = StaticSource {
            ids: (1..=5).map(id).collect(),
            companies: vec!["Other".into(), "Acme Corp".into()],
        };
        Browser::open(store, sources, CompanyFilter::All, Duration::from_secs(5))
            .await
            .unwrap()
    }

    #[test]
    fn test_empty_session_has_nothing_to_show() {
        let mut state = SessionState::new().with_results(CompanyFilter::All, Vec::new());
        assert!(state.current().is_none());
        assert!(state.metrics_view().is_none());
        state.apply(Event::Next).unwrap();
        assert_eq!(state.apply(Event::JumpTo(1)), Err(NavigationError::Empty));
    }

    #[test]
    fn test_navigation_events() {
        let mut state = SessionState::new().with_results(CompanyFilter::All, documents(5));
        state.apply(Event::JumpTo(5)).unwrap();
        state.apply(Event::Next).unwrap();
        assert_eq!(state.current().unwrap().id, id(5));
        state.apply(Event::Previous).unwrap();
        assert_eq!(state.cursor().position(), Some((4, 5)));
    }

    #[test]
    fn test_failed_jump_keeps_position() {
        let mut state = SessionState::new().with_results(CompanyFilter::All, documents(3));
        state.apply(Event::JumpTo(2)).unwrap();
        assert!(state.apply(Event::JumpTo(9)).is_err());
        assert_eq!(state.cursor().current(), Some(1));
    }

    #[test]
    fn test_smaller_results_reset_cursor() {
        let mut state = SessionState::new().with_results(CompanyFilter::All, documents(5));
        state.apply(Event::JumpTo(5)).unwrap();
        state
            .apply(Event::Results {
                company: CompanyFilter::Named("Acme Corp".into()),
                documents: documents(2),
            })
            .unwrap();
        assert_eq!(state.cursor().current(), Some(0));
        assert_eq!(state.company().name(), Some("Acme Corp"));
    }

    #[test]
    fn test_search_filters_current_metrics_and_survives_navigation() {
        let mut state = SessionState::new().with_results(CompanyFilter::All, documents(2));
        state.apply(Event::Search("re".into())).unwrap();
        state.apply(Event::Next).unwrap();
        let view = state.metrics_view().unwrap();
        assert_eq!(view.names(), vec!["Revenue"]);
        assert_eq!(view.total, 3);

        state.apply(Event::ClearSearch).unwrap();
        assert_eq!(state.metrics_view().unwrap().shown(), 3);
    }

    #[tokio::test]
    async fn test_browser_company_selection() {
        let mut browser = browser().await;
        assert_eq!(browser.state().results().len(), 5);
        assert_eq!(browser.companies(), ["Acme Corp", "Other"]);

        browser.apply(Event::JumpTo(4)).unwrap();
        browser
            .select_company(CompanyFilter::Named("Acme Corp".into()))
            .await
            .unwrap();
        let ids: Vec<_> = browser.state().results().iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec![id(1), id(3)]);
        assert_eq!(browser.state().cursor().current(), Some(0));
    }

    #[tokio::test]
    async fn test_browser_rejects_unknown_company() {
        let mut browser = browser().await;
        assert!(browser
            .select_company(CompanyFilter::Named("Nope".into()))
            .await
            .is_err());
        assert_eq!(browser.state().company(), &CompanyFilter::All);
    }
}

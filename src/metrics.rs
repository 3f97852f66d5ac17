//! Key-metrics search.

use crate::models::{MetricEntry, Metrics};

/// Metrics passing a search, sorted by name, plus the unfiltered count.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricView<'a> {
    pub entries: Vec<(&'a str, &'a MetricEntry)>,
    pub total: usize,
}

impl<'a> MetricView<'a> {
    pub fn shown(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn names(&self) -> Vec<&'a str> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }
}

/// Keep the metrics whose name contains `query`, ignoring case. An empty
/// query keeps everything.
pub fn filter_metrics<'a>(metrics: &'a Metrics, query: &str) -> MetricView<'a> {
    let needle = query.to_lowercase();
    let mut entries: Vec<(&str, &MetricEntry)> = metrics
        .iter()
        .filter(|(name, _)| needle.is_empty() || name.to_lowercase().contains(&needle))
        .map(|(name, entry)| (name.as_str(), entry))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    MetricView {
        entries,
        total: metrics.len(),
    }
}

//! Plain-text rendering of the browsing session.

use chrono::DateTime;
use std::fmt::Write;

use crate::metrics::MetricView;
use crate::models::ResearchDocument;
use crate::session::SessionState;

pub const NO_DOCUMENTS: &str = "No documents found for the selected criteria.";
pub const NO_PDF: &str = "No PDF URL available for this document.";
pub const NO_METRICS: &str = "No key metrics data available for this document.";
pub const NO_METRIC_MATCH: &str = "No metrics match your search term.";

/// Make a stored PDF location openable: anything without a `scheme://`
/// prefix gets `http://`.
pub fn resolve_pdf_url(url: &str) -> String {
    let url = url.trim();
    if has_scheme(url) {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

/// RFC 3986 scheme: a letter, then letters, digits, `+`, `-` or `.`.
fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// RFC 3339 timestamps are shortened to `YYYY-MM-DD HH:MM`; anything else is
/// shown as stored.
pub fn format_timestamp(ts: &str) -> String {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| ts.to_string())
}

/// `Found N documents for ...` or the empty-result notice.
pub fn render_summary(state: &SessionState) -> String {
    let total = state.results().len();
    if total == 0 {
        NO_DOCUMENTS.to_string()
    } else {
        format!("Found {} documents for {}.", total, state.company())
    }
}

/// One line per document, 1-based, current one marked with `>`.
pub fn render_list(state: &SessionState) -> String {
    let mut out = String::new();
    let current = state.cursor().current();
    for (i, doc) in state.results().iter().enumerate() {
        let marker = if Some(i) == current { ">" } else { " " };
        let _ = writeln!(
            out,
            "{}{:>4}  {}  {:<24}  {:<16}  {}",
            marker,
            i + 1,
            doc.id,
            truncate(&doc.company_name, 24),
            format_timestamp(&doc.timestamp),
            doc.title
        );
    }
    out
}

/// Full view of the current document: header, PDF link and metrics panel.
pub fn render_current(state: &SessionState) -> String {
    let (Some(doc), Some((position, total))) = (state.current(), state.cursor().position()) else {
        return format!("{}\n", NO_DOCUMENTS);
    };

    let mut out = String::new();
    let cursor = state.cursor();
    let edge = match (cursor.at_start(), cursor.at_end()) {
        (true, true) => "",
        (true, false) => "  (first)",
        (false, true) => "  (last)",
        (false, false) => "",
    };
    let _ = writeln!(out, "Document {} of {}{}", position, total, edge);
    out.push_str(&render_document(doc));
    out.push('\n');
    out.push_str(&render_metrics_panel(
        doc,
        state.metrics_view(),
        state.search(),
    ));
    out
}

fn render_document(doc: &ResearchDocument) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", doc.title);
    let _ = writeln!(out, "Company: {}", doc.company_name);
    let _ = writeln!(out, "Date:    {}", format_timestamp(&doc.timestamp));
    let _ = writeln!(out, "ID:      {}...", doc.id.short());
    match &doc.pdf_url {
        Some(url) => {
            let _ = writeln!(out, "PDF:     {}", resolve_pdf_url(url));
        }
        None => {
            let _ = writeln!(out, "PDF:     {}", NO_PDF);
        }
    }
    out
}

fn render_metrics_panel(doc: &ResearchDocument, view: Option<MetricView<'_>>, search: &str) -> String {
    let mut out = String::from("-- Key Metrics --\n");

    let view = match view {
        Some(v) if !doc.metrics.is_empty() => v,
        _ => {
            let _ = writeln!(out, "{}", NO_METRICS);
            return out;
        }
    };

    if !search.is_empty() {
        let _ = writeln!(out, "Search: {}", search);
    }
    let _ = writeln!(out, "Showing {} of {} metrics", view.shown(), view.total);

    if view.is_empty() {
        let _ = writeln!(out, "{}", NO_METRIC_MATCH);
        return out;
    }

    for (name, entry) in &view.entries {
        let _ = writeln!(out, "\n[{}]", name);
        if let Some(value) = &entry.value {
            let _ = writeln!(out, "  Value:       {}", value);
        }
        if let Some(explanation) = &entry.explanation {
            let _ = writeln!(out, "  Explanation: {}", explanation);
        }
        if let Some(description) = &entry.description {
            let _ = writeln!(out, "  Description: {}", description);
        }
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

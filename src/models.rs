//! Core data models used throughout Research Explorer.
//!
//! Documents arrive from storage as [`RawDocument`] rows with every field
//! optional. [`RawDocument::normalize`] is the one place where defaults are
//! filled in, so the rest of the crate works with a fully populated
//! [`ResearchDocument`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_TITLE: &str = "No Title";
pub const UNKNOWN: &str = "Unknown";

/// Length of a document identifier in hex characters (12 bytes).
pub const ID_HEX_LEN: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("identifier is empty")]
    Empty,
    #[error("expected 24 hex characters, got {0}")]
    Length(usize),
    #[error("invalid hex character {0:?}")]
    NonHex(char),
}

/// Opaque 24-hex-character document identifier.
///
/// Stored in canonical lowercase form, so two ids that differ only in case
/// compare equal and sort the same way.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First ten characters, for compact display.
    pub fn short(&self) -> &str {
        &self.0[..10]
    }
}

impl FromStr for DocumentId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdParseError::Empty);
        }
        if let Some(bad) = s.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(IdParseError::NonHex(bad));
        }
        if s.len() != ID_HEX_LEN {
            return Err(IdParseError::Length(s.len()));
        }
        Ok(DocumentId(s.to_ascii_lowercase()))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        DocumentId("0".repeat(ID_HEX_LEN))
    }
}

/// One entry of a document's key-metrics mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MetricEntry {
    #[serde(
        rename = "Value",
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
    #[serde(
        rename = "Explanation",
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub explanation: Option<String>,
    #[serde(
        rename = "Description",
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

/// Accepts any JSON scalar as text. Null and empty strings become `None`.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let text = match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    };
    Ok(text.filter(|s| !s.trim().is_empty()))
}

/// Parsed key-metrics mapping, keyed by metric name.
pub type Metrics = BTreeMap<String, MetricEntry>;

/// Parse a stored key-metrics JSON object.
///
/// Only a column that is not a JSON object is an error. Entries are read one
/// by one: an entry whose value is not an object is kept under its name with
/// no fields, so the document still lists it.
pub fn parse_metrics(json: &str) -> serde_json::Result<Metrics> {
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
    let mut metrics = Metrics::new();
    for (name, value) in map {
        let entry = if value.is_object() {
            match serde_json::from_value::<MetricEntry>(value) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Metric {} is unreadable: {}", name, e);
                    MetricEntry::default()
                }
            }
        } else {
            warn!("Metric {} is not an object, showing it without details", name);
            MetricEntry::default()
        };
        metrics.insert(name, entry);
    }
    Ok(metrics)
}

/// A document row exactly as it comes out of storage.
#[derive(Debug, Clone, Default)]
pub struct RawDocument {
    pub id: DocumentId,
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub timestamp: Option<String>,
    pub pdf_url: Option<String>,
    pub metrics: Option<Metrics>,
}

/// A research report with every display field populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearchDocument {
    pub id: DocumentId,
    pub title: String,
    pub company_name: String,
    pub timestamp: String,
    pub pdf_url: Option<String>,
    pub metrics: Metrics,
}

impl RawDocument {
    /// Whether this row would pass the "has metrics" part of the query.
    pub fn has_metrics(&self) -> bool {
        self.metrics.as_ref().is_some_and(|m| !m.is_empty())
    }

    pub fn normalize(self) -> ResearchDocument {
        ResearchDocument {
            id: self.id,
            title: non_empty(self.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            company_name: non_empty(self.company_name).unwrap_or_else(|| UNKNOWN.to_string()),
            timestamp: non_empty(self.timestamp).unwrap_or_else(|| UNKNOWN.to_string()),
            pdf_url: non_empty(self.pdf_url),
            metrics: self.metrics.unwrap_or_default(),
        }
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_id() {
        let id: DocumentId = "507f1f77bcf86cd799439011".parse().unwrap();
        assert_eq!(id.as_str(), "507f1f77bcf86cd799439011");
        assert_eq!(id.short(), "507f1f77bc");
    }

    #[test]
    fn test_parse_id_trims_and_lowercases() {
        let id: DocumentId = "  507F1F77BCF86CD799439011\n".parse().unwrap();
        assert_eq!(id.to_string(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn test_parse_invalid_ids() {
        assert_eq!("".parse::<DocumentId>(), Err(IdParseError::Empty));
        assert_eq!("   ".parse::<DocumentId>(), Err(IdParseError::Empty));
        assert_eq!(
            "not-an-id".parse::<DocumentId>(),
            Err(IdParseError::NonHex('n'))
        );
        assert_eq!("abc123".parse::<DocumentId>(), Err(IdParseError::Length(6)));
        assert!("507f1f77bcf86cd7994390111".parse::<DocumentId>().is_err());
    }

    #[test]
    fn test_metric_entry_accepts_scalars_and_drops_empty() {
        let metrics = parse_metrics(
            r#"{
                "EPS": {"Value": 2.5, "Explanation": "", "Description": null},
                "Guidance": {"Value": "raised", "Explanation": "beat consensus"}
            }"#,
        )
        .unwrap();
        let eps = &metrics["EPS"];
        assert_eq!(eps.value.as_deref(), Some("2.5"));
        assert_eq!(eps.explanation, None);
        assert_eq!(eps.description, None);
        assert_eq!(
            metrics["Guidance"].explanation.as_deref(),
            Some("beat consensus")
        );
    }

    #[test]
    fn test_non_object_metric_does_not_drop_the_others() {
        let metrics =
            parse_metrics(r#"{"Revenue": {"Value": "12%"}, "Note": "see page 4"}"#).unwrap();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics["Revenue"].value.as_deref(), Some("12%"));
        assert_eq!(metrics["Note"], MetricEntry::default());

        assert!(parse_metrics("[1, 2]").is_err());
        assert!(parse_metrics("\"text\"").is_err());
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let raw = RawDocument {
            id: "507f191e810c19729de860ea".parse().unwrap(),
            title: Some("  ".to_string()),
            pdf_url: Some(String::new()),
            ..Default::default()
        };
        assert!(!raw.has_metrics());
        let doc = raw.normalize();
        assert_eq!(doc.title, DEFAULT_TITLE);
        assert_eq!(doc.company_name, UNKNOWN);
        assert_eq!(doc.timestamp, UNKNOWN);
        assert_eq!(doc.pdf_url, None);
        assert!(doc.metrics.is_empty());
    }
}

//! Identifier allow-list and company directory loading.
//!
//! Both inputs are line-delimited text files produced outside this tool.
//! The identifier file is live data: a missing file or a malformed line is
//! logged and tolerated. The company file is deployment configuration: if it
//! cannot be read, loading fails.
//!
//! [`IdSource`] and [`CompanySource`] let the browsing session take its
//! inputs from something other than files (see [`StaticSource`]).

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{error, warn};

use crate::models::DocumentId;

/// Result of parsing an identifier list.
#[derive(Debug, Default)]
pub struct IdLoad {
    /// Valid identifiers, in input order.
    pub ids: Vec<DocumentId>,
    /// Non-blank lines that failed to parse, trimmed.
    pub rejected: Vec<String>,
}

pub fn ids_file_path(results_dir: &Path, version: &str) -> PathBuf {
    results_dir
        .join(format!("Results_{}", version))
        .join(format!("processed_ids_{}.txt", version))
}

/// Load the identifier allow-list. Never fails: problems are logged and
/// whatever could be read is returned.
pub fn load_object_ids(path: &Path) -> Vec<DocumentId> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            error!("Can't find the file {}: {}", path.display(), e);
            return Vec::new();
        }
    };
    parse_object_ids(BufReader::new(file)).ids
}

pub fn parse_object_ids<R: BufRead>(reader: R) -> IdLoad {
    let mut load = IdLoad::default();

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("Stopped reading identifiers: {}", e);
                break;
            }
        };
        let doc_id = line.trim();
        if doc_id.is_empty() {
            continue;
        }
        match doc_id.parse::<DocumentId>() {
            Ok(id) => load.ids.push(id),
            Err(e) => {
                warn!("ID {} isn't valid: {}", doc_id, e);
                load.rejected.push(doc_id.to_string());
            }
        }
    }

    load
}

/// Load the company directory: trimmed, deduplicated, sorted ascending.
pub fn load_companies(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open company file: {}", path.display()))?;
    parse_companies(BufReader::new(file))
        .with_context(|| format!("Failed to read company file: {}", path.display()))
}

pub fn parse_companies<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut companies = BTreeSet::new();
    for line in reader.lines() {
        let line = line?;
        let company = line.trim();
        if !company.is_empty() {
            companies.insert(company.to_string());
        }
    }
    Ok(companies.into_iter().collect())
}

/// Provider of the identifier allow-list.
pub trait IdSource {
    fn load_ids(&self) -> Vec<DocumentId>;
}

/// Provider of the company directory.
pub trait CompanySource {
    fn load_companies(&self) -> Result<Vec<String>>;
}

/// File-backed sources, resolved from the `[sources]` config section.
#[derive(Debug, Clone)]
pub struct FileSources {
    pub ids_file: PathBuf,
    pub company_file: PathBuf,
}

impl FileSources {
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            ids_file: config.sources.ids_file(),
            company_file: config.sources.company_file.clone(),
        }
    }
}

impl IdSource for FileSources {
    fn load_ids(&self) -> Vec<DocumentId> {
        load_object_ids(&self.ids_file)
    }
}

impl CompanySource for FileSources {
    fn load_companies(&self) -> Result<Vec<String>> {
        load_companies(&self.company_file)
    }
}

/// Fixed in-memory sources.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pub ids: Vec<DocumentId>,
    pub companies: Vec<String>,
}

impl IdSource for StaticSource {
    fn load_ids(&self) -> Vec<DocumentId> {
        self.ids.clone()
    }
}

impl CompanySource for StaticSource {
    fn load_companies(&self) -> Result<Vec<String>> {
        let set: BTreeSet<String> = self
            .companies
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        Ok(set.into_iter().collect())
    }
}

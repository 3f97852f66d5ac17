use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable holding the storage connection string.
pub const DATABASE_URL_ENV: &str = "REX_DATABASE_URL";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    /// Fallback connection string when `REX_DATABASE_URL` is unset.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourcesConfig {
    /// Directory containing the `Results_<version>` folders.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_company_file")]
    pub company_file: PathBuf,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            version: default_version(),
            company_file: default_company_file(),
        }
    }
}

fn default_results_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_version() -> String {
    "1.03.01".to_string()
}
fn default_company_file() -> PathBuf {
    PathBuf::from("company_sample.txt")
}

impl SourcesConfig {
    /// `<results_dir>/Results_<version>/processed_ids_<version>.txt`
    pub fn ids_file(&self) -> PathBuf {
        crate::loaders::ids_file_path(&self.results_dir, &self.version)
    }
}

impl Config {
    /// Resolve the connection string: environment first, then the config file.
    pub fn database_url(&self) -> Result<String> {
        resolve_database_url(std::env::var(DATABASE_URL_ENV).ok(), self.db.url.as_deref())
    }
}

fn resolve_database_url(env_value: Option<String>, configured: Option<&str>) -> Result<String> {
    env_value
        .filter(|v| !v.trim().is_empty())
        .or_else(|| configured.map(str::to_string))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No database connection string: set {} or [db].url in the config file",
                DATABASE_URL_ENV
            )
        })
}

/// Load `.env` (if present) and the TOML config file.
pub fn load_config(path: &Path) -> Result<Config> {
    dotenvy::dotenv().ok();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.sources.version.trim().is_empty() {
        anyhow::bail!("sources.version must not be empty");
    }

    if config.db.timeout_secs == 0 {
        anyhow::bail!("db.timeout_secs must be > 0");
    }

    Ok(config)
}

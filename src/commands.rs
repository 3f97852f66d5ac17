//! CLI entry points for `rex companies`, `list`, `show` and `browse`.
//!
//! Each command opens one SQLite pool, builds a [`Browser`] over the
//! configured id and company files, prints, and closes the pool.

use anyhow::{Context, Result};
use std::time::Duration;

use crate::browse::run_browse;
use crate::config::Config;
use crate::db;
use crate::loaders::FileSources;
use crate::query::CompanyFilter;
use crate::render::{render_current, render_list, render_summary};
use crate::session::{Browser, Event};
use crate::store::sqlite::SqliteStore;
use crate::store::Store;

async fn open_browser(config: &Config, company: Option<&str>) -> Result<Browser<SqliteStore, FileSources>> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool);
    let sources = FileSources::from_config(config);
    let company = company
        .map(CompanyFilter::from_selection)
        .unwrap_or_default();
    Browser::open(
        store,
        sources,
        company,
        Duration::from_secs(config.db.timeout_secs),
    )
    .await
}

pub async fn run_companies(config: &Config, stored: bool) -> Result<()> {
    let companies = if stored {
        let pool = db::connect(config).await?;
        let store = SqliteStore::new(pool);
        let names = store.company_names().await?;
        store.pool().close().await;
        names
    } else {
        crate::loaders::load_companies(&config.sources.company_file)?
    };

    for company in companies {
        println!("{}", company);
    }
    Ok(())
}

pub async fn run_list(config: &Config, company: Option<&str>) -> Result<()> {
    let browser = open_browser(config, company).await?;
    println!("{}", render_summary(browser.state()));
    print!("{}", render_list(browser.state()));
    browser.store().pool().close().await;
    Ok(())
}

pub async fn run_show(
    config: &Config,
    position: usize,
    company: Option<&str>,
    search: Option<String>,
) -> Result<()> {
    let mut browser = open_browser(config, company).await?;
    browser
        .apply(Event::JumpTo(position))
        .with_context(|| format!("Cannot show document #{}", position))?;
    if let Some(text) = search {
        browser.apply(Event::Search(text))?;
    }
    print!("{}", render_current(browser.state()));
    browser.store().pool().close().await;
    Ok(())
}

pub async fn run_browse_stdin(config: &Config, company: Option<&str>) -> Result<()> {
    let mut browser = open_browser(config, company).await?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_browse(&mut browser, stdin.lock(), &mut stdout).await?;
    browser.store().pool().close().await;
    Ok(())
}

//! Interactive browsing loop (`rex browse`).
//!
//! Reads one command per line and re-renders after every change, the way a
//! page re-renders after each widget interaction.

use anyhow::Result;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::loaders::{CompanySource, IdSource};
use crate::query::CompanyFilter;
use crate::render::{render_current, render_list, render_summary};
use crate::session::{Browser, Event};
use crate::store::Store;

pub const HELP: &str = "\
Commands:
  n, next              next document
  p, prev              previous document
  g, goto <N>          jump to document N (1-based)
  / <text>, search <text>
                       filter metrics by name; `/` alone clears the search
  c, company [NAME]    select a company; no name selects all companies
  companies            list the company directory
  l, list              list the current result set
  r, reload            re-read the document id list and query again
  s, show              show the current document again
  h, help              this help
  q, quit              exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Previous,
    Goto(usize),
    Search(String),
    Company(CompanyFilter),
    Companies,
    List,
    Reload,
    Show,
    Help,
    Quit,
}

impl FromStr for BrowseCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix('/') {
            return Ok(BrowseCommand::Search(rest.trim().to_string()));
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "n" | "next" => Ok(BrowseCommand::Next),
            "p" | "prev" | "previous" => Ok(BrowseCommand::Previous),
            "g" | "goto" => rest
                .parse::<usize>()
                .map(BrowseCommand::Goto)
                .map_err(|_| format!("expected a document number, got '{}'", rest)),
            "search" => Ok(BrowseCommand::Search(rest.to_string())),
            "c" | "company" => Ok(BrowseCommand::Company(CompanyFilter::from_selection(rest))),
            "companies" => Ok(BrowseCommand::Companies),
            "l" | "list" => Ok(BrowseCommand::List),
            "r" | "reload" => Ok(BrowseCommand::Reload),
            "s" | "show" | "" => Ok(BrowseCommand::Show),
            "h" | "help" | "?" => Ok(BrowseCommand::Help),
            "q" | "quit" | "exit" => Ok(BrowseCommand::Quit),
            other => Err(format!("unknown command '{}'", other)),
        }
    }
}

/// Drive `browser` from `input` until `quit` or end of input.
pub async fn run_browse<S, P, R, W>(browser: &mut Browser<S, P>, input: R, out: &mut W) -> Result<()>
where
    S: Store,
    P: IdSource + CompanySource,
    R: BufRead,
    W: Write,
{
    writeln!(out, "{}", render_summary(browser.state()))?;
    write!(out, "{}", render_current(browser.state()))?;

    for line in input.lines() {
        let line = line?;
        let command = match line.parse::<BrowseCommand>() {
            Ok(c) => c,
            Err(e) => {
                writeln!(out, "Error: {}\n{}", e, HELP)?;
                continue;
            }
        };

        let outcome: Result<()> = match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => {
                writeln!(out, "{}", HELP)?;
                continue;
            }
            BrowseCommand::Companies => {
                for company in browser.companies() {
                    writeln!(out, "{}", company)?;
                }
                continue;
            }
            BrowseCommand::List => {
                writeln!(out, "{}", render_summary(browser.state()))?;
                write!(out, "{}", render_list(browser.state()))?;
                continue;
            }
            BrowseCommand::Show => Ok(()),
            BrowseCommand::Next => browser.apply(Event::Next).map_err(Into::into),
            BrowseCommand::Previous => browser.apply(Event::Previous).map_err(Into::into),
            BrowseCommand::Goto(n) => browser.apply(Event::JumpTo(n)).map_err(Into::into),
            BrowseCommand::Search(text) if text.is_empty() => {
                browser.apply(Event::ClearSearch).map_err(Into::into)
            }
            BrowseCommand::Search(text) => browser.apply(Event::Search(text)).map_err(Into::into),
            BrowseCommand::Company(company) => match browser.select_company(company).await {
                Ok(()) => {
                    writeln!(out, "{}", render_summary(browser.state()))?;
                    Ok(())
                }
                Err(e) => Err(e),
            },
            BrowseCommand::Reload => match browser.reload().await {
                Ok(()) => {
                    writeln!(out, "{}", render_summary(browser.state()))?;
                    Ok(())
                }
                Err(e) => Err(e),
            },
        };

        match outcome {
            Ok(()) => write!(out, "{}", render_current(browser.state()))?,
            Err(e) => writeln!(out, "Error: {:#}", e)?,
        }
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::StaticSource;
    use crate::models::{DocumentId, MetricEntry, Metrics, RawDocument};
    use crate::store::memory::InMemoryStore;
    use std::io::Cursor;
    use std::time::Duration;

    fn id(n: u8) -> DocumentId {
        format!("{:024x}", n).parse().unwrap()
    }

    async fn browser() -> Browser<InMemoryStore, StaticSource> {
        let store: InMemoryStore = [(1, "Acme Corp"), (2, "Other"), (3, "Acme Corp")]
            .into_iter()
            .map(|(n, company)| {
                let mut metrics = Metrics::new();
                metrics.insert("Revenue".into(), MetricEntry::default());
                metrics.insert("EPS".into(), MetricEntry::default());
                RawDocument {
                    id: id(n),
                    title: Some(format!("Report {}", n)),
                    company_name: Some(company.into()),
                    metrics: Some(metrics),
                    ..Default::default()
                }
            })
            .collect();
        let sources = StaticSource {
            ids: (1..=3).map(id).collect(),
            companies: vec!["Acme Corp".into(), "Other".into()],
        };
        Browser::open(store, sources, CompanyFilter::All, Duration::from_secs(5))
            .await
            .unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("n".parse::<BrowseCommand>(), Ok(BrowseCommand::Next));
        assert_eq!(" PREV ".parse::<BrowseCommand>(), Ok(BrowseCommand::Previous));
        assert_eq!("g 3".parse::<BrowseCommand>(), Ok(BrowseCommand::Goto(3)));
        assert_eq!("goto   12".parse::<BrowseCommand>(), Ok(BrowseCommand::Goto(12)));
        assert!("g x".parse::<BrowseCommand>().is_err());
        assert_eq!(
            "/ net margin".parse::<BrowseCommand>(),
            Ok(BrowseCommand::Search("net margin".into()))
        );
        assert_eq!("/".parse::<BrowseCommand>(), Ok(BrowseCommand::Search(String::new())));
        assert_eq!(
            "company Acme Corp".parse::<BrowseCommand>(),
            Ok(BrowseCommand::Company(CompanyFilter::Named("Acme Corp".into())))
        );
        assert_eq!("c".parse::<BrowseCommand>(), Ok(BrowseCommand::Company(CompanyFilter::All)));
        assert_eq!(
            "c All Companies".parse::<BrowseCommand>(),
            Ok(BrowseCommand::Company(CompanyFilter::All))
        );
        assert_eq!("".parse::<BrowseCommand>(), Ok(BrowseCommand::Show));
        assert!("frobnicate".parse::<BrowseCommand>().is_err());
    }

    #[tokio::test]
    async fn test_browse_session_script() {
        let mut browser = browser().await;
        let input = Cursor::new("n\nn\nn\n/ rev\nc Acme Corp\ng 5\nq\nn\n");
        let mut out = Vec::new();
        run_browse(&mut browser, input, &mut out).await.unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.starts_with("Found 3 documents for all companies."));
        assert!(out.contains("Document 3 of 3"));
        assert!(out.contains("Showing 1 of 2 metrics"));
        assert!(out.contains("Found 2 documents for Acme Corp."));
        assert!(out.contains("Error: document #5 is out of range (1-2)"));

        // cursor was on #3, which no longer exists after the company change
        assert_eq!(browser.state().cursor().position(), Some((1, 2)));
        assert_eq!(browser.state().search(), "rev");
    }

    #[tokio::test]
    async fn test_browse_unknown_company_is_reported() {
        let mut browser = browser().await;
        let mut out = Vec::new();
        run_browse(&mut browser, Cursor::new("c Nope\n"), &mut out)
            .await
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Error: Unknown company: Nope"));
        assert_eq!(browser.state().results().len(), 3);
    }
}

//! # Research Explorer CLI (`rex`)
//!
//! ## Usage
//!
//! ```bash
//! rex --config ./config/rex.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rex init` | Create the SQLite schema |
//! | `rex companies` | Print the company directory |
//! | `rex list` | List documents matching the id list and company |
//! | `rex show <N>` | Render document N with its key metrics |
//! | `rex browse` | Interactive browsing session on stdin |
//!
//! The storage connection string comes from `REX_DATABASE_URL` (a `.env`
//! file is honored) or `[db].url` in the config file. Log verbosity follows
//! `RUST_LOG` (default `info`); logs go to stderr.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use research_explorer::{commands, config, migrate};

/// Research Explorer — browse research reports and their key metrics.
#[derive(Parser)]
#[command(
    name = "rex",
    about = "Research Explorer — browse research reports and their key metrics",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/rex.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the `research_reports` table. Safe to run repeatedly.
    Init,

    /// Print the company directory, sorted and deduplicated.
    Companies {
        /// List the distinct company names found in storage instead.
        #[arg(long)]
        stored: bool,
    },

    /// List the documents matching the id list and company filter.
    List {
        /// Company to filter by; omit or pass "All Companies" for all.
        #[arg(long)]
        company: Option<String>,
    },

    /// Render one document with its key metrics.
    Show {
        /// 1-based position in the result list.
        position: usize,

        #[arg(long)]
        company: Option<String>,

        /// Only show metrics whose name contains this text (case-insensitive).
        #[arg(long)]
        search: Option<String>,
    },

    /// Interactive session: navigate, search metrics, switch company.
    ///
    /// Reads commands from stdin; type `help` for the list.
    Browse {
        #[arg(long)]
        company: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Companies { stored } => {
            commands::run_companies(&cfg, stored).await?;
        }
        Commands::List { company } => {
            commands::run_list(&cfg, company.as_deref()).await?;
        }
        Commands::Show {
            position,
            company,
            search,
        } => {
            commands::run_show(&cfg, position, company.as_deref(), search).await?;
        }
        Commands::Browse { company } => {
            commands::run_browse_stdin(&cfg, company.as_deref()).await?;
        }
    }

    Ok(())
}

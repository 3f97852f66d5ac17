//! # Research Explorer
//!
//! Browse research-report documents and their key metrics from the terminal.
//!
//! A processing stage outside this tool writes the ids of the documents it
//! has handled to `Results_<version>/processed_ids_<version>.txt`. Research
//! Explorer loads that allow-list and a company directory, queries the
//! document store for matching reports that carry key metrics, and lets the
//! user page through them and search each report's metrics.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌──────────┐
//! │  id list +   │──▶│ DocumentQuery │──▶│  Store   │
//! │  companies   │   │               │   │ (SQLite) │
//! └──────────────┘   └───────────────┘   └────┬─────┘
//!                                             ▼
//!                  ┌──────────────────────────────────┐
//!                  │ SessionState: cursor + search    │
//!                  └────────────────┬─────────────────┘
//!                                   ▼
//!                            ┌────────────┐
//!                            │ CLI (rex)  │
//!                            └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export REX_DATABASE_URL=sqlite:./data/research.sqlite
//! rex init                          # create the schema
//! rex companies                     # company directory
//! rex list --company "Acme Corp"    # matching documents
//! rex show 2 --search margin        # one document, metrics filtered
//! rex browse                        # interactive session
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and connection string |
//! | [`models`] | Document ids, documents, metric entries |
//! | [`loaders`] | Id allow-list and company directory |
//! | [`query`] | Query construction and execution |
//! | [`store`] | Storage trait, SQLite and in-memory backends |
//! | [`cursor`] | Navigation cursor |
//! | [`metrics`] | Metrics search |
//! | [`session`] | Session state machine and [`session::Browser`] |
//! | [`render`] | Text rendering |
//! | [`browse`] | Interactive loop |
//! | [`commands`] | CLI entry points |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |

pub mod browse;
pub mod commands;
pub mod config;
pub mod cursor;
pub mod db;
pub mod loaders;
pub mod metrics;
pub mod migrate;
pub mod models;
pub mod query;
pub mod render;
pub mod session;
pub mod store;

//! # MIP Search
//!
//! Text search and fuzzy PDF lookup over a local document collection.
//!
//! Two independent collections are configured: a corpus of plain-text
//! documents that is scanned line by line, and a directory of PDF
//! artifacts whose filenames are fuzzy-matched against a query. Both are
//! exposed through a CLI and an HTTP server. Nothing is indexed; every
//! query reads the collections as they are on disk.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Text corpus  │──▶│  Line search │──▶│              │
//! │  (*.txt)     │   │  (normalize) │   │ render (JSON │
//! └──────────────┘   └──────────────┘   │   / HTML)    │
//! ┌──────────────┐   ┌──────────────┐   │              │
//! │ PDF folder   │──▶│ Fuzzy match  │──▶│              │
//! │  (*.pdf)     │   │ (similarity) │   └──────┬───────┘
//! └──────────────┘   └──────────────┘          │
//!                               ┌──────────────┤
//!                               ▼              ▼
//!                          ┌─────────┐   ┌──────────┐
//!                          │   CLI   │   │   HTTP   │
//!                          └─────────┘   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! mip-search sources                      # check both collections
//! mip-search search "work visa"           # line search over the corpus
//! mip-search pdf "work visa" --policy best
//! mip-search serve                        # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Query validation errors |
//! | [`models`] | Core data types |
//! | [`normalize`] | Case and accent folding |
//! | [`similarity`] | Sequence similarity ratios |
//! | [`traits`] | Corpus and artifact provider traits |
//! | [`connector_fs`] | Filesystem providers |
//! | [`memory`] | In-memory providers |
//! | [`search`] | Line-level document search |
//! | [`artifacts`] | Fuzzy PDF filename matching |
//! | [`render`] | JSON and HTML output |
//! | [`server`] | HTTP server |
//! | [`sources`] | Collection health listing |

pub mod artifacts;
pub mod config;
pub mod connector_fs;
pub mod error;
pub mod memory;
pub mod models;
pub mod normalize;
pub mod render;
pub mod search;
pub mod server;
pub mod similarity;
pub mod sources;
pub mod traits;

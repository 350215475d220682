//! # MIP Search CLI (`mip-search`)
//!
//! Searches the text corpus, resolves PDFs by fuzzy filename match, and
//! starts the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! mip-search --config ./config/mip.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `mip-search search "<query>"` | Line search over the text corpus |
//! | `mip-search pdf "<query>"` | Fuzzy PDF filename lookup |
//! | `mip-search sources` | Show both collections and their status |
//! | `mip-search serve` | Start the HTTP server |
//!
//! Logs go to stderr, so `--json` output on stdout can be piped.
//! `RUST_LOG` overrides the log level.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mip_search::{artifacts, config, search, server, sources};

/// MIP Search: text search and fuzzy PDF lookup over a local document collection.
#[derive(Parser)]
#[command(name = "mip-search", version)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/mip.toml`. Built-in defaults are used when
    /// the default file does not exist.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Log at info level instead of warn.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

const DEFAULT_CONFIG: &str = "./config/mip.toml";

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Search the text corpus.
    ///
    /// Prints every line whose case- and accent-folded text contains the
    /// query, grouped by document.
    Search {
        /// The search query string.
        query: String,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Find PDFs whose filename resembles the query.
    Pdf {
        /// The query string.
        query: String,

        /// Matching policy: `best` (single closest filename) or `multi`
        /// (every filename partially matching any query word).
        #[arg(long, default_value = "multi")]
        policy: String,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the configured collections and whether they are reachable.
    Sources,

    /// Start the HTTP server.
    ///
    /// Binds to the address configured in `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose || matches!(cli.command, Commands::Serve) {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = if cli.config == PathBuf::from(DEFAULT_CONFIG) && !cli.config.exists() {
        tracing::info!("no config at {}, using defaults", DEFAULT_CONFIG);
        config::Config::default()
    } else {
        config::load_config(&cli.config)?
    };

    match cli.command {
        Commands::Search { query, json } => {
            search::run_search(&cfg, &query, json)?;
        }
        Commands::Pdf {
            query,
            policy,
            json,
        } => {
            artifacts::run_resolve(&cfg, &query, &policy, json)?;
        }
        Commands::Sources => {
            sources::list_sources(&cfg)?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}

//! kbase: add, ingest and search documents in a local knowledge base.
//!
//! ```bash
//! kbase add --title "Water" "Boil water for at least one minute before drinking."
//! kbase ingest ./notes
//! kbase search "drinking water" -k 3
//! kbase stats
//! ```
//!
//! Settings come from `config.toml`, `config.<RUST_ENV>.toml` and `APP_*`
//! variables; results are printed as JSON on stdout, logs go to stderr.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use kbase_cli::api::{self, AddTextRequest, SearchRequest};
use kbase_cli::ingest::ingest_dir;
use kbase_core::config::Config;
use kbase_hybrid::KnowledgeBase;

/// Local semantic search over plain-text documents.
#[derive(Parser)]
#[command(name = "kbase", version, about)]
struct Cli {
    /// Index file (overrides `retrieval.index_path`)
    #[arg(long, global = true)]
    index: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add one document from an argument or a file
    Add {
        #[arg(long)]
        title: Option<String>,
        /// Read the document text from this file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Document text
        #[arg(required_unless_present = "file")]
        text: Option<String>,
    },
    /// Add every .txt file under a directory
    Ingest {
        dir: PathBuf,
        /// Hide the progress bar
        #[arg(long)]
        quiet: bool,
    },
    /// Top documents for a query
    Search {
        query: String,
        #[arg(short, long)]
        k: Option<usize>,
    },
    /// Index size
    Stats,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().context("loading config")?;
    let mut settings = config.retrieval().context("reading [retrieval] settings")?;
    if let Some(index) = cli.index {
        settings.index_path = index;
    }
    let kb = KnowledgeBase::open_with_settings(settings).context("opening knowledge base")?;

    match cli.command {
        Command::Add { title, file, text } => {
            let text = match (file, text) {
                (Some(path), _) => fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?,
                (None, Some(text)) => text,
                (None, None) => anyhow::bail!("either TEXT or --file is required"),
            };
            let mut request = AddTextRequest::new(text);
            request.title = title;
            print_json(&api::add_text(&kb, request)?)?;
        }
        Command::Ingest { dir, quiet } => {
            let report = ingest_dir(&kb, &dir, !quiet)?;
            print_json(&serde_json::json!({ "report": report, "stats": api::stats(&kb)? }))?;
        }
        Command::Search { query, k } => {
            print_json(&api::search(&kb, &SearchRequest::new(query, k))?)?;
        }
        Command::Stats => print_json(&api::stats(&kb)?)?,
    }
    Ok(())
}

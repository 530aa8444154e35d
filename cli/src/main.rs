use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use docsearch_cli::{build_server, read_documents, read_queries, run_match, run_queries};
use docsearch_core::request_queue::REQUEST_WINDOW;
use docsearch_core::{DocumentStatus, ExecutionMode};
use tracing_subscriber::{fmt, EnvFilter};

use std::io::{self, Write};
use std::path::Path;

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Load documents into an in-memory TF-IDF index and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LoadArgs {
    /// Input path (JSON/JSONL file or directory)
    #[arg(long)]
    input: String,
    /// Space-separated stop words
    #[arg(long, env = "DOCSEARCH_STOP_WORDS", default_value = "")]
    stop_words: String,
    /// Remove documents whose word sets duplicate an earlier document
    #[arg(long, default_value_t = false)]
    dedup: bool,
    /// Run ranking and matching on the rayon pool
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl From<StatusArg> for DocumentStatus {
    fn from(s: StatusArg) -> Self {
        match s {
            StatusArg::Actual => DocumentStatus::Actual,
            StatusArg::Irrelevant => DocumentStatus::Irrelevant,
            StatusArg::Banned => DocumentStatus::Banned,
            StatusArg::Removed => DocumentStatus::Removed,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the top documents for each query
    Search {
        #[command(flatten)]
        load: LoadArgs,
        /// File with one query per line, run after the positional queries
        #[arg(long)]
        queries: Option<String>,
        /// Only rank documents with this status
        #[arg(long, value_enum, default_value_t = StatusArg::Actual)]
        status: StatusArg,
        /// Number of recent requests tracked for the empty-result count
        #[arg(long, default_value_t = REQUEST_WINDOW)]
        window: usize,
        query: Vec<String>,
    },
    /// Print the matched words of every document for one query
    Match {
        #[command(flatten)]
        load: LoadArgs,
        query: String,
    },
}

fn mode(parallel: bool) -> ExecutionMode {
    if parallel { ExecutionMode::Parallel } else { ExecutionMode::Sequential }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Search { load, queries, status, window, mut query } => {
            if let Some(path) = queries {
                query.extend(read_queries(Path::new(&path))?);
            }
            let docs = read_documents(Path::new(&load.input))?;
            let (server, _) = build_server(&load.stop_words, docs, load.dedup)?;
            let empty = run_queries(&server, &query, status.into(), mode(load.parallel), window, &mut out)?;
            tracing::info!(requests = query.len(), empty, "queries finished");
        }
        Commands::Match { load, query } => {
            let docs = read_documents(Path::new(&load.input))?;
            let (server, _) = build_server(&load.stop_words, docs, load.dedup)?;
            run_match(&server, &query, mode(load.parallel), &mut out)?;
        }
    }
    out.flush()?;
    Ok(())
}

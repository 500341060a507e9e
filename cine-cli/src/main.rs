//! CineGraph CLI - movie knowledge graph with semantic search
//!
//! Loads a small movie dataset into an embedded Kùzu graph, enriches every
//! movie with a summary embedding and answers traversal and similarity
//! queries over it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use cine_store::DEFAULT_SIMILARITY_LIMIT;
use commands::cast::DEFAULT_TITLE;
use commands::eda::DEFAULT_BEFORE_YEAR;
use commands::run::RunOptions;
use commands::search::DEFAULT_QUERY;
use commands::Settings;
use config::{CineConfig, EmbeddingOverrides};
use output::{OutputConfig, OutputFormat};

/// Movie knowledge graph with semantic search.
#[derive(Parser)]
#[command(name = "cinegraph")]
#[command(author, version)]
#[command(about = "Movie knowledge graph with semantic search")]
#[command(propagate_version = true)]
#[command(after_help = "Quick Start:
  cinegraph                      Build the graph and run the sample queries
  cinegraph search \"heist\"       Movies similar to a text query
  cinegraph cast --title Dune    Actors and characters of a movie
  cinegraph stats                Row counts per table

Offline mode:
  cinegraph --provider hash --dimension 64")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Config file (default: ./cinegraph.toml if present)
    #[arg(long, global = true, env = "CINEGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Graph database path
    #[arg(long, global = true, env = "CINEGRAPH_DB")]
    db: Option<PathBuf>,

    /// Directory holding the CSV files
    #[arg(long, global = true, env = "CINEGRAPH_DATA")]
    data: Option<PathBuf>,

    #[command(flatten)]
    embeddings: EmbeddingArgs,
}

#[derive(Args)]
struct EmbeddingArgs {
    /// Embedding provider: openai or hash (offline)
    #[arg(long, global = true, env = "CINEGRAPH_PROVIDER")]
    provider: Option<String>,

    /// Embedding model name
    #[arg(long, global = true, env = "CINEGRAPH_MODEL")]
    model: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(long, global = true, env = "CINEGRAPH_ENDPOINT")]
    endpoint: Option<String>,

    /// Embedding vector length
    #[arg(long, global = true, env = "CINEGRAPH_DIMENSION")]
    dimension: Option<usize>,

    /// API key for the openai provider
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

impl From<EmbeddingArgs> for EmbeddingOverrides {
    fn from(args: EmbeddingArgs) -> Self {
        Self {
            provider: args.provider,
            model: args.model,
            endpoint: args.endpoint,
            dimension: args.dimension,
            api_key: args.api_key,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the graph from CSV, embed summaries and run the sample queries
    Run {
        /// Movie for the cast traversal
        #[arg(long, default_value = DEFAULT_TITLE)]
        title: String,

        /// Text for the similarity search
        #[arg(long, default_value = DEFAULT_QUERY)]
        query: String,

        /// Maximum similar movies to return
        #[arg(short = 'n', long = "limit", default_value_t = DEFAULT_SIMILARITY_LIMIT)]
        limit: usize,
    },

    /// Find movies whose summaries are similar to a text
    Search {
        /// Search text
        query: String,

        /// Maximum results to return
        #[arg(short = 'n', long = "limit", default_value_t = DEFAULT_SIMILARITY_LIMIT)]
        limit: usize,
    },

    /// List actors of a movie with the characters they played
    Cast {
        /// Movie title
        #[arg(long, default_value = DEFAULT_TITLE)]
        title: String,
    },

    /// Show row counts for every table
    Stats,

    /// Show movies from the CSV released before a given year
    Eda {
        /// Release-year cutoff (exclusive)
        #[arg(long, default_value_t = DEFAULT_BEFORE_YEAR)]
        before: i64,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env values feed the `env = ...` fallbacks below
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);
    if let Ok(path) = dotenv {
        tracing::debug!("loaded environment from {}", path.display());
    }

    let config = CineConfig::load(cli.config.as_deref())?;

    // Resolve output format: CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });

    if let Some(use_color) = config.use_color() {
        colored::control::set_override(use_color);
    }

    let settings = Settings {
        db_path: config.database_path(cli.db.as_deref()),
        data_dir: config.data_dir(cli.data.as_deref()),
        embeddings: config.embedding_config(&cli.embeddings.into())?,
        output: OutputConfig::auto_detect(format),
    };
    tracing::debug!(?settings, "resolved settings");

    // No subcommand runs the whole workflow with its defaults
    let command = cli.command.unwrap_or(Commands::Run {
        title: DEFAULT_TITLE.to_string(),
        query: DEFAULT_QUERY.to_string(),
        limit: DEFAULT_SIMILARITY_LIMIT,
    });

    match command {
        Commands::Run {
            title,
            query,
            limit,
        } => commands::run::run(&settings, &RunOptions { title, query, limit }).await,
        Commands::Search { query, limit } => commands::search::run(&settings, &query, limit).await,
        Commands::Cast { title } => commands::cast::run(&settings, &title),
        Commands::Stats => commands::stats::run(&settings),
        Commands::Eda { before } => commands::eda::run(&settings, before),
    }
}

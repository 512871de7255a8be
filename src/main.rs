use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use meaning_graph::{cli, config, server};

#[derive(Parser)]
#[command(
    name = "meaning-graph",
    version,
    about = "Similarity graphs over meaning-journal nodes"
)]
struct Cli {
    /// Config file (defaults to ~/.meaning-graph/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the similarity graph and print it as JSON
    Graph {
        /// Node owner (defaults to storage.default_owner)
        #[arg(long)]
        owner: Option<String>,
        /// Use the fullscreen symbol size
        #[arg(long)]
        fullscreen: bool,
        /// Use long labels (`--detailed=false` forces compact labels)
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        detailed: Option<bool>,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Show node and edge statistics
    Stats {
        #[arg(long)]
        owner: Option<String>,
    },
    /// Import nodes from a JSON file
    Import {
        file: PathBuf,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Export active nodes as JSON to stdout
    Export {
        #[arg(long)]
        owner: Option<String>,
    },
    /// Soft-delete a node
    Forget { id: String },
    /// Serve graphs over HTTP
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let config = match args.config {
        Some(ref path) => config::MeaningGraphConfig::load_from(path)?,
        None => config::MeaningGraphConfig::load()?,
    };

    // Log to stderr so stdout stays clean for JSON output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Graph {
            owner,
            fullscreen,
            detailed,
            pretty,
        } => cli::graph::graph(&config, owner.as_deref(), fullscreen, detailed, pretty)?,
        Command::Stats { owner } => cli::stats::stats(&config, owner.as_deref())?,
        Command::Import { file, owner } => cli::import::import(&config, &file, owner.as_deref())?,
        Command::Export { owner } => cli::export::export(&config, owner.as_deref())?,
        Command::Forget { id } => cli::forget(&config, &id)?,
        Command::Serve => server::serve(config).await?,
    }

    Ok(())
}

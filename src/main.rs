use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use verse_finder::{cli, config, server};

#[derive(Parser)]
#[command(name = "verse-finder", version, about = "Semantic search over Quran verses")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the web search form (HOST/PORT override the bind address)
    Serve,
    /// Search once from the terminal
    Search {
        /// Topic or question to search for
        query: String,
        /// Number of results (clamped to the configured maximum)
        #[arg(short = 'k', long)]
        top_k: Option<i64>,
    },
    /// Manage the embedding model
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
    /// Maintain the verse dataset file
    Dataset {
        #[command(subcommand)]
        action: DatasetAction,
    },
}

#[derive(Subcommand)]
enum ModelAction {
    /// Download the embedding model to ~/.verse-finder/models/
    Download,
}

#[derive(Subcommand)]
enum DatasetAction {
    /// Fetch the full text from api.alquran.cloud and merge it into the dataset
    Fetch,
    /// Show verse and surah counts
    Stats,
    /// Remove duplicate verses and sort by surah and ayah
    Tidy,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let config = config::VerseFinderConfig::load()?;

    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Serve => server::serve(config).await?,
        Command::Search { query, top_k } => cli::search::search(&config, &query, top_k).await?,
        Command::Model { action } => match action {
            ModelAction::Download => cli::model_download(&config.embedding).await?,
        },
        Command::Dataset { action } => match action {
            DatasetAction::Fetch => cli::dataset::fetch(&config).await?,
            DatasetAction::Stats => cli::dataset::stats(&config)?,
            DatasetAction::Tidy => cli::dataset::tidy(&config)?,
        },
    }

    Ok(())
}

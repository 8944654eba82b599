use anyhow::Result;
use boolsearch::{rebuild_index, run_session, SessionConfig, DEFAULT_COLLECTION, DEFAULT_INDEX};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "boolsearch")]
#[command(about = "Boolean keyword search over a Cranfield-format collection", long_about = None)]
struct Cli {
    /// Document collection path
    #[arg(long, global = true, default_value = DEFAULT_COLLECTION)]
    collection: PathBuf,
    /// Index snapshot path
    #[arg(long, global = true, default_value = DEFAULT_INDEX)]
    index: PathBuf,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build or load the index, then answer queries read from stdin (default)
    Query,
    /// Rebuild the index snapshot from the collection, replacing any existing one
    Build,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();
    let config = SessionConfig { collection: cli.collection, index: cli.index };

    match cli.command.unwrap_or(Commands::Query) {
        Commands::Query => run_session(&config, io::stdin().lock(), io::stdout().lock()),
        Commands::Build => {
            let index = rebuild_index(&config)?;
            let stats = index.stats();
            tracing::info!(terms = stats.terms, documents = stats.documents, path = %config.index.display(), "index rebuilt");
            Ok(())
        }
    }
}

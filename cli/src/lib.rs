use anyhow::{Context, Result};
use boolsearch_core::{
    build_from_collection, default_normalizer, format_results, read_collection, DocId, IndexStore, InvertedIndex, Query,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub const DEFAULT_COLLECTION: &str = "cran.all.1400";
pub const DEFAULT_INDEX: &str = "index-file.json";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Cranfield-format document collection
    pub collection: PathBuf,
    /// JSON index snapshot, created on first use
    pub index: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { collection: PathBuf::from(DEFAULT_COLLECTION), index: PathBuf::from(DEFAULT_INDEX) }
    }
}

fn build_index(config: &SessionConfig) -> boolsearch_core::Result<InvertedIndex> {
    let collection = read_collection(&config.collection)?;
    Ok(build_from_collection(&collection, default_normalizer()))
}

/// Load the snapshot if present, otherwise build it from the collection and persist it.
pub fn load_index(config: &SessionConfig) -> Result<InvertedIndex> {
    IndexStore::new(&config.index)
        .build_or_load(|| build_index(config))
        .with_context(|| format!("failed to prepare index {}", config.index.display()))
}

/// Rebuild from the collection, replacing any existing snapshot.
pub fn rebuild_index(config: &SessionConfig) -> Result<InvertedIndex> {
    IndexStore::new(&config.index)
        .rebuild(|| build_index(config))
        .with_context(|| format!("failed to rebuild index {}", config.index.display()))
}

/// Read query lines until end of input: words on a line are ANDed, lines are ORed.
pub fn answer<R: BufRead>(index: &InvertedIndex, input: R) -> Result<Vec<DocId>> {
    let lines = input.lines().collect::<io::Result<Vec<String>>>().context("failed to read queries")?;
    let query = Query::parse(&lines, default_normalizer());
    tracing::debug!(lines = query.lines.len(), "parsed query");
    Ok(query.evaluate(index))
}

pub fn run_session<R: BufRead, W: Write>(config: &SessionConfig, input: R, mut output: W) -> Result<()> {
    let index = load_index(config)?;
    let ids = answer(&index, input)?;
    tracing::info!(matches = ids.len(), "query answered");
    writeln!(output, "{}", format_results(&ids)).context("failed to write results")?;
    output.flush().context("failed to write results")?;
    Ok(())
}

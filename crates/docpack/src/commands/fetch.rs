//! Fetch external sources without generating anything.

use std::path::Path;

use anyhow::Result;
use docpack_sources::SourceFetcher;

use crate::config::load_config;

/// Run the fetch command and print the source summary as JSON.
pub async fn run(config_path: &Path, sources: String) -> Result<()> {
    let config = load_config(config_path)?;
    let fetcher = SourceFetcher::new(config.source_client()?);

    let result = tokio::select! {
        result = fetcher.fetch_all(Some(&sources)) => result,
        _ = tokio::signal::ctrl_c() => anyhow::bail!("Fetch cancelled"),
    };

    tracing::info!(
        "Fetched {} sources ({} failed), {} characters of context",
        result.fetched.len(),
        result.failed.len(),
        result.total_chars()
    );

    println!("{}", serde_json::to_string_pretty(&result.summary())?);

    Ok(())
}

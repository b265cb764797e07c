//! Documentation generation command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use docpack_core::{ChatCompletionGenerator, GenerateRequest, Pipeline};
use docpack_site::{archive_name, TemplateInstantiator, WriteOptions};
use docpack_sources::SourceFetcher;

use crate::config::load_config;

/// Run the generate command.
pub async fn run(
    config_path: &Path,
    request_path: PathBuf,
    output: Option<PathBuf>,
    minify: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let request = load_request(&request_path)?;

    let generator = ChatCompletionGenerator::new(config.chat_config()?)?;
    let fetcher = SourceFetcher::new(config.source_client()?);
    let templates = TemplateInstantiator::new(config.template_source());
    let pipeline = Pipeline::new(generator, fetcher, templates);

    tracing::info!("Generating documentation from {}...", request_path.display());

    let result = tokio::select! {
        result = pipeline.run(&request) => result?,
        _ = tokio::signal::ctrl_c() => anyhow::bail!("Generation cancelled, nothing was written"),
    };

    if let Some(summary) = &result.source_summary {
        for failed in &summary.failed {
            tracing::warn!("Source skipped: {} ({})", failed.url, failed.error);
        }
    }

    let project = request.project_name.as_deref().unwrap_or_default().trim();
    let output_dir = output
        .unwrap_or(config.output.dir)
        .join(archive_name(project));

    let options = WriteOptions {
        minify: minify || config.output.minify,
    };
    let written = result.bundle.write_to_dir(&output_dir, &options)?;

    tracing::info!(
        "Wrote {} files ({} bytes of content)",
        written,
        result.bundle.bundle().total_size()
    );
    tracing::info!("Output: {}", output_dir.display());

    Ok(())
}

/// Read a request from JSON, or TOML when the extension says so.
pub fn load_request(path: &Path) -> Result<GenerateRequest> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}

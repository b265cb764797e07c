//! Initialize docpack in the current directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use docpack_site::assets::BuiltinTemplates;

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing docpack...");

    init_in(Path::new("."), config_path, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Set GROQ_API_KEY, then run 'docpack generate request.json'.");

    Ok(())
}

/// Write the starter files into `root`, the config at `config_path` below it.
/// Existing files are kept unless `yes`.
pub fn init_in(root: &Path, config_path: &Path, yes: bool) -> Result<()> {
    write_unless_present(&root.join(config_path), DEFAULT_CONFIG, yes)?;
    write_unless_present(&root.join("request.json"), DEFAULT_REQUEST, yes)?;

    let templates_dir = root.join("templates");
    if templates_dir.exists() && !yes {
        tracing::warn!("templates/ directory already exists. Use --yes to overwrite.");
    } else {
        let written = BuiltinTemplates::new()
            .context("Failed to load built-in templates")?
            .write_to(&templates_dir)
            .context("Failed to write templates")?;
        tracing::info!("Created templates/ ({} files)", written);
    }

    Ok(())
}

fn write_unless_present(path: &Path, contents: &str, yes: bool) -> Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if path.exists() && !yes {
        tracing::warn!("{} already exists. Use --yes to overwrite.", name);
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", name))?;
    tracing::info!("Created {}", name);
    Ok(())
}

pub(crate) const DEFAULT_CONFIG: &str = r#"# docpack configuration

[generator]
# OpenAI-compatible chat completions endpoint
endpoint = "https://api.groq.com/openai/v1/chat/completions"
model = "llama-3.3-70b-versatile"

# Environment variable holding the API key
api_key_env = "GROQ_API_KEY"

max_tokens = 4096
timeout_secs = 120

[sources]
# Per-source fetch timeout
timeout_secs = 10
user_agent = "docpack-source-fetcher"

[templates]
# Remove to use the built-in templates
dir = "templates"

[output]
dir = "dist"
minify = false
"#;

pub(crate) const DEFAULT_REQUEST: &str = r##"{
  "projectName": "My Project",
  "description": "A short description of what the project does.",
  "codeInput": "fn main() {\n    println!(\"Hello, world!\");\n}",
  "sourcesInput": "",
  "repoUrl": "",
  "accentColor": "#D4AF37",
  "includeSidebar": true,
  "generateFullDocs": false,
  "audience": "developer",
  "toneStyle": "professional"
}
"##;

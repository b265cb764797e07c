//! `docpack.toml` loading.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use docpack_core::chat::{
    DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_GENERATOR_TIMEOUT, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL,
};
use docpack_core::ChatConfig;
use docpack_site::TemplateSource;
use docpack_sources::client::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use docpack_sources::HttpSourceClient;

/// Configuration file structure (docpack.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub sources: SourceSettings,
    #[serde(default)]
    pub templates: TemplateSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Deserialize)]
pub struct GeneratorSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_generator_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct SourceSettings {
    #[serde(default = "default_source_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct TemplateSettings {
    /// Directory with `with-sidebar/` and `without-sidebar/`; built-ins when unset
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output")]
    pub dir: PathBuf,
    #[serde(default)]
    pub minify: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}
fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}
fn default_generator_timeout() -> u64 {
    DEFAULT_GENERATOR_TIMEOUT.as_secs()
}
fn default_source_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_output() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_generator_timeout(),
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_source_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: default_output(),
            minify: false,
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    tracing::debug!("No config at {}, using defaults", path.display());
    Ok(ConfigFile::default())
}

impl ConfigFile {
    /// Generator connection settings; fails when the API key is not set.
    pub fn chat_config(&self) -> Result<ChatConfig> {
        let settings = &self.generator;
        let mut config = ChatConfig::from_env(&settings.api_key_env)?;
        config.endpoint = settings.endpoint.clone();
        config.model = settings.model.clone();
        config.max_tokens = settings.max_tokens;
        config.timeout = Duration::from_secs(settings.timeout_secs);
        Ok(config)
    }

    pub fn source_client(&self) -> Result<HttpSourceClient> {
        HttpSourceClient::with_options(
            Duration::from_secs(self.sources.timeout_secs),
            &self.sources.user_agent,
        )
        .context("Failed to build HTTP client")
    }

    pub fn template_source(&self) -> TemplateSource {
        match &self.templates.dir {
            Some(dir) => TemplateSource::Directory(dir.clone()),
            None => TemplateSource::Builtin,
        }
    }
}

//! Content generator backed by an OpenAI-compatible chat-completions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use crate::generator::{
    parse_generated_docs, ContentGenerator, GeneratedDocs, GenerationMode, GenerationRequest,
    GeneratorError,
};
use crate::prompts::{analysis_prompt, generation_prompt, single_file_prompt};

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_GENERATOR_TIMEOUT: Duration = Duration::from_secs(120);

/// Token limit for the outline step of full-package generation.
const ANALYSIS_MAX_TOKENS: u32 = 2048;

/// Error bodies are cut to this many characters before being reported.
const ERROR_BODY_CHARS: usize = 500;

/// Connection settings for [`ChatCompletionGenerator`].
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl ChatConfig {
    /// Default settings with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_GENERATOR_TIMEOUT,
        }
    }

    /// Default settings with the key read from `var`.
    pub fn from_env(var: &str) -> Result<Self, GeneratorError> {
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(GeneratorError::MissingApiKey(var.to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Generates documentation through a chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionGenerator {
    client: Client,
    config: ChatConfig,
}

impl ChatCompletionGenerator {
    pub fn new(config: ChatConfig) -> Result<Self, GeneratorError> {
        let mut headers = header::HeaderMap::new();
        let auth = header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| GeneratorError::Transport(format!("Invalid API key format: {}", e)))?;
        headers.insert(header::AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| GeneratorError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, GeneratorError> {
        let body = ChatRequest {
            model: &self.config.model,
            max_tokens,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(endpoint = %self.config.endpoint, model = %self.config.model, "POST chat completion");

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| GeneratorError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Status {
                status: status.as_u16(),
                body: text.chars().take(ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::Malformed(e.to_string()))?;

        first_content(parsed)
    }
}

fn first_content(response: ChatResponse) -> Result<String, GeneratorError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(GeneratorError::EmptyResponse)
}

#[async_trait]
impl ContentGenerator for ChatCompletionGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedDocs, GeneratorError> {
        let reply = match request.mode {
            GenerationMode::SingleFile => {
                tracing::info!(project = %request.project_name, "Generating README");
                self.complete(&single_file_prompt(request), self.config.max_tokens)
                    .await?
            }
            GenerationMode::FullPackage => {
                tracing::info!(project = %request.project_name, "Analyzing project structure");
                let analysis = self
                    .complete(&analysis_prompt(request), ANALYSIS_MAX_TOKENS)
                    .await?;

                tracing::info!(audience = %request.audience, "Generating documentation files");
                self.complete(&generation_prompt(request, &analysis), self.config.max_tokens)
                    .await?
            }
        };

        let docs = parse_generated_docs(&reply).inspect_err(|e| {
            tracing::warn!(error = %e, "Failed to parse generator reply");
        })?;

        tracing::info!(files = docs.files.len(), "Generation complete");
        Ok(docs)
    }
}

//! Content generator seam and the contract its output must satisfy.

use std::collections::BTreeMap;

use async_trait::async_trait;
#[cfg(any(test, feature = "mocks"))]
use mockall::automock;
use serde::{Deserialize, Serialize};

use docpack_site::{DocumentationFile, README};

use crate::request::{Audience, ToneStyle};

/// How much documentation to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationMode {
    /// Only `README.md`
    #[default]
    SingleFile,
    /// `README.md` plus the audience's topic files
    FullPackage,
}

/// Everything a generator needs to produce documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub project_name: String,
    /// Description, code and external sources, already composed
    pub context: String,
    pub audience: Audience,
    pub tone_style: ToneStyle,
    pub mode: GenerationMode,
}

/// Optional project analysis returned alongside the files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Analysis {
    pub structure: Vec<String>,
    pub summary: String,
    pub key_features: Vec<String>,
}

/// Generator output: markdown files keyed by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GeneratedDocs {
    pub files: BTreeMap<String, String>,
    #[serde(default)]
    pub analysis: Option<Analysis>,
}

/// Errors from a content generator.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("API key not configured: set {0}")]
    MissingApiKey(String),

    #[error("Request to content generator failed: {0}")]
    Transport(String),

    #[error("Content generator returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response format from content generator")]
    EmptyResponse,

    #[error("Failed to parse generated documentation: {0}")]
    Malformed(String),

    #[error("No documentation files were generated")]
    NoFiles,

    #[error("Generated documentation is missing README.md")]
    MissingReadme,
}

/// Produces markdown documentation from a composed context.
#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedDocs, GeneratorError>;
}

impl GeneratedDocs {
    /// Build docs from `(name, content)` pairs.
    pub fn from_files<I, N, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        Self {
            files: files
                .into_iter()
                .map(|(n, c)| (n.into(), c.into()))
                .collect(),
            analysis: None,
        }
    }

    /// Enforce the output contract and convert to documentation files.
    ///
    /// Single-file mode keeps only `README.md`.
    pub fn into_files(self, mode: GenerationMode) -> Result<Vec<DocumentationFile>, GeneratorError> {
        if self.files.is_empty() {
            return Err(GeneratorError::NoFiles);
        }
        if !self.files.contains_key(README) {
            return Err(GeneratorError::MissingReadme);
        }

        let files: Vec<DocumentationFile> = match mode {
            GenerationMode::FullPackage => self
                .files
                .into_iter()
                .map(|(name, content)| DocumentationFile::new(name, content))
                .collect(),
            GenerationMode::SingleFile => {
                if self.files.len() > 1 {
                    tracing::warn!(
                        extra = self.files.len() - 1,
                        "Single-file generation returned extra files, keeping README.md only"
                    );
                }
                self.files
                    .into_iter()
                    .filter(|(name, _)| name == README)
                    .map(|(name, content)| DocumentationFile::new(name, content))
                    .collect()
            }
        };

        Ok(files)
    }
}

/// Parse a generator reply that should contain a `{"files": ...}` object.
///
/// Models often wrap JSON in prose or code fences, so everything outside
/// the outermost braces is ignored.
pub fn parse_generated_docs(reply: &str) -> Result<GeneratedDocs, GeneratorError> {
    let span = match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => return Err(GeneratorError::Malformed("no JSON object in reply".to_string())),
    };

    serde_json::from_str(span).map_err(|e| GeneratorError::Malformed(e.to_string()))
}

/// Assemble the context handed to the generator.
pub fn compose_context(description: &str, code_input: &str, external: &str) -> String {
    let description = if description.trim().is_empty() {
        "No description provided"
    } else {
        description.trim()
    };

    let mut context = format!(
        "Description: {}\n\nCode/Project Information:\n```\n{}\n```",
        description, code_input
    );

    if !external.trim().is_empty() {
        context.push_str("\n\nExternal Sources:\n");
        context.push_str(external);
    }

    context
}

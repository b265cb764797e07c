//! End-to-end generation: request in, validated bundle out.

use serde::Serialize;

use docpack_site::{
    BundleError, ExportBundle, TemplateConfig, TemplateError, TemplateInstantiator,
    ValidatedBundle,
};
use docpack_sources::{SourceClient, SourceFetcher, SourceSummary};

use crate::generator::{compose_context, ContentGenerator, GenerationRequest, GeneratorError};
use crate::request::{GenerateRequest, RequestError};

/// Errors that abort a generation run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{0}")]
    InvalidRequest(#[from] RequestError),

    #[error("Generation failed: {0}")]
    Generation(#[from] GeneratorError),

    #[error("Server configuration error: {0}")]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Bundle(#[from] BundleError),
}

/// Result of a successful run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutput {
    pub bundle: ValidatedBundle,
    /// Present only when the request named external sources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_summary: Option<SourceSummary>,
}

/// Wires the fetcher, generator and templates together.
pub struct Pipeline<G, C> {
    generator: G,
    fetcher: SourceFetcher<C>,
    templates: TemplateInstantiator,
}

impl<G: ContentGenerator, C: SourceClient> Pipeline<G, C> {
    pub fn new(generator: G, fetcher: SourceFetcher<C>, templates: TemplateInstantiator) -> Self {
        Self {
            generator,
            fetcher,
            templates,
        }
    }

    /// Run one request through every stage.
    ///
    /// Source failures never abort the run; everything else does.
    pub async fn run(&self, request: &GenerateRequest) -> Result<GenerationOutput, PipelineError> {
        let request = request.validate()?;

        tracing::info!(
            project = %request.project_name,
            mode = ?request.mode,
            audience = %request.audience,
            tone = %request.tone_style,
            "Generation request"
        );

        let sources = match request.sources_input.as_deref() {
            Some(input) => Some(self.fetcher.fetch_all(Some(input)).await),
            None => None,
        };

        if let Some(sources) = &sources {
            tracing::info!(
                fetched = sources.fetched.len(),
                failed = sources.failed.len(),
                chars = sources.total_chars(),
                "External sources collected"
            );
        }

        let external = sources
            .as_ref()
            .map(|s| s.combined_context.as_str())
            .unwrap_or("");

        let generation = GenerationRequest {
            project_name: request.project_name.clone(),
            context: compose_context(&request.description, &request.code_input, external),
            audience: request.audience,
            tone_style: request.tone_style,
            mode: request.mode,
        };

        let docs = self.generator.generate(&generation).await?;
        let files = docs.into_files(request.mode)?;

        let templates = self.templates.instantiate(&TemplateConfig {
            project_name: request.project_name.clone(),
            repo_url: request.repo_url.clone(),
            theme_color: request.accent_color.clone(),
            include_sidebar: request.include_sidebar,
        })?;

        let bundle = ExportBundle::assemble(templates.html, templates.css, files).into_validated()?;

        tracing::info!(
            files = bundle.bundle().markdown_files.len(),
            "Bundle assembled"
        );

        Ok(GenerationOutput {
            bundle,
            source_summary: sources.map(|s| s.summary()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GeneratedDocs, GenerationMode, MockContentGenerator};
    use docpack_site::{TemplateSource, README};
    use docpack_sources::{FetchError, MockSourceClient};
    use pretty_assertions::assert_eq;

    fn request() -> GenerateRequest {
        GenerateRequest {
            project_name: Some("Foo".to_string()),
            code_input: Some("function foo(){}".to_string()),
            accent_color: Some("#112233".to_string()),
            include_sidebar: Some(true),
            generate_full_docs: Some(false),
            ..Default::default()
        }
    }

    fn pipeline(
        generator: MockContentGenerator,
        client: MockSourceClient,
    ) -> Pipeline<MockContentGenerator, MockSourceClient> {
        Pipeline::new(
            generator,
            SourceFetcher::new(client),
            TemplateInstantiator::default(),
        )
    }

    fn readme_only() -> GeneratedDocs {
        GeneratedDocs::from_files([(README, "# Foo\n\nA project.")])
    }

    #[tokio::test]
    async fn single_file_end_to_end() {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_generate()
            .withf(|r| {
                r.mode == GenerationMode::SingleFile
                    && r.project_name == "Foo"
                    && r.context.contains("function foo(){}")
                    && !r.context.contains("External Sources")
            })
            .times(1)
            .returning(|_| Ok(readme_only()));

        let output = pipeline(generator, MockSourceClient::new())
            .run(&request())
            .await
            .unwrap();

        let bundle = output.bundle.bundle();
        assert_eq!(bundle.markdown_files.len(), 1);
        assert_eq!(bundle.markdown_files[0].name, README);
        assert!(bundle.theme_css.contains("#112233"));
        assert!(!bundle.theme_css.contains("{colorcode"));
        assert!(bundle.index_html.contains("name: \"Foo\""));
        assert!(bundle.index_html.contains("loadSidebar: true"));

        let sidebar = output.bundle.sidebar();
        let links: Vec<&str> = sidebar
            .lines()
            .filter(|l| l.starts_with("- [") && !l.contains("docpack"))
            .collect();
        assert_eq!(links, vec!["- [README](/README.md)"]);

        assert!(output.source_summary.is_none());
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_generator() {
        let mut generator = MockContentGenerator::new();
        generator.expect_generate().never();

        let err = pipeline(generator, MockSourceClient::new())
            .run(&GenerateRequest {
                accent_color: Some("red".to_string()),
                ..request()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::InvalidRequest(_)));
        assert_eq!(err.to_string(), "Valid hex color code is required");
    }

    #[tokio::test]
    async fn sources_feed_the_context() {
        let mut client = MockSourceClient::new();
        client
            .expect_get_text()
            .withf(|url| url == "https://a.dev/notes.md")
            .times(1)
            .returning(|_| Ok("Remember the flags.".to_string()));

        let mut generator = MockContentGenerator::new();
        generator
            .expect_generate()
            .withf(|r| {
                r.context.contains(
                    "External Sources:\n[External Source] https://a.dev/notes.md\n\nRemember the flags.",
                )
            })
            .times(1)
            .returning(|_| Ok(readme_only()));

        let output = pipeline(generator, client)
            .run(&GenerateRequest {
                sources_input: Some("https://a.dev/notes.md".to_string()),
                ..request()
            })
            .await
            .unwrap();

        let summary = output.source_summary.unwrap();
        assert_eq!(summary.fetched.len(), 1);
        assert_eq!(summary.fetched[0].chars, "Remember the flags.".chars().count());
        assert!(summary.failed.is_empty());
    }

    #[tokio::test]
    async fn failing_sources_still_produce_a_bundle() {
        let mut client = MockSourceClient::new();
        client.expect_get_text().times(2).returning(|_| {
            Err(FetchError::Status {
                status: 404,
                reason: "Not Found".to_string(),
            })
        });

        let mut generator = MockContentGenerator::new();
        generator
            .expect_generate()
            .withf(|r| !r.context.contains("External Sources"))
            .times(1)
            .returning(|_| Ok(readme_only()));

        let output = pipeline(generator, client)
            .run(&GenerateRequest {
                sources_input: Some("https://a.dev/x, https://b.dev/y".to_string()),
                ..request()
            })
            .await
            .unwrap();

        let summary = output.source_summary.unwrap();
        assert!(summary.fetched.is_empty());
        assert_eq!(summary.failed.len(), 2);
        assert_eq!(summary.failed[0].error, "HTTP 404 Not Found");
    }

    #[tokio::test]
    async fn generator_failure_aborts() {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Err(GeneratorError::EmptyResponse));

        let err = pipeline(generator, MockSourceClient::new())
            .run(&request())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Generation(_)));
    }

    #[tokio::test]
    async fn output_without_readme_is_rejected() {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Ok(GeneratedDocs::from_files([("SETUP.md", "# Setup")])));

        let err = pipeline(generator, MockSourceClient::new())
            .run(&request())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Generation(GeneratorError::MissingReadme)
        ));
    }

    #[tokio::test]
    async fn full_package_keeps_topic_files() {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_generate()
            .withf(|r| r.mode == GenerationMode::FullPackage)
            .returning(|_| {
                Ok(GeneratedDocs::from_files([
                    (README, "# Foo"),
                    ("SETUP.md", "# Setup"),
                    ("API.md", "# API"),
                ]))
            });

        let output = pipeline(generator, MockSourceClient::new())
            .run(&GenerateRequest {
                generate_full_docs: Some(true),
                include_sidebar: Some(false),
                ..request()
            })
            .await
            .unwrap();

        let bundle = output.bundle.bundle();
        assert_eq!(bundle.markdown_files.len(), 3);
        assert!(bundle.index_html.contains("loadSidebar: false"));
    }

    #[tokio::test]
    async fn missing_template_directory_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = MockContentGenerator::new();
        generator.expect_generate().returning(|_| Ok(readme_only()));

        let pipeline = Pipeline::new(
            generator,
            SourceFetcher::new(MockSourceClient::new()),
            TemplateInstantiator::new(TemplateSource::Directory(dir.path().to_path_buf())),
        );

        let err = pipeline.run(&request()).await.unwrap_err();

        assert!(matches!(err, PipelineError::Template(_)));
        assert!(err.to_string().starts_with("Server configuration error:"));
    }
}

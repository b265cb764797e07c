//! Core generation pipeline for docpack.
//!
//! Validates requests, gathers external sources, asks a content generator
//! for markdown and hands the result to the site assembler.

pub mod chat;
pub mod generator;
pub mod pipeline;
pub mod prompts;
pub mod request;

pub use chat::{ChatCompletionGenerator, ChatConfig};
#[cfg(any(test, feature = "mocks"))]
pub use generator::MockContentGenerator;
pub use generator::{
    compose_context, parse_generated_docs, Analysis, ContentGenerator, GeneratedDocs,
    GenerationMode, GenerationRequest, GeneratorError,
};
pub use pipeline::{GenerationOutput, Pipeline, PipelineError};
pub use request::{
    Audience, GenerateRequest, RequestError, RequestViolation, ToneStyle, ValidatedRequest,
};

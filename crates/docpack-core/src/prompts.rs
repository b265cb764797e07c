//! Prompt construction for chat-completion generators.

use crate::generator::GenerationRequest;

const ROLE: &str = "You are an expert technical documentation writer.";

fn style_block(request: &GenerationRequest) -> String {
    format!(
        "Target audience: {}\nWriting tone: {} ({})",
        request.audience.label(),
        request.tone_style.as_str(),
        request.tone_style.description()
    )
}

/// Prompt for a single comprehensive `README.md`.
pub fn single_file_prompt(request: &GenerationRequest) -> String {
    format!(
        r##"{ROLE} Generate a comprehensive, well-structured README.md file for the following project.

Project Name: {name}
{style}

{context}

Create a SINGLE, comprehensive README.md that includes:
- Project title and description
- Key features
- Installation/setup instructions
- Usage examples with code snippets
- Configuration options
- API documentation (if applicable)
- Troubleshooting tips

Return ONLY valid JSON in this exact format:
{{
  "files": {{
    "README.md": "# {name}\n\n## Description\n\n..."
  }},
  "analysis": {{
    "structure": ["README.md"],
    "summary": "Comprehensive single-file documentation",
    "keyFeatures": ["Feature 1", "Feature 2"]
  }}
}}"##,
        name = request.project_name,
        style = style_block(request),
        context = request.context,
    )
}

/// First step of full-package generation: outline the documentation.
pub fn analysis_prompt(request: &GenerationRequest) -> String {
    format!(
        r#"{ROLE} Analyze the following project information, then create a documentation structure.

Project Name: {name}
{style}

{context}

Provide a JSON response with this structure:
{{
  "structure": ["File1.md", "File2.md", ...],
  "summary": "Brief project description",
  "keyFeatures": ["Feature 1", "Feature 2", ...]
}}"#,
        name = request.project_name,
        style = style_block(request),
        context = request.context,
    )
}

/// Second step of full-package generation: write every file.
pub fn generation_prompt(request: &GenerationRequest, analysis: &str) -> String {
    let mut files = vec!["README.md"];
    files.extend_from_slice(request.audience.topic_files());

    let example = files
        .iter()
        .map(|f| format!("    \"{}\": \"# ...\"", f))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"{ROLE} Based on the project analysis below, generate markdown documentation files.

Project Name: {name}
{style}

Analysis Results:
{analysis}

{context}

Create at least these files: {list}
Return ONLY valid JSON in this format:
{{
  "files": {{
{example}
  }}
}}

Guidelines:
- Use clear hierarchies with H1, H2, H3 headings
- Include code examples where relevant
- Link between related documents
- Use proper markdown formatting (code blocks, lists, tables)"#,
        name = request.project_name,
        style = style_block(request),
        context = request.context,
        list = files.join(", "),
    )
}

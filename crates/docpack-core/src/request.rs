//! Inbound generation request and its validation.

use std::fmt;

use serde::Deserialize;

use docpack_site::color::Rgb;

use crate::generator::GenerationMode;

/// Longest accepted project name (characters, trimmed).
pub const MAX_PROJECT_NAME_CHARS: usize = 100;

/// Longest accepted code input (characters, trimmed).
pub const MAX_CODE_INPUT_CHARS: usize = 50_000;

/// Who the documentation is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Audience {
    #[default]
    Developer,
    Team,
    EndUser,
}

impl Audience {
    pub const ALL: [Audience; 3] = [Self::Developer, Self::Team, Self::EndUser];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Developer => "developer",
            Self::Team => "team",
            Self::EndUser => "enduser",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Developer => "Developer (Technical)",
            Self::Team => "Team Member",
            Self::EndUser => "End User (Simple)",
        }
    }

    /// Topic files requested in full-package mode, besides `README.md`.
    pub fn topic_files(&self) -> &'static [&'static str] {
        match self {
            Self::Developer => &["SETUP.md", "API.md", "FEATURES.md", "TROUBLESHOOTING.md"],
            Self::Team => &[
                "ONBOARDING.md",
                "ARCHITECTURE.md",
                "WORKFLOW.md",
                "TROUBLESHOOTING.md",
            ],
            Self::EndUser => &["GETTING_STARTED.md", "FEATURES.md", "FAQ.md"],
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writing style of the documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneStyle {
    Casual,
    #[default]
    Professional,
    Friendly,
    Technical,
    Academic,
}

impl ToneStyle {
    pub const ALL: [ToneStyle; 5] = [
        Self::Casual,
        Self::Professional,
        Self::Friendly,
        Self::Technical,
        Self::Academic,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::Professional => "professional",
            Self::Friendly => "friendly",
            Self::Technical => "technical",
            Self::Academic => "academic",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Casual => "Relaxed, informal tone with conversational language",
            Self::Professional => "Formal, business-focused language",
            Self::Friendly => "Warm, approachable tone that's easy to understand",
            Self::Technical => "Precise, detailed language for technical accuracy",
            Self::Academic => "Scholarly, structured tone with formal vocabulary",
        }
    }
}

impl fmt::Display for ToneStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generation request as received from a client.
///
/// Every field is optional at this level; [`GenerateRequest::validate`]
/// decides what is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateRequest {
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub code_input: Option<String>,
    /// Comma or newline separated URLs
    pub sources_input: Option<String>,
    pub repo_url: Option<String>,
    /// `#RRGGBB`
    pub accent_color: Option<String>,
    pub include_sidebar: Option<bool>,
    pub generate_full_docs: Option<bool>,
    pub audience: Option<String>,
    pub tone_style: Option<String>,
}

/// A single problem with a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestViolation {
    #[error("Project name is required")]
    MissingProjectName,

    #[error("Project name must be at most {} characters", MAX_PROJECT_NAME_CHARS)]
    ProjectNameTooLong,

    #[error("Code input is required")]
    MissingCodeInput,

    #[error("Code input must be at most {} characters", MAX_CODE_INPUT_CHARS)]
    CodeInputTooLong,

    #[error("Valid hex color code is required")]
    InvalidAccentColor,

    #[error("includeSidebar must be a boolean")]
    MissingIncludeSidebar,

    #[error("Audience must be one of: developer, team, enduser")]
    InvalidAudience,

    #[error("Tone style must be one of: casual, professional, friendly, technical, academic")]
    InvalidToneStyle,
}

/// All violations found in a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .violations.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
pub struct RequestError {
    pub violations: Vec<RequestViolation>,
}

/// A request that passed validation, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub project_name: String,
    pub description: String,
    pub code_input: String,
    pub sources_input: Option<String>,
    pub repo_url: String,
    pub accent_color: String,
    pub include_sidebar: bool,
    pub mode: GenerationMode,
    pub audience: Audience,
    pub tone_style: ToneStyle,
}

impl GenerateRequest {
    /// Check every field independently and report all problems at once.
    pub fn validate(&self) -> Result<ValidatedRequest, RequestError> {
        let mut violations = Vec::new();

        let project_name = non_blank(&self.project_name);
        match project_name {
            None => violations.push(RequestViolation::MissingProjectName),
            Some(name) if name.chars().count() > MAX_PROJECT_NAME_CHARS => {
                violations.push(RequestViolation::ProjectNameTooLong)
            }
            Some(_) => {}
        }

        let code_input = non_blank(&self.code_input);
        match code_input {
            None => violations.push(RequestViolation::MissingCodeInput),
            Some(code) if code.chars().count() > MAX_CODE_INPUT_CHARS => {
                violations.push(RequestViolation::CodeInputTooLong)
            }
            Some(_) => {}
        }

        let accent_color = self.accent_color.as_deref().filter(|c| is_hex_color(c));
        if accent_color.is_none() {
            violations.push(RequestViolation::InvalidAccentColor);
        }

        if self.include_sidebar.is_none() {
            violations.push(RequestViolation::MissingIncludeSidebar);
        }

        let audience = match non_blank(&self.audience) {
            None => Some(Audience::default()),
            Some(value) => Audience::parse(value),
        };
        if audience.is_none() {
            violations.push(RequestViolation::InvalidAudience);
        }

        let tone_style = match non_blank(&self.tone_style) {
            None => Some(ToneStyle::default()),
            Some(value) => ToneStyle::parse(value),
        };
        if tone_style.is_none() {
            violations.push(RequestViolation::InvalidToneStyle);
        }

        match (
            project_name,
            code_input,
            accent_color,
            self.include_sidebar,
            audience,
            tone_style,
        ) {
            (
                Some(project_name),
                Some(code_input),
                Some(accent_color),
                Some(include_sidebar),
                Some(audience),
                Some(tone_style),
            ) if violations.is_empty() => Ok(ValidatedRequest {
                project_name: project_name.to_string(),
                description: self.description.as_deref().unwrap_or("").trim().to_string(),
                code_input: code_input.to_string(),
                sources_input: non_blank(&self.sources_input).map(str::to_string),
                repo_url: self.repo_url.as_deref().unwrap_or("").trim().to_string(),
                accent_color: accent_color.to_string(),
                include_sidebar,
                mode: if self.generate_full_docs.unwrap_or(false) {
                    GenerationMode::FullPackage
                } else {
                    GenerationMode::SingleFile
                },
                audience,
                tone_style,
            }),
            _ => Err(RequestError { violations }),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn is_hex_color(value: &str) -> bool {
    value.starts_with('#') && Rgb::parse(value).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid() -> GenerateRequest {
        GenerateRequest {
            project_name: Some("Foo".to_string()),
            code_input: Some("function foo(){}".to_string()),
            accent_color: Some("#112233".to_string()),
            include_sidebar: Some(true),
            ..Default::default()
        }
    }

    #[test]
    fn applies_defaults() {
        let request = valid().validate().unwrap();

        assert_eq!(request.project_name, "Foo");
        assert_eq!(request.description, "");
        assert_eq!(request.repo_url, "");
        assert_eq!(request.sources_input, None);
        assert_eq!(request.mode, GenerationMode::SingleFile);
        assert_eq!(request.audience, Audience::Developer);
        assert_eq!(request.tone_style, ToneStyle::Professional);
    }

    #[test]
    fn full_docs_selects_full_package() {
        let request = GenerateRequest {
            generate_full_docs: Some(true),
            audience: Some("team".to_string()),
            tone_style: Some("casual".to_string()),
            ..valid()
        }
        .validate()
        .unwrap();

        assert_eq!(request.mode, GenerationMode::FullPackage);
        assert_eq!(request.audience, Audience::Team);
        assert_eq!(request.tone_style, ToneStyle::Casual);
    }

    #[test]
    fn reports_every_missing_field() {
        let err = GenerateRequest::default().validate().unwrap_err();

        assert_eq!(
            err.violations,
            vec![
                RequestViolation::MissingProjectName,
                RequestViolation::MissingCodeInput,
                RequestViolation::InvalidAccentColor,
                RequestViolation::MissingIncludeSidebar,
            ]
        );
        assert_eq!(
            err.to_string(),
            "Project name is required, Code input is required, \
             Valid hex color code is required, includeSidebar must be a boolean"
        );
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let err = GenerateRequest {
            project_name: Some("   ".to_string()),
            code_input: Some("\n\t".to_string()),
            ..valid()
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            err.violations,
            vec![
                RequestViolation::MissingProjectName,
                RequestViolation::MissingCodeInput,
            ]
        );
    }

    #[test]
    fn rejects_malformed_colors() {
        for color in ["112233", "#11223", "#1122334", "#GG2233", "blue"] {
            let err = GenerateRequest {
                accent_color: Some(color.to_string()),
                ..valid()
            }
            .validate()
            .unwrap_err();

            assert_eq!(err.violations, vec![RequestViolation::InvalidAccentColor]);
        }

        let lower = GenerateRequest {
            accent_color: Some("#abcdef".to_string()),
            ..valid()
        };
        assert!(lower.validate().is_ok());
    }

    #[test]
    fn tone_is_checked_independently_of_audience() {
        let err = GenerateRequest {
            tone_style: Some("sarcastic".to_string()),
            ..valid()
        }
        .validate()
        .unwrap_err();

        assert_eq!(err.violations, vec![RequestViolation::InvalidToneStyle]);

        let err = GenerateRequest {
            audience: Some("robots".to_string()),
            tone_style: Some("sarcastic".to_string()),
            ..valid()
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            err.violations,
            vec![
                RequestViolation::InvalidAudience,
                RequestViolation::InvalidToneStyle,
            ]
        );
    }

    #[test]
    fn enforces_length_limits() {
        let err = GenerateRequest {
            project_name: Some("n".repeat(MAX_PROJECT_NAME_CHARS + 1)),
            code_input: Some("c".repeat(MAX_CODE_INPUT_CHARS + 1)),
            ..valid()
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            err.violations,
            vec![
                RequestViolation::ProjectNameTooLong,
                RequestViolation::CodeInputTooLong,
            ]
        );
    }

    #[test]
    fn deserializes_camel_case_json() {
        let request: GenerateRequest = serde_json::from_str(
            r##"{
                "projectName": "Foo",
                "codeInput": "fn main() {}",
                "sourcesInput": "https://a.dev/x\nhttps://b.dev/y",
                "accentColor": "#112233",
                "includeSidebar": false,
                "generateFullDocs": true,
                "toneStyle": "technical"
            }"##,
        )
        .unwrap();

        let validated = request.validate().unwrap();
        assert!(!validated.include_sidebar);
        assert_eq!(validated.mode, GenerationMode::FullPackage);
        assert_eq!(validated.tone_style, ToneStyle::Technical);
        assert_eq!(
            validated.sources_input.as_deref(),
            Some("https://a.dev/x\nhttps://b.dev/y")
        );
    }

    #[test]
    fn audience_topics_exclude_readme() {
        for audience in Audience::ALL {
            assert!(!audience.topic_files().contains(&"README.md"));
            assert!(!audience.topic_files().is_empty());
        }
    }
}

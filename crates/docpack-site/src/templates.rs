//! Template instantiation for the documentation viewer.
//!
//! A template set is an HTML shell plus a CSS theme, chosen by whether the
//! site shows a sidebar. Instantiation rewrites the marked configuration
//! statements in the HTML and the accent color tokens in the CSS.

use std::fs;
use std::path::{Path, PathBuf};

use regex::{Captures, Regex};

use crate::assets::BuiltinTemplates;
use crate::color::generate_color_variations;

/// Comment that tags a rewritable statement in the HTML shell.
pub const PLACEHOLDER_MARKER: &str = "@docpack";

/// CSS token replaced with the accent color.
pub const COLOR_TOKEN: &str = "{colorcode}";
/// CSS token replaced with the lightened accent color.
pub const COLOR_LIGHT_TOKEN: &str = "{colorcode-light}";
/// CSS token replaced with the darkened accent color.
pub const COLOR_DARK_TOKEN: &str = "{colorcode-dark}";

/// Layout variant of a template set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateVariant {
    WithSidebar,
    WithoutSidebar,
}

impl TemplateVariant {
    /// Pick the variant for a sidebar flag.
    pub fn for_sidebar(include_sidebar: bool) -> Self {
        if include_sidebar {
            Self::WithSidebar
        } else {
            Self::WithoutSidebar
        }
    }

    /// Directory name of this variant in a template tree.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::WithSidebar => "with-sidebar",
            Self::WithoutSidebar => "without-sidebar",
        }
    }
}

/// User settings applied to a template set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateConfig {
    /// Project name shown in the viewer
    pub project_name: String,
    /// Repository link (may be empty)
    pub repo_url: String,
    /// Accent color as `#RRGGBB`
    pub theme_color: String,
    /// Whether the viewer loads `_sidebar.md`
    pub include_sidebar: bool,
}

/// Raw template text for one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    pub html: String,
    pub css: String,
    /// Extra CSS appended to the theme when the sidebar is disabled
    pub no_sidebar_css: Option<String>,
}

/// Instantiated HTML and CSS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstantiatedTemplates {
    pub html: String,
    pub css: String,
}

/// Errors loading or processing templates.
///
/// All of these indicate a broken deployment, not bad user input.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template file not found: {0}")]
    Missing(PathBuf),

    #[error("Failed to read template {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to render built-in template: {0}")]
    Render(String),

    #[error("Invalid substitution pattern: {0}")]
    Pattern(String),
}

/// Where template sets come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TemplateSource {
    /// Templates compiled into the binary
    #[default]
    Builtin,
    /// A directory holding `with-sidebar/` and `without-sidebar/`
    Directory(PathBuf),
}

impl TemplateSource {
    /// Load the template set for a variant.
    pub fn load(&self, variant: TemplateVariant) -> Result<TemplateSet, TemplateError> {
        match self {
            Self::Builtin => BuiltinTemplates::new()
                .and_then(|t| t.render(variant))
                .map_err(|e| TemplateError::Render(e.to_string())),
            Self::Directory(root) => load_from_dir(root, variant),
        }
    }
}

fn load_from_dir(root: &Path, variant: TemplateVariant) -> Result<TemplateSet, TemplateError> {
    let dir = root.join(variant.dir_name());
    let html = read_required(&dir.join("index.html"))?;
    let css = read_required(&dir.join("themes").join("docs.css"))?;

    let no_sidebar_path = dir.join("themes").join("no-sidebar.css");
    let no_sidebar_css = if variant == TemplateVariant::WithoutSidebar && no_sidebar_path.exists()
    {
        Some(read_required(&no_sidebar_path)?)
    } else {
        None
    };

    Ok(TemplateSet {
        html,
        css,
        no_sidebar_css,
    })
}

fn read_required(path: &Path) -> Result<String, TemplateError> {
    if !path.exists() {
        return Err(TemplateError::Missing(path.to_path_buf()));
    }

    fs::read_to_string(path).map_err(|e| TemplateError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Applies a [`TemplateConfig`] to a template set.
#[derive(Debug, Clone, Default)]
pub struct TemplateInstantiator {
    source: TemplateSource,
}

impl TemplateInstantiator {
    /// Create an instantiator reading from `source`.
    pub fn new(source: TemplateSource) -> Self {
        Self { source }
    }

    /// Load the variant selected by `config` and apply the configuration.
    pub fn instantiate(
        &self,
        config: &TemplateConfig,
    ) -> Result<InstantiatedTemplates, TemplateError> {
        let variant = TemplateVariant::for_sidebar(config.include_sidebar);
        let set = self.source.load(variant)?;

        let html = render_html(&set.html, config)?;

        let css = match (&set.no_sidebar_css, config.include_sidebar) {
            (Some(extra), false) => format!("{}\n\n{}", set.css, extra),
            _ => set.css,
        };
        let css = render_css(&css, &config.theme_color);

        tracing::info!(
            project = %config.project_name,
            color = %config.theme_color,
            template = variant.dir_name(),
            "Templates instantiated"
        );

        Ok(InstantiatedTemplates { html, css })
    }
}

/// The labeled statements rewritten in the HTML shell, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMap {
    entries: Vec<(&'static str, String)>,
}

impl PlaceholderMap {
    /// Map the three viewer settings from a config.
    pub fn from_config(config: &TemplateConfig) -> Self {
        Self {
            entries: vec![
                ("name", config.project_name.clone()),
                ("repo", config.repo_url.clone()),
                ("themeColor", config.theme_color.clone()),
            ],
        }
    }

    /// Replace the quoted value of each marked `label: "...",` statement.
    ///
    /// Only the first statement carrying the marker comment is touched per
    /// label; unmarked statements with the same label are left alone.
    pub fn apply(&self, html: &str) -> Result<String, TemplateError> {
        let mut out = html.to_string();

        for (label, value) in &self.entries {
            let pattern = format!(
                r#"\b{}:\s*"[^"]*",(\s*//\s*{})"#,
                regex::escape(label),
                regex::escape(PLACEHOLDER_MARKER)
            );
            let re = Regex::new(&pattern).map_err(|e| TemplateError::Pattern(e.to_string()))?;
            let escaped = escape_js_string(value);

            out = re
                .replacen(&out, 1, |caps: &Captures| {
                    format!("{}: \"{}\",{}", label, escaped, &caps[1])
                })
                .into_owned();
        }

        Ok(out)
    }
}

/// Apply the viewer settings to the HTML shell.
pub fn render_html(html: &str, config: &TemplateConfig) -> Result<String, TemplateError> {
    let processed = PlaceholderMap::from_config(config).apply(html)?;

    if config.include_sidebar {
        return Ok(processed);
    }

    let load_sidebar = Regex::new(r"loadSidebar:\s*true,")
        .map_err(|e| TemplateError::Pattern(e.to_string()))?;
    let processed = load_sidebar
        .replacen(&processed, 1, "loadSidebar: false,")
        .into_owned();

    // The sidebar-less stylesheet is merged into docs.css, so its link goes.
    let link = Regex::new(r#"(?i)\s*<link[^>]*href="/themes/no-sidebar\.css"[^>]*>\s*"#)
        .map_err(|e| TemplateError::Pattern(e.to_string()))?;

    Ok(link.replacen(&processed, 1, "\n").into_owned())
}

/// Replace the accent color tokens in the CSS theme.
pub fn render_css(css: &str, theme_color: &str) -> String {
    let variations = generate_color_variations(theme_color);

    css.replace(COLOR_LIGHT_TOKEN, &variations.light)
        .replace(COLOR_DARK_TOKEN, &variations.dark)
        .replace(COLOR_TOKEN, theme_color)
}

fn escape_js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\u003c"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn config(include_sidebar: bool) -> TemplateConfig {
        TemplateConfig {
            project_name: "Foo".to_string(),
            repo_url: "https://github.com/acme/foo".to_string(),
            theme_color: "#112233".to_string(),
            include_sidebar,
        }
    }

    #[test]
    fn instantiates_builtin_sidebar_variant() {
        let out = TemplateInstantiator::default()
            .instantiate(&config(true))
            .unwrap();

        assert!(out.html.contains(r#"name: "Foo", // @docpack"#));
        assert!(out.html.contains(r#"repo: "https://github.com/acme/foo", // @docpack"#));
        assert!(out.html.contains(r##"themeColor: "#112233", // @docpack"##));
        assert!(out.html.contains("loadSidebar: true,"));

        assert!(out.css.contains("#112233"));
        assert!(!out.css.contains("{colorcode"));
        assert!(!out.css.contains("body.no-sidebar"));
    }

    #[test]
    fn instantiates_builtin_sidebarless_variant() {
        let out = TemplateInstantiator::default()
            .instantiate(&config(false))
            .unwrap();

        assert!(out.html.contains("loadSidebar: false,"));
        assert!(!out.html.contains("loadSidebar: true,"));
        assert!(!out.html.contains("no-sidebar.css"));
        assert!(out.css.contains("body.no-sidebar .sidebar"));
        assert!(!out.css.contains(COLOR_TOKEN));
    }

    #[test]
    fn replaces_only_marked_statements() {
        let html = r##"
const other = { name: "keep-me", };
window.$docsify = {
  name: "Old", // @docpack
  filename: "x", // @docpack
  repo: "", // @docpack
  themeColor: "#000000", // @docpack
};
"##;

        let out = render_html(html, &config(true)).unwrap();

        assert!(out.contains(r#"name: "keep-me","#));
        assert!(out.contains(r#"filename: "x", // @docpack"#));
        assert!(out.contains(r#"name: "Foo", // @docpack"#));
        assert!(!out.contains("Old"));
    }

    #[test]
    fn escapes_substituted_values() {
        let cfg = TemplateConfig {
            project_name: r#"Say "hi" $1 \o/"#.to_string(),
            ..config(true)
        };
        let html = "name: \"x\", // @docpack\n";

        let out = render_html(html, &cfg).unwrap();

        assert_eq!(out, "name: \"Say \\\"hi\\\" $1 \\\\o/\", // @docpack\n");
    }

    #[test]
    fn strips_no_sidebar_link_case_insensitively() {
        let html = "<head>\n  <LINK rel=\"stylesheet\" href=\"/themes/no-sidebar.css\">\n</head>\nloadSidebar: true,";

        let out = render_html(html, &config(false)).unwrap();

        assert_eq!(out, "<head>\n</head>\nloadSidebar: false,");
    }

    #[test]
    fn css_replacement_is_global_and_idempotent() {
        let css = "a { color: {colorcode}; } b { border-color: {colorcode}; } c { background: {colorcode-light}; }";

        let once = render_css(css, "#112233");
        let twice = render_css(&once, "#112233");

        assert_eq!(
            once,
            "a { color: #112233; } b { border-color: #112233; } c { background: #445566; }"
        );
        assert_eq!(once, twice);
    }

    #[test]
    fn loads_templates_from_directory() {
        let temp = tempdir().unwrap();
        BuiltinTemplates::new().unwrap().write_to(temp.path()).unwrap();

        let instantiator = TemplateInstantiator::new(TemplateSource::Directory(
            temp.path().to_path_buf(),
        ));
        let from_dir = instantiator.instantiate(&config(false)).unwrap();
        let builtin = TemplateInstantiator::default()
            .instantiate(&config(false))
            .unwrap();

        assert_eq!(from_dir, builtin);
    }

    #[test]
    fn missing_template_is_a_configuration_error() {
        let temp = tempdir().unwrap();

        let err = TemplateInstantiator::new(TemplateSource::Directory(temp.path().to_path_buf()))
            .instantiate(&config(true))
            .unwrap_err();

        match err {
            TemplateError::Missing(path) => assert!(path.ends_with("with-sidebar/index.html")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn no_sidebar_fragment_is_optional() {
        let temp = tempdir().unwrap();
        let themes = temp.path().join("without-sidebar/themes");
        fs::create_dir_all(&themes).unwrap();
        fs::write(temp.path().join("without-sidebar/index.html"), "loadSidebar: true,").unwrap();
        fs::write(themes.join("docs.css"), "a { color: {colorcode}; }").unwrap();

        let out = TemplateInstantiator::new(TemplateSource::Directory(temp.path().to_path_buf()))
            .instantiate(&config(false))
            .unwrap();

        assert_eq!(out.css, "a { color: #112233; }");
        assert_eq!(out.html, "loadSidebar: false,");
    }
}

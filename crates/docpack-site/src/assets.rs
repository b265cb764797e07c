//! Built-in viewer templates and CSS processing.

use std::fs;
use std::path::Path;

use minijinja::{context, Environment};

use crate::templates::{TemplateSet, TemplateVariant};

/// Renders the template sets that ship with docpack.
pub struct BuiltinTemplates {
    env: Environment<'static>,
}

impl BuiltinTemplates {
    /// Create the renderer with the embedded shell template.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.add_template_owned("index.html".to_string(), SHELL_TEMPLATE.to_string())?;

        Ok(Self { env })
    }

    /// Render the template set for one layout variant.
    pub fn render(&self, variant: TemplateVariant) -> Result<TemplateSet, minijinja::Error> {
        let sidebar = variant == TemplateVariant::WithSidebar;
        let html = self
            .env
            .get_template("index.html")?
            .render(context! { sidebar => sidebar })?;

        Ok(TemplateSet {
            html,
            css: THEME_CSS.to_string(),
            no_sidebar_css: (!sidebar).then(|| NO_SIDEBAR_CSS.to_string()),
        })
    }

    /// Write both variants below `root` in the layout `TemplateSource::Directory` reads.
    pub fn write_to(&self, root: &Path) -> Result<usize, std::io::Error> {
        let mut written = 0;

        for variant in [TemplateVariant::WithSidebar, TemplateVariant::WithoutSidebar] {
            let set = self.render(variant).map_err(std::io::Error::other)?;
            let dir = root.join(variant.dir_name());
            let themes = dir.join("themes");
            fs::create_dir_all(&themes)?;

            fs::write(dir.join("index.html"), &set.html)?;
            fs::write(themes.join("docs.css"), &set.css)?;
            written += 2;

            if let Some(extra) = &set.no_sidebar_css {
                fs::write(themes.join("no-sidebar.css"), extra)?;
                written += 1;
            }
        }

        Ok(written)
    }
}

/// Minify CSS using lightningcss.
pub fn minify_css(css: &str) -> Result<String, String> {
    use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

    let stylesheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| format!("CSS parse error: {}", e))?;

    let minified = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .map_err(|e| format!("CSS minify error: {}", e))?;

    Ok(minified.code)
}

// Docsify viewer shell. The three `// @docpack` statements and the
// `loadSidebar` flag are rewritten at instantiation time.
const SHELL_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta http-equiv="X-UA-Compatible" content="IE=edge,chrome=1">
  <meta name="viewport" content="width=device-width, initial-scale=1.0, minimum-scale=1.0">
  <title>Documentation</title>
  <link rel="stylesheet" href="//cdn.jsdelivr.net/npm/docsify@4/lib/themes/vue.css">
  <link rel="stylesheet" href="/themes/docs.css">
{% if not sidebar %}
  <link rel="stylesheet" href="/themes/no-sidebar.css">
{% endif %}
</head>
<body{% if not sidebar %} class="no-sidebar"{% endif %}>
  <div id="app">Loading...</div>
  <script>
    window.$docsify = {
      name: "Documentation", // @docpack
      repo: "", // @docpack
      themeColor: "#D4AF37", // @docpack
      loadSidebar: true,
{% if sidebar %}
      alias: { "/.*/_sidebar.md": "/_sidebar.md" },
      subMaxLevel: 2,
{% else %}
      hideSidebar: true,
{% endif %}
      auto2top: true,
      relativePath: false,
      search: {
        placeholder: "Search",
        noData: "No results",
        depth: 3,
      },
      copyCode: {
        buttonText: "Copy",
        successText: "Copied",
      },
    };
  </script>
  <script src="//cdn.jsdelivr.net/npm/docsify@4"></script>
  <script src="//cdn.jsdelivr.net/npm/docsify@4/lib/plugins/search.min.js"></script>
  <script src="//cdn.jsdelivr.net/npm/docsify-copy-code@2"></script>
  <script src="//cdn.jsdelivr.net/npm/prismjs@1/components/prism-bash.min.js"></script>
  <script src="//cdn.jsdelivr.net/npm/prismjs@1/components/prism-rust.min.js"></script>
</body>
</html>
"##;

// Accent tokens: `{colorcode}`, `{colorcode-light}`, `{colorcode-dark}`.
const THEME_CSS: &str = r#"/* docpack theme */

:root {
  --theme-color: {colorcode};
  --theme-color-light: {colorcode-light};
  --theme-color-dark: {colorcode-dark};
  --content-max-width: 860px;
  --code-background: #f6f8fa;
  --border: #e5e7eb;
}

body {
  font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
  line-height: 1.65;
  color: #1f2937;
}

.app-name-link {
  color: {colorcode} !important;
  font-weight: 700;
}

.sidebar {
  border-right: 1px solid var(--border);
}

.sidebar ul li a {
  color: #4b5563;
  transition: color 0.15s;
}

.sidebar ul li a:hover {
  color: {colorcode};
}

.sidebar ul li.active > a {
  color: {colorcode};
  border-right: 3px solid {colorcode};
  font-weight: 600;
}

.sidebar-toggle {
  background-color: transparent;
}

.markdown-section {
  max-width: var(--content-max-width);
}

.markdown-section h1,
.markdown-section h2,
.markdown-section h3 {
  color: #111827;
}

.markdown-section h2 {
  border-bottom: 1px solid var(--border);
  padding-bottom: 0.3rem;
}

.markdown-section a {
  color: {colorcode};
  text-decoration: underline;
  text-underline-offset: 3px;
}

.markdown-section a:hover {
  color: {colorcode-dark};
}

.markdown-section blockquote {
  border-left: 4px solid {colorcode};
  background: #fafafa;
  color: #4b5563;
}

.markdown-section code {
  background: var(--code-background);
  border-radius: 4px;
}

.markdown-section pre {
  background: var(--code-background);
  border: 1px solid var(--border);
  border-radius: 6px;
}

.markdown-section table tr:nth-child(2n) {
  background: #f9fafb;
}

.search input:focus {
  border-color: {colorcode};
}

.search .matching-post:hover {
  background: {colorcode-light};
}

.docsify-copy-code-button {
  background: {colorcode} !important;
}

.docsify-copy-code-button:hover {
  background: {colorcode-dark} !important;
}
"#;

const NO_SIDEBAR_CSS: &str = r#"/* docpack: layout without sidebar */

body.no-sidebar .sidebar,
body.no-sidebar .sidebar-toggle {
  display: none;
}

body.no-sidebar .content {
  left: 0;
  padding-top: 1.5rem;
}

body.no-sidebar .markdown-section {
  margin: 0 auto;
}
"#;

//! Export bundle assembly, validation and archive layout.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::assets::minify_css;
use crate::sidebar::{build_sidebar, SIDEBAR_FILE};

/// The one markdown file every bundle must contain.
pub const README: &str = "README.md";

/// Archive path of the HTML shell.
pub const INDEX_FILE: &str = "index.html";

/// Archive path of the CSS theme.
pub const THEME_FILE: &str = "themes/docs.css";

/// A generated markdown document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentationFile {
    pub name: String,
    pub content: String,
    /// Always `"/" + name`
    pub path: String,
}

impl DocumentationFile {
    /// Create a file; the path is derived from the name.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: format!("/{}", name),
            name,
            content: content.into(),
        }
    }
}

/// Everything that goes into the archive, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub index_html: String,
    pub theme_css: String,
    pub markdown_files: Vec<DocumentationFile>,
}

/// A broken bundle invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BundleViolation {
    #[error("HTML template is empty")]
    EmptyHtml,

    #[error("CSS theme is empty")]
    EmptyCss,

    #[error("No markdown files in bundle")]
    NoMarkdownFiles,

    #[error("Missing README.md")]
    MissingReadme,

    #[error("README.md appears {0} times")]
    DuplicateReadme(usize),

    #[error("Invalid markdown file name: {0}")]
    InvalidFileName(String),

    #[error("Markdown file name is reserved: {0}")]
    ReservedFileName(String),
}

/// Result of checking a bundle; every violation is listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleValidation {
    pub errors: Vec<BundleViolation>,
}

impl BundleValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Errors surfaced by bundle validation or writing.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("Bundle validation failed: {}", join_violations(.0))]
    Invalid(Vec<BundleViolation>),

    #[error("Failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

fn join_violations(violations: &[BundleViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ExportBundle {
    /// Combine instantiated templates and markdown files.
    pub fn assemble(
        index_html: String,
        theme_css: String,
        markdown_files: Vec<DocumentationFile>,
    ) -> Self {
        Self {
            index_html,
            theme_css,
            markdown_files,
        }
    }

    /// Check every structural rule, collecting all violations.
    pub fn validate(&self) -> BundleValidation {
        let mut errors = Vec::new();

        if self.index_html.trim().is_empty() {
            errors.push(BundleViolation::EmptyHtml);
        }

        if self.theme_css.trim().is_empty() {
            errors.push(BundleViolation::EmptyCss);
        }

        if self.markdown_files.is_empty() {
            errors.push(BundleViolation::NoMarkdownFiles);
        }

        match self.markdown_files.iter().filter(|f| f.name == README).count() {
            0 => errors.push(BundleViolation::MissingReadme),
            1 => {}
            n => errors.push(BundleViolation::DuplicateReadme(n)),
        }

        for file in &self.markdown_files {
            if !is_valid_file_name(&file.name) {
                errors.push(BundleViolation::InvalidFileName(file.name.clone()));
            } else if file.name.eq_ignore_ascii_case(SIDEBAR_FILE) {
                errors.push(BundleViolation::ReservedFileName(file.name.clone()));
            }
        }

        BundleValidation { errors }
    }

    /// Validate and seal the bundle for archiving.
    pub fn into_validated(self) -> Result<ValidatedBundle, BundleError> {
        let validation = self.validate();
        if !validation.is_valid() {
            return Err(BundleError::Invalid(validation.errors));
        }

        Ok(ValidatedBundle { bundle: self })
    }

    /// Total size in bytes of HTML, CSS and markdown content.
    pub fn total_size(&self) -> usize {
        self.index_html.len()
            + self.theme_css.len()
            + self
                .markdown_files
                .iter()
                .map(|f| f.content.len())
                .sum::<usize>()
    }
}

// Files land at the archive root under their own name.
fn is_valid_file_name(name: &str) -> bool {
    name.ends_with(".md")
        && name.len() > ".md".len()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
}

/// A named entry of the archive layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path relative to the archive root, `/`-separated
    pub path: String,
    pub contents: String,
}

/// Options for writing a bundle to disk.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Minify `themes/docs.css`
    pub minify: bool,
}

/// A bundle that passed validation. Only these reach the archiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidatedBundle {
    bundle: ExportBundle,
}

impl ValidatedBundle {
    pub fn bundle(&self) -> &ExportBundle {
        &self.bundle
    }

    /// The navigation document for this bundle.
    pub fn sidebar(&self) -> String {
        build_sidebar(&self.bundle.markdown_files)
    }

    /// The archive layout: `index.html`, `themes/docs.css`, `_sidebar.md`
    /// and every markdown file at the root.
    pub fn archive_entries(&self) -> Vec<ArchiveEntry> {
        let mut entries = vec![
            ArchiveEntry {
                path: INDEX_FILE.to_string(),
                contents: self.bundle.index_html.clone(),
            },
            ArchiveEntry {
                path: THEME_FILE.to_string(),
                contents: self.bundle.theme_css.clone(),
            },
            ArchiveEntry {
                path: SIDEBAR_FILE.to_string(),
                contents: self.sidebar(),
            },
        ];

        entries.extend(self.bundle.markdown_files.iter().map(|f| ArchiveEntry {
            path: f.name.clone(),
            contents: f.content.clone(),
        }));

        entries
    }

    /// Write the archive layout as `dir`, returning the number of files written.
    ///
    /// The layout is staged in a sibling directory and then moved into place,
    /// so `dir` ends up holding exactly this bundle's entries.
    pub fn write_to_dir(&self, dir: &Path, options: &WriteOptions) -> Result<usize, BundleError> {
        let staging = staging_dir(dir)?;
        if staging.exists() {
            fs::remove_dir_all(&staging).map_err(write_error(&staging))?;
        }

        let mut written = 0;

        for entry in self.archive_entries() {
            let path = staging.join(&entry.path);

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(write_error(parent))?;
            }

            let contents = if options.minify && entry.path == THEME_FILE {
                minify_css(&entry.contents).unwrap_or_else(|e| {
                    tracing::warn!("Skipping CSS minification: {}", e);
                    entry.contents.clone()
                })
            } else {
                entry.contents
            };

            fs::write(&path, contents).map_err(write_error(&path))?;
            written += 1;
        }

        if dir.exists() {
            tracing::debug!("Replacing previous output at {}", dir.display());
            fs::remove_dir_all(dir).map_err(write_error(dir))?;
        }
        fs::rename(&staging, dir).map_err(write_error(dir))?;

        tracing::info!("Wrote {} files to {}", written, dir.display());

        Ok(written)
    }
}

fn staging_dir(dir: &Path) -> Result<PathBuf, BundleError> {
    match dir.file_name() {
        Some(name) => Ok(dir.with_file_name(format!(".{}.partial", name.to_string_lossy()))),
        None => Err(BundleError::Write {
            path: dir.to_path_buf(),
            message: "output path has no directory name".to_string(),
        }),
    }
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> BundleError + '_ {
    move |e| BundleError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Directory/archive name for a project: lowercase `[a-z0-9-]`, suffixed `-docs`.
pub fn archive_name(project_name: &str) -> String {
    let mut slug = String::new();
    for c in project_name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }

    let slug: String = slug.trim_matches('-').chars().take(50).collect();
    let slug = slug.trim_end_matches('-');

    if slug.is_empty() {
        "project-docs".to_string()
    } else {
        format!("{}-docs", slug)
    }
}

//! Static documentation site assembly for docpack.
//!
//! Instantiates the viewer templates, builds the navigation sidebar and
//! assembles everything into a validated export bundle.

pub mod assets;
pub mod bundle;
pub mod color;
pub mod sidebar;
pub mod templates;

pub use bundle::{
    archive_name, ArchiveEntry, BundleError, BundleValidation, BundleViolation,
    DocumentationFile, ExportBundle, ValidatedBundle, WriteOptions, README,
};
pub use color::{darken_hex, generate_color_variations, lighten_hex, ColorVariations};
pub use sidebar::build_sidebar;
pub use templates::{
    InstantiatedTemplates, TemplateConfig, TemplateError, TemplateInstantiator, TemplateSource,
    TemplateVariant,
};

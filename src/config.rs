//! Site configuration.
//!
//! A single `contact-sheet.toml` at the project root. Every key has a
//! default, and a missing file means "all defaults", so a project laid out as
//!
//! ```text
//! list-of-all-photo.txt        # one photo source path per line
//! markdown/
//! ├── index.md                 # index source, with placeholder code blocks
//! ├── 1.md                     # essay pages, numeric order
//! └── 2.md
//! docs/                        # output (pages, index.html, media/)
//! ```
//!
//! builds with no config file at all. Run `contact-sheet gen-config` for a
//! documented stock config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Site configuration, deserialized from `contact-sheet.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Newline-delimited listing of every available photo source path.
    pub photo_list: PathBuf,
    /// Directory holding the markdown sources, including `index.md`.
    pub source_dir: PathBuf,
    /// Directory the site is written into.
    pub output_dir: PathBuf,
    /// Stylesheet href embedded in every page's preamble.
    pub stylesheet: String,
    /// Explicit page order (filenames relative to `source_dir`). When empty,
    /// pages are discovered: every `*.md` except `index.md`, ordered by
    /// numeric stem, then by name.
    pub pages: Vec<String>,
    pub local_preview: LocalPreview,
}

/// Prefix rewrite applied to photo source paths in local-preview mode.
///
/// The defaults turn a WSL mount path into a Windows file URL, which is
/// where this workflow was born; both sides are configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalPreview {
    pub path_prefix: String,
    pub url_prefix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            photo_list: PathBuf::from("list-of-all-photo.txt"),
            source_dir: PathBuf::from("markdown"),
            output_dir: PathBuf::from("docs"),
            stylesheet: "style.css".to_string(),
            pages: Vec::new(),
            local_preview: LocalPreview::default(),
        }
    }
}

impl Default for LocalPreview {
    fn default() -> Self {
        LocalPreview {
            path_prefix: "/mnt/c".to_string(),
            url_prefix: "file://C:".to_string(),
        }
    }
}

/// Load configuration from `path`, falling back to defaults if the file
/// does not exist. A present-but-invalid file is an error, not a fallback.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    if !path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// A documented stock config with every option at its default.
pub fn stock_config_toml() -> &'static str {
    r#"# contact-sheet configuration
# Every key is optional; this file shows the defaults.

# Newline-delimited listing of every available photo source path.
# Basenames must be unique across the whole file.
photo_list = "list-of-all-photo.txt"

# Markdown sources. Must contain index.md; essay pages live alongside it.
source_dir = "markdown"

# Output directory for pages, index.html, and published media paths.
output_dir = "docs"

# Stylesheet href written into every page's preamble.
stylesheet = "style.css"

# Explicit page order (filenames relative to source_dir). Order is
# preserved verbatim in the table of contents. Leave empty to discover
# pages automatically: every *.md except index.md, numeric stems first.
pages = []

# Local-preview mode (--local-paths) rewrites this path prefix on photo
# sources to a browser-openable URL prefix instead of publishing media.
[local_preview]
path_prefix = "/mnt/c"
url_prefix = "file://C:"
"#
}

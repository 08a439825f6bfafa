//! The batch driver.
//!
//! Drives the whole compile: photo library, page loop, accumulation, index.
//! Strictly sequential: one page is fully parsed, rewritten, and rendered
//! before the next begins, and the index runs last because it consumes the
//! aggregate. Any failure aborts the batch; pages already written stay on
//! disk (there is no transactional cleanup).
//!
//! ```text
//! photo listing ──▶ PhotoLibrary ──▶ MediaResolver
//!                                        │
//! markdown/N.md ──▶ page::compile_page ──┴──▶ docs/N.html
//!                        │ (title, asides, images, originals)
//!                        ▼
//! markdown/index.md ──▶ index::compile_index ──▶ docs/index.html
//! ```
//!
//! Page order comes from the config's explicit `pages` list, or from
//! discovery (numeric stems first) when the list is empty. That order is
//! significant: the table of contents and photo list preserve it verbatim.

use crate::ast;
use crate::config::SiteConfig;
use crate::index::{self, IndexError, PhotoList, TocEntry};
use crate::media::{MediaError, MediaMode, MediaResolver, PhotoLibrary};
use crate::page::{self, CompileError};
use crate::pandoc::Converter;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error("page source not found: {}", .0.display())]
    MissingSource(PathBuf),
}

/// Run-mode switches, straight from the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Resolve images to local file URLs instead of published media paths.
    pub local_paths: bool,
    /// Print the ImageMagick conversion batch to stdout.
    pub convert_script: bool,
}

/// Per-page line of the build summary.
#[derive(Debug)]
pub struct PageSummary {
    pub url: String,
    pub title: String,
    pub asides: usize,
    pub images: usize,
}

/// What a build produced, for operator output.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub pages: Vec<PageSummary>,
    pub photo_count: usize,
}

/// Compile the whole site.
pub fn build(
    config: &SiteConfig,
    converter: &dyn Converter,
    options: &BuildOptions,
) -> Result<BuildReport, BuildError> {
    let library = PhotoLibrary::load(&config.photo_list)?;
    let mode = if options.local_paths {
        MediaMode::LocalPreview
    } else {
        MediaMode::Publish
    };
    let resolver = MediaResolver::new(library, mode, config);
    let preamble = page::preamble(&config.stylesheet);
    let sources = page_sources(config)?;

    fs::create_dir_all(&config.output_dir)?;

    let mut report = BuildReport::default();
    let mut entries: Vec<TocEntry> = Vec::new();
    let mut photos: PhotoList = Vec::new();
    let mut original_media: Vec<String> = Vec::new();

    for source in &sources {
        let compiled = page::compile_page(source, converter, &resolver, &preamble)?;

        for image in &compiled.images {
            photos.push((
                format!("{}#{}", compiled.url, image.id),
                image.href.clone(),
            ));
        }

        fs::write(config.output_dir.join(&compiled.url), &compiled.html)?;

        report.pages.push(PageSummary {
            url: compiled.url.clone(),
            title: ast::inline_text(&compiled.title),
            asides: compiled.asides.len(),
            images: compiled.images.len(),
        });
        entries.push(TocEntry {
            url: compiled.url,
            title: compiled.title,
            asides: compiled.asides,
            image_count: compiled.images.len(),
        });
        original_media.extend(compiled.original_media);
    }

    if options.convert_script {
        // One command per original reference, in reference order. Local
        // preview converts nothing, so the batch is empty there.
        for name in &original_media {
            if let Some(command) = resolver.convert_command(name)? {
                println!("{command}");
                println!();
            }
        }
    }

    let index_html = index::compile_index(
        &config.source_dir.join("index.md"),
        converter,
        &entries,
        &photos,
        &preamble,
    )?;
    fs::write(config.output_dir.join("index.html"), index_html)?;

    report.photo_count = photos.len();
    Ok(report)
}

/// What a check run verified.
#[derive(Debug)]
pub struct CheckReport {
    pub photo_count: usize,
    pub page_sources: Vec<PathBuf>,
}

/// Validate inputs without compiling: photo listing uniqueness, page and
/// index sources present.
pub fn check(config: &SiteConfig) -> Result<CheckReport, BuildError> {
    let library = PhotoLibrary::load(&config.photo_list)?;
    let sources = page_sources(config)?;
    for source in &sources {
        if !source.exists() {
            return Err(BuildError::MissingSource(source.clone()));
        }
    }
    let index_source = config.source_dir.join("index.md");
    if !index_source.exists() {
        return Err(BuildError::MissingSource(index_source));
    }
    Ok(CheckReport {
        photo_count: library.len(),
        page_sources: sources,
    })
}

/// The ordered page sources: the config's explicit list, or discovery.
///
/// Discovery takes every `*.md` under `source_dir` except `index.md`,
/// ordered by numeric stem where there is one (`2.md` before `10.md`),
/// then by name.
fn page_sources(config: &SiteConfig) -> Result<Vec<PathBuf>, BuildError> {
    if !config.pages.is_empty() {
        return Ok(config
            .pages
            .iter()
            .map(|name| config.source_dir.join(name))
            .collect());
    }

    let mut names: Vec<String> = fs::read_dir(&config.source_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| {
            name != "index.md"
                && std::path::Path::new(name)
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("md"))
                    .unwrap_or(false)
        })
        .collect();
    names.sort_by_key(|name| {
        let numeric = crate::media::stem(name).parse::<u32>().unwrap_or(u32::MAX);
        (numeric, name.clone())
    });

    Ok(names
        .into_iter()
        .map(|name| config.source_dir.join(name))
        .collect())
}

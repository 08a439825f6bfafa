//! Photo listing and media path resolution.
//!
//! The photo inventory is a flat listing file (the product of something
//! like `ls photos/* more-photos/* > list-of-all-photo.txt`), one source
//! path per line. Pages refer to photos by basename, so basenames must be
//! unique across the entire listing, enforced at load before any page is
//! compiled.
//!
//! ## Resolution Modes
//!
//! - **Publish** (the default): a referenced `.jpg` resolves to
//!   `media/<stem>.webp` under the output directory, together with the
//!   ImageMagick command that performs the conversion. The resolver only
//!   computes the command; `--convert-script` prints the batch for
//!   external execution. Any non-`.jpg` source is a fatal unsupported-media
//!   error naming the file.
//! - **Local preview**: resolves straight to the source file on disk as a
//!   URL (with a configured path-prefix → URL-prefix rewrite), so a build
//!   can be eyeballed in a browser without converting anything.

use crate::config::SiteConfig;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("duplicate photo basename \"{name}\": {} and {}", .first.display(), .second.display())]
    DuplicateBasename {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("no listed photo matches \"{0}\"")]
    UnknownMedia(String),
    #[error("unsupported media type: \"{0}\" (only .jpg sources can be published)")]
    UnsupportedMedia(String),
}

/// Basename of a path with its final extension stripped.
///
/// `media/sunset.webp` → `sunset`. This is the id generator for published
/// media and page URLs alike.
pub fn stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The photo inventory: `basename -> source path`, unique by construction.
#[derive(Debug)]
pub struct PhotoLibrary {
    by_basename: BTreeMap<String, PathBuf>,
}

impl PhotoLibrary {
    /// Load the newline-delimited listing file. Blank lines are skipped;
    /// entries are trimmed. Fails on the first duplicate basename.
    pub fn load(listing: &Path) -> Result<Self, MediaError> {
        let content = std::fs::read_to_string(listing)?;
        Self::from_paths(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(PathBuf::from),
        )
    }

    /// Build a library from an explicit path sequence.
    pub fn from_paths<I>(paths: I) -> Result<Self, MediaError>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut by_basename = BTreeMap::new();
        for path in paths {
            let name = path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            if let Some(first) = by_basename.insert(name.clone(), path.clone()) {
                return Err(MediaError::DuplicateBasename {
                    name,
                    first,
                    second: path,
                });
            }
        }
        Ok(PhotoLibrary { by_basename })
    }

    /// Source path for a referenced basename.
    pub fn lookup(&self, name: &str) -> Result<&Path, MediaError> {
        self.by_basename
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| MediaError::UnknownMedia(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_basename.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_basename.is_empty()
    }
}

/// How referenced media is resolved to an output href.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaMode {
    Publish,
    LocalPreview,
}

/// Resolves page-referenced media names to output hrefs, and (in publish
/// mode) to the external conversion commands that make them real.
#[derive(Debug)]
pub struct MediaResolver {
    library: PhotoLibrary,
    mode: MediaMode,
    output_dir: PathBuf,
    path_prefix: String,
    url_prefix: String,
}

impl MediaResolver {
    pub fn new(library: PhotoLibrary, mode: MediaMode, config: &SiteConfig) -> Self {
        MediaResolver {
            library,
            mode,
            output_dir: config.output_dir.clone(),
            path_prefix: config.local_preview.path_prefix.clone(),
            url_prefix: config.local_preview.url_prefix.clone(),
        }
    }

    pub fn mode(&self) -> MediaMode {
        self.mode
    }

    pub fn library(&self) -> &PhotoLibrary {
        &self.library
    }

    /// The href an image reference is rewritten to.
    pub fn resolve(&self, name: &str) -> Result<String, MediaError> {
        let source = self.library.lookup(name)?;
        match self.mode {
            MediaMode::Publish => published_href(source),
            MediaMode::LocalPreview => {
                let raw = source.to_string_lossy();
                Ok(match raw.strip_prefix(&self.path_prefix) {
                    Some(rest) => format!("{}{}", self.url_prefix, rest),
                    None => raw.into_owned(),
                })
            }
        }
    }

    /// The conversion command for a referenced name, if this mode converts
    /// at all. Local preview serves originals in place, so: `None`.
    pub fn convert_command(&self, name: &str) -> Result<Option<ConvertCommand>, MediaError> {
        match self.mode {
            MediaMode::LocalPreview => Ok(None),
            MediaMode::Publish => {
                let source = self.library.lookup(name)?;
                let href = published_href(source)?;
                Ok(Some(ConvertCommand {
                    source: source.to_path_buf(),
                    dest: self.output_dir.join(href),
                }))
            }
        }
    }
}

/// Published location for a source photo: `media/<stem>.webp`.
///
/// Only `.jpg` sources (case-insensitive) are handled; everything else is
/// rejected rather than guessed at.
fn published_href(source: &Path) -> Result<String, MediaError> {
    let name = source
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !name.to_lowercase().ends_with(".jpg") {
        return Err(MediaError::UnsupportedMedia(name));
    }
    Ok(format!("media/{}.webp", stem(&name)))
}

/// An ImageMagick invocation that converts one source photo into its
/// published location. Computed here, executed elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertCommand {
    pub source: PathBuf,
    pub dest: PathBuf,
}

impl fmt::Display for ConvertCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "convert -verbose -auto-orient \"{}\" \"{}\"",
            self.source.display(),
            self.dest.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn publish_resolver(paths: &[&str]) -> MediaResolver {
        let library = PhotoLibrary::from_paths(paths.iter().map(PathBuf::from)).unwrap();
        MediaResolver::new(library, MediaMode::Publish, &SiteConfig::default())
    }

    fn local_resolver(paths: &[&str]) -> MediaResolver {
        let library = PhotoLibrary::from_paths(paths.iter().map(PathBuf::from)).unwrap();
        MediaResolver::new(library, MediaMode::LocalPreview, &SiteConfig::default())
    }

    // =========================================================================
    // Library loading and uniqueness
    // =========================================================================

    #[test]
    fn load_reads_one_path_per_line() {
        let dir = TempDir::new().unwrap();
        let listing = dir.path().join("list.txt");
        fs::write(&listing, "/photos/a.jpg\n/photos/b.jpg\n\n  /photos/c.jpg  \n").unwrap();
        let library = PhotoLibrary::load(&listing).unwrap();
        assert_eq!(library.len(), 3);
        assert_eq!(library.lookup("c.jpg").unwrap(), Path::new("/photos/c.jpg"));
    }

    #[test]
    fn duplicate_basenames_fail_at_load() {
        let err = PhotoLibrary::from_paths(
            ["/one/foo.jpg", "/two/foo.jpg"].iter().map(PathBuf::from),
        )
        .unwrap_err();
        match err {
            MediaError::DuplicateBasename { name, first, second } => {
                assert_eq!(name, "foo.jpg");
                assert_eq!(first, PathBuf::from("/one/foo.jpg"));
                assert_eq!(second, PathBuf::from("/two/foo.jpg"));
            }
            other => panic!("expected DuplicateBasename, got {other:?}"),
        }
    }

    #[test]
    fn lookup_of_unlisted_name_fails() {
        let resolver = publish_resolver(&["/photos/foo.jpg"]);
        assert!(matches!(
            resolver.resolve("missing.jpg"),
            Err(MediaError::UnknownMedia(name)) if name == "missing.jpg"
        ));
    }

    // =========================================================================
    // Publish mode
    // =========================================================================

    #[test]
    fn publish_maps_jpg_to_webp_under_media() {
        let resolver = publish_resolver(&["/photos/sunset.jpg"]);
        assert_eq!(resolver.resolve("sunset.jpg").unwrap(), "media/sunset.webp");
    }

    #[test]
    fn publish_accepts_uppercase_extension() {
        let resolver = publish_resolver(&["/photos/LOUD.JPG"]);
        assert_eq!(resolver.resolve("LOUD.JPG").unwrap(), "media/LOUD.webp");
    }

    #[test]
    fn publish_rejects_other_extensions() {
        let resolver = publish_resolver(&["/photos/clip.mov"]);
        assert!(matches!(
            resolver.resolve("clip.mov"),
            Err(MediaError::UnsupportedMedia(name)) if name == "clip.mov"
        ));
    }

    #[test]
    fn convert_command_targets_output_dir() {
        let resolver = publish_resolver(&["/photos/sunset.jpg"]);
        let command = resolver.convert_command("sunset.jpg").unwrap().unwrap();
        assert_eq!(
            command.to_string(),
            "convert -verbose -auto-orient \"/photos/sunset.jpg\" \"docs/media/sunset.webp\""
        );
    }

    // =========================================================================
    // Local-preview mode
    // =========================================================================

    #[test]
    fn local_mode_rewrites_configured_prefix() {
        let resolver = local_resolver(&["/mnt/c/Photos/foo.jpg"]);
        assert_eq!(
            resolver.resolve("foo.jpg").unwrap(),
            "file://C:/Photos/foo.jpg"
        );
    }

    #[test]
    fn local_mode_leaves_other_paths_alone() {
        let resolver = local_resolver(&["/srv/photos/foo.jpg"]);
        assert_eq!(resolver.resolve("foo.jpg").unwrap(), "/srv/photos/foo.jpg");
    }

    #[test]
    fn local_mode_produces_no_convert_commands() {
        let resolver = local_resolver(&["/mnt/c/Photos/foo.jpg"]);
        assert_eq!(resolver.convert_command("foo.jpg").unwrap(), None);
    }

    // =========================================================================
    // stem
    // =========================================================================

    #[test]
    fn stem_strips_directory_and_extension() {
        assert_eq!(stem("media/sunset.webp"), "sunset");
        assert_eq!(stem("/photos/trip/001.jpg"), "001");
        assert_eq!(stem("plain"), "plain");
    }
}

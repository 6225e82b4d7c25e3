//! Output path derivation and persistence
//!
//! Every fetched URL maps to one `(directory, filename)` pair under the output
//! root. The URL path supplies both: its directory component becomes the
//! directory and its last segment the file name. Extensionless names become
//! `index<ext>`, with the extension taken from the response Content-Type.
//!
//! Query strings are ignored, so `/a?x=1` and `/a?x=2` share a file and the
//! last write wins. An extensionless page and its parent directory also share
//! a file: `/blog/` and `/blog/post` both map to `blog/index.html`.

use crate::MirrorError;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Extension used when the Content-Type gives nothing better
const DEFAULT_EXTENSION: &str = "html";

/// Extensions preferred over the first `mime_guess` candidate
const PREFERRED_EXTENSIONS: &[(&str, &str)] = &[
    ("text/html", "html"),
    ("application/xhtml+xml", "html"),
    ("text/css", "css"),
    ("application/javascript", "js"),
    ("text/javascript", "js"),
    ("application/json", "json"),
    ("application/xml", "xml"),
    ("text/xml", "xml"),
    ("text/plain", "txt"),
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/svg+xml", "svg"),
    ("image/x-icon", "ico"),
    ("image/vnd.microsoft.icon", "ico"),
];

/// Where one fetched resource is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    /// Directory under the output root
    pub dir: PathBuf,

    /// File name, always with a non-empty extension
    pub filename: String,
}

impl OutputLocation {
    /// Returns the full file path
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }
}

/// Maps URLs to locations under an output root
#[derive(Debug, Clone)]
pub struct PathMapper {
    root: PathBuf,
}

impl PathMapper {
    /// Creates a mapper writing under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the output root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Derives the output location for a URL without touching the filesystem
    ///
    /// Path segments are percent-decoded. Empty, `.` and `..` segments are
    /// dropped and separators inside a segment are replaced with `_`, so the
    /// result never leaves the root.
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_mirror::output::PathMapper;
    /// use std::path::Path;
    /// use url::Url;
    ///
    /// let mapper = PathMapper::new("dump");
    /// let url = Url::parse("https://example.com/blog/").unwrap();
    /// let location = mapper.locate(&url, "text/html; charset=UTF-8");
    /// assert_eq!(location.dir, Path::new("dump/blog"));
    /// assert_eq!(location.filename, "index.html");
    /// ```
    pub fn locate(&self, url: &Url, content_type: &str) -> OutputLocation {
        let raw_path = url.path();
        let mut segments: Vec<String> = raw_path.split('/').filter_map(sanitize_segment).collect();

        let base = if raw_path.ends_with('/') {
            None
        } else {
            segments.pop()
        };

        let filename = match base {
            Some(name) if has_extension(&name) => name,
            _ => format!("index.{}", extension_for(content_type)),
        };

        let dir = segments
            .iter()
            .fold(self.root.clone(), |dir, segment| dir.join(segment));

        OutputLocation { dir, filename }
    }

    /// Derives the output location and makes sure its directory exists
    ///
    /// # Arguments
    ///
    /// * `url` - The final URL of the fetched resource
    /// * `content_type` - The response Content-Type, used for extensionless names
    ///
    /// # Returns
    ///
    /// * `Ok(OutputLocation)` - Location whose directory now exists
    /// * `Err(MirrorError::DirectoryCreate)` - The directory could not be created
    pub fn map_path(&self, url: &Url, content_type: &str) -> Result<OutputLocation, MirrorError> {
        let location = self.locate(url, content_type);
        fs::create_dir_all(&location.dir).map_err(|source| MirrorError::DirectoryCreate {
            path: location.dir.clone(),
            source,
        })?;
        Ok(location)
    }
}

/// Writes bytes to a location, replacing any existing file
pub fn write_resource(location: &OutputLocation, bytes: &[u8]) -> Result<(), MirrorError> {
    let path = location.path();
    fs::write(&path, bytes).map_err(|source| MirrorError::Write { path, source })
}

/// Returns the file extension for a Content-Type, without the leading dot
///
/// `htm` is normalized to `html`; unknown or missing types give `html`.
pub fn extension_for(content_type: &str) -> &'static str {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    let extension = PREFERRED_EXTENSIONS
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, ext)| *ext)
        .or_else(|| {
            mime_guess::get_mime_extensions_str(&essence)
                .and_then(|extensions| extensions.first().copied())
        })
        .unwrap_or(DEFAULT_EXTENSION);

    if extension == "htm" {
        "html"
    } else {
        extension
    }
}

fn has_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| !ext.is_empty())
}

fn sanitize_segment(segment: &str) -> Option<String> {
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    if decoded.is_empty() || decoded == "." || decoded == ".." {
        return None;
    }

    Some(decoded.replace(['/', '\\', '\0'], "_"))
}

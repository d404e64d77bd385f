//! Document models for AVID package contents.
//!
//! A document is addressed inside the package's `Documents` tree by a
//! `collection/id/filename` path. The same path shape is used as the key in
//! both the document catalog and the checksum index, so the two can be
//! cross-referenced without touching the filesystem.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Bucket name for documents whose original filename has no extension.
pub const NO_EXTENSION: &str = "no_extension";

/// Relative path of a stored document, forward-slash separated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentPath(String);

impl DocumentPath {
    /// Build a path from its segments, joined with `/`.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        let joined = segments
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join("/");
        Self(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Single-token filename used for the copied example.
    ///
    /// `docCollection1/1/1.tif` becomes `docCollection1_1_1.tif`.
    pub fn flattened(&self) -> String {
        self.segments().collect::<Vec<_>>().join("_")
    }

    /// Locate this document under a root directory.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        self.segments()
            .fold(root.to_path_buf(), |path, segment| path.join(segment))
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentPath {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One entry of the document index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    /// Normalized extension of the original filename.
    pub extension: String,
    /// Storage collection (`dCf`).
    pub collection: String,
    /// Storage id (`dID`).
    pub id: String,
    /// Stored format (`aFt`), e.g. `tif`.
    pub stored_format: String,
}

impl DocumentRecord {
    pub fn new(original_filename: &str, collection: &str, id: &str, stored_format: &str) -> Self {
        Self {
            extension: normalize_extension(original_filename),
            collection: collection.to_string(),
            id: id.to_string(),
            stored_format: stored_format.to_string(),
        }
    }

    /// Location of the stored file relative to the `Documents` tree.
    ///
    /// Archived documents always use `1` as the stored file stem.
    pub fn path(&self) -> DocumentPath {
        let filename = format!("1.{}", self.stored_format);
        DocumentPath::from_segments(&[
            self.collection.as_str(),
            self.id.as_str(),
            filename.as_str(),
        ])
    }
}

/// Derive the bucket key from an original (pre-archival) filename.
///
/// Original filenames come from many systems, so both `/` and `\` are
/// treated as separators. Hidden-file style names (`.profile`) and names
/// ending in `.` have no extension.
pub fn normalize_extension(original_filename: &str) -> String {
    let name = original_filename
        .trim()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("");

    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => name[idx + 1..].to_lowercase(),
        _ => NO_EXTENSION.to_string(),
    }
}

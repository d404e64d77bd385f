//! File inventory (`fileIndex.xml`) parsing.
//!
//! The inventory lists every stored file in the package together with its
//! MD5 checksum. Only files under the document storage root are indexed;
//! the rest (index files, schemas, context documentation) are outside the
//! sampled region and are skipped.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use super::xml::{self, field, required_field};
use super::{IndexError, IndexKind};
use crate::models::DocumentPath;

/// Mapping from document path to content checksum.
#[derive(Debug, Clone, Default)]
pub struct ChecksumIndex {
    entries: HashMap<DocumentPath, String>,
    duplicates: usize,
}

impl ChecksumIndex {
    /// Read and parse a file inventory from disk.
    pub fn from_file(path: &Path, storage_root: &str) -> Result<Self, IndexError> {
        let contents = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
            kind: IndexKind::File,
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, storage_root).map_err(|e| e.in_file(path))
    }

    /// Parse a file inventory.
    ///
    /// `storage_root` is the name of the package's document folder
    /// (normally `Documents`). An entry is indexed only when that name is the
    /// third-from-last segment of its folder path.
    pub fn parse(xml: &str, storage_root: &str) -> Result<Self, IndexError> {
        let doc = xml::parse(xml, IndexKind::File)?;
        let mut index = Self::default();
        let mut skipped = 0usize;

        for (i, record) in xml::records(&doc).enumerate() {
            let number = i + 1;
            let folder = required_field(record, IndexKind::File, number, "foN")?;
            let filename = required_field(record, IndexKind::File, number, "fiN")?;
            let checksum = field(record, IndexKind::File, number, "md5")?;

            let Some(path) = document_path(folder, filename, storage_root) else {
                debug!("Skipping {}\\{}: outside {}", folder, filename, storage_root);
                skipped += 1;
                continue;
            };

            index.insert(path, checksum);
        }

        info!(
            "Indexed {} checksums ({} entries outside {}, {} duplicates)",
            index.entries.len(),
            skipped,
            storage_root,
            index.duplicates
        );

        Ok(index)
    }

    /// Insert a checksum; the first occurrence of a path wins.
    ///
    /// An empty checksum leaves the path unknown.
    fn insert(&mut self, path: DocumentPath, checksum: &str) {
        let checksum = checksum.trim();
        if checksum.is_empty() {
            debug!("No checksum for {}", path);
            return;
        }
        if let Some(existing) = self.entries.get(&path) {
            warn!(
                "Duplicate file index entry for {} (keeping {}, ignoring {})",
                path, existing, checksum
            );
            self.duplicates += 1;
            return;
        }
        self.entries.insert(path, checksum.to_lowercase());
    }

    /// Checksum for a document path, if the inventory lists it.
    pub fn get(&self, path: &DocumentPath) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of inventory entries ignored because their path was already indexed.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

impl FromIterator<(DocumentPath, String)> for ChecksumIndex {
    fn from_iter<T: IntoIterator<Item = (DocumentPath, String)>>(iter: T) -> Self {
        let mut index = Self::default();
        for (path, checksum) in iter {
            index.insert(path, &checksum);
        }
        index
    }
}

/// Key a stored file the same way the document catalog does.
///
/// `AVID.SA.18000.1\Documents\docCollection1\1` + `1.tif` becomes
/// `docCollection1/1/1.tif`.
fn document_path(folder: &str, filename: &str, storage_root: &str) -> Option<DocumentPath> {
    let segments: Vec<&str> = folder
        .split(['\\', '/'])
        .filter(|s| !s.is_empty())
        .collect();

    if segments.len() < 3 || segments[segments.len() - 3] != storage_root {
        return None;
    }

    let tail = &segments[segments.len() - 2..];
    Some(DocumentPath::from_segments(&[tail[0], tail[1], filename]))
}

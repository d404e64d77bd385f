//! Document index (`docIndex.xml`) parsing.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use super::xml::{self, field, required_field};
use super::{IndexError, IndexKind};
use crate::models::{DocumentPath, DocumentRecord};

/// Candidate documents grouped by original file extension.
///
/// Each bucket keeps document-index order. Nothing is capped or
/// deduplicated here; selection is the sampler's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentCatalog {
    buckets: BTreeMap<String, Vec<DocumentPath>>,
}

impl DocumentCatalog {
    /// Read and parse a document index from disk.
    pub fn from_file(path: &Path) -> Result<Self, IndexError> {
        let contents = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
            kind: IndexKind::Document,
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|e| e.in_file(path))
    }

    pub fn parse(xml: &str) -> Result<Self, IndexError> {
        let doc = xml::parse(xml, IndexKind::Document)?;
        let mut catalog = Self::default();

        for (i, node) in xml::records(&doc).enumerate() {
            let number = i + 1;
            let record = DocumentRecord::new(
                field(node, IndexKind::Document, number, "oFn")?,
                required_field(node, IndexKind::Document, number, "dCf")?,
                required_field(node, IndexKind::Document, number, "dID")?,
                required_field(node, IndexKind::Document, number, "aFt")?,
            );
            catalog.push(record);
        }

        info!(
            "Catalogued {} documents across {} extensions",
            catalog.document_count(),
            catalog.extension_count()
        );

        Ok(catalog)
    }

    pub fn push(&mut self, record: DocumentRecord) {
        let path = record.path();
        self.buckets.entry(record.extension).or_default().push(path);
    }

    /// Candidates for an extension, in document-index order.
    pub fn get(&self, extension: &str) -> Option<&[DocumentPath]> {
        self.buckets.get(extension).map(Vec::as_slice)
    }

    /// Buckets in extension order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DocumentPath])> {
        self.buckets
            .iter()
            .map(|(ext, paths)| (ext.as_str(), paths.as_slice()))
    }

    pub fn extension_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn document_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Number of candidates per extension.
    pub fn histogram(&self) -> BTreeMap<String, usize> {
        self.buckets
            .iter()
            .map(|(ext, paths)| (ext.clone(), paths.len()))
            .collect()
    }
}

impl FromIterator<DocumentRecord> for DocumentCatalog {
    fn from_iter<T: IntoIterator<Item = DocumentRecord>>(iter: T) -> Self {
        let mut catalog = Self::default();
        for record in iter {
            catalog.push(record);
        }
        catalog
    }
}

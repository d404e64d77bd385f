//! Read-only reports over the package indices.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::index::{ChecksumIndex, DocumentCatalog};

/// Number of candidate documents per extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Histogram {
    pub extensions: BTreeMap<String, usize>,
    pub total: usize,
}

impl Histogram {
    pub fn from_catalog(catalog: &DocumentCatalog) -> Self {
        Self {
            extensions: catalog.histogram(),
            total: catalog.document_count(),
        }
    }
}

/// Documents sharing one checksum, grouped by extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecksumReport {
    pub checksum: String,
    pub by_extension: BTreeMap<String, usize>,
    pub total: usize,
}

/// Count catalogued documents whose content matches `checksum`.
///
/// Comparison is case-insensitive; extensions without matches are omitted.
pub fn checksum_matches(
    catalog: &DocumentCatalog,
    checksums: &ChecksumIndex,
    checksum: &str,
) -> ChecksumReport {
    let wanted = checksum.trim().to_lowercase();
    let mut by_extension = BTreeMap::new();

    for (extension, paths) in catalog.iter() {
        let count = paths
            .iter()
            .filter(|p| checksums.get(p) == Some(wanted.as_str()))
            .count();
        if count > 0 {
            by_extension.insert(extension.to_string(), count);
        }
    }

    let total = by_extension.values().sum();
    ChecksumReport {
        checksum: wanted,
        by_extension,
        total,
    }
}

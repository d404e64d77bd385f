//! Example selection.
//!
//! For each extension bucket, walks the catalog's candidates in document-index
//! order and greedily accepts documents whose content has not been seen yet,
//! until the per-extension cap is reached. Candidates the file index has no
//! checksum for are always accepted: without a checksum there is no proof two
//! files are identical.

use std::collections::{BTreeMap, HashSet};
use std::num::NonZeroUsize;

use serde::Serialize;
use tracing::{debug, info};

use crate::index::{ChecksumIndex, DocumentCatalog};
use crate::models::DocumentPath;

/// Selected examples per extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SampleSet {
    samples: BTreeMap<String, Vec<DocumentPath>>,
}

impl SampleSet {
    pub fn get(&self, extension: &str) -> Option<&[DocumentPath]> {
        self.samples.get(extension).map(Vec::as_slice)
    }

    /// Selections in extension order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DocumentPath])> {
        self.samples
            .iter()
            .map(|(ext, paths)| (ext.as_str(), paths.as_slice()))
    }

    pub fn extension_count(&self) -> usize {
        self.samples.len()
    }

    /// Total number of selected examples across all extensions.
    pub fn total(&self) -> usize {
        self.samples.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Select up to `max_examples` distinct examples per extension.
pub fn sample(
    catalog: &DocumentCatalog,
    checksums: &ChecksumIndex,
    max_examples: NonZeroUsize,
) -> SampleSet {
    let samples: BTreeMap<String, Vec<DocumentPath>> = catalog
        .iter()
        .map(|(extension, candidates)| {
            let selected = select(extension, candidates, checksums, max_examples.get());
            (extension.to_string(), selected)
        })
        .collect();

    let set = SampleSet { samples };
    info!(
        "Selected {} examples across {} extensions (max {} each)",
        set.total(),
        set.extension_count(),
        max_examples
    );
    set
}

fn select(
    extension: &str,
    candidates: &[DocumentPath],
    checksums: &ChecksumIndex,
    cap: usize,
) -> Vec<DocumentPath> {
    let mut selected = Vec::with_capacity(cap.min(candidates.len()));
    let mut seen: HashSet<&str> = HashSet::new();

    for path in candidates {
        if selected.len() >= cap {
            break;
        }

        match checksums.get(path) {
            Some(checksum) if seen.contains(checksum) => {
                debug!("[{}] skipping {}: duplicate content {}", extension, path, checksum);
            }
            Some(checksum) => {
                seen.insert(checksum);
                selected.push(path.clone());
            }
            None => selected.push(path.clone()),
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentRecord;

    fn cap(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn catalog(records: &[(&str, &str)]) -> DocumentCatalog {
        records
            .iter()
            .map(|(original, id)| DocumentRecord::new(original, "docCollection1", id, "tif"))
            .collect()
    }

    fn checksums(entries: &[(&str, &str)]) -> ChecksumIndex {
        entries
            .iter()
            .map(|(id, md5)| {
                (
                    DocumentPath::from(format!("docCollection1/{id}/1.tif").as_str()),
                    md5.to_string(),
                )
            })
            .collect()
    }

    fn ids(set: &SampleSet, extension: &str) -> Vec<String> {
        set.get(extension)
            .unwrap_or_default()
            .iter()
            .map(|p| p.segments().nth(1).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_sample_caps_each_extension() {
        let catalog = catalog(&[
            ("a.pdf", "1"),
            ("b.pdf", "2"),
            ("c.pdf", "3"),
            ("d.pdf", "4"),
            ("e.odt", "5"),
        ]);
        let set = sample(&catalog, &ChecksumIndex::default(), cap(3));

        assert_eq!(ids(&set, "pdf"), vec!["1", "2", "3"]);
        assert_eq!(ids(&set, "odt"), vec!["5"]);
        assert_eq!(set.total(), 4);
    }

    #[test]
    fn test_sample_skips_duplicate_checksum() {
        let catalog = catalog(&[("a.odt", "1"), ("b.odt", "2"), ("c.odt", "3")]);
        let index = checksums(&[("1", "same"), ("2", "same"), ("3", "other")]);
        let set = sample(&catalog, &index, cap(2));

        assert_eq!(ids(&set, "odt"), vec!["1", "3"]);
    }

    #[test]
    fn test_sample_unknown_checksums_never_collide() {
        let catalog = catalog(&[("a.odt", "1"), ("b.odt", "2"), ("c.odt", "3")]);
        let index = checksums(&[("3", "known")]);
        let set = sample(&catalog, &index, cap(5));

        assert_eq!(ids(&set, "odt"), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_sample_dedup_is_per_extension() {
        let catalog = catalog(&[("a.odt", "1"), ("b.pdf", "2")]);
        let index = checksums(&[("1", "same"), ("2", "same")]);
        let set = sample(&catalog, &index, cap(1));

        assert_eq!(ids(&set, "odt"), vec!["1"]);
        assert_eq!(ids(&set, "pdf"), vec!["2"]);
    }

    #[test]
    fn test_sample_preserves_catalog_order() {
        let catalog = catalog(&[
            ("a.tif", "9"),
            ("b.tif", "4"),
            ("c.tif", "7"),
            ("d.tif", "1"),
        ]);
        let index = checksums(&[("9", "x"), ("4", "x"), ("7", "y"), ("1", "z")]);
        let set = sample(&catalog, &index, cap(10));

        assert_eq!(ids(&set, "tif"), vec!["9", "7", "1"]);
    }

    #[test]
    fn test_sample_properties_hold_for_every_cap() {
        let catalog = catalog(&[
            ("a.pdf", "1"),
            ("b.pdf", "2"),
            ("c.pdf", "3"),
            ("d.pdf", "4"),
            ("e.pdf", "5"),
            ("f.pdf", "6"),
        ]);
        let index = checksums(&[("1", "a"), ("2", "b"), ("3", "a"), ("5", "b"), ("6", "c")]);

        for m in 1..=7 {
            let set = sample(&catalog, &index, cap(m));
            let picked = set.get("pdf").unwrap();
            assert!(picked.len() <= m);

            let known: Vec<&str> = picked.iter().filter_map(|p| index.get(p)).collect();
            let unique: HashSet<&str> = known.iter().copied().collect();
            assert_eq!(known.len(), unique.len(), "duplicate checksum with cap {m}");

            let positions: Vec<usize> = picked
                .iter()
                .map(|p| catalog.get("pdf").unwrap().iter().position(|c| c == p).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_sample_empty_catalog() {
        let set = sample(&DocumentCatalog::default(), &ChecksumIndex::default(), cap(3));
        assert!(set.is_empty());
        assert_eq!(set.total(), 0);
    }

    #[test]
    fn test_sample_accepts_every_empty_checksum() {
        let catalog = catalog(&[("a.odt", "1"), ("b.odt", "2"), ("c.odt", "3")]);
        let index = checksums(&[("1", ""), ("2", ""), ("3", "known")]);
        let set = sample(&catalog, &index, cap(3));

        assert_eq!(ids(&set, "odt"), vec!["1", "2", "3"]);
    }
}

//! Example copy service.
//!
//! Materializes a [`SampleSet`] on disk: one fresh directory per extension,
//! one flattened copy per selected document. Separated from UI concerns -
//! emits events for progress tracking.

use std::fmt;
use std::fs::{self, File, FileTimes, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::SampleSet;
use crate::models::DocumentPath;
use crate::storage::{extension_dir, numbered_destination};

/// Fatal copy errors.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a selected example was not copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The document is not present under the document root.
    SourceMissing,
    /// Reading, writing or carrying over timestamps failed.
    CopyFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::SourceMissing => f.write_str("source file not found"),
            SkipReason::CopyFailed(message) => write!(f, "copy failed: {}", message),
        }
    }
}

/// A selected example that was skipped.
#[derive(Debug, Clone)]
pub struct SkippedExample {
    pub extension: String,
    pub path: DocumentPath,
    pub reason: SkipReason,
}

/// Events emitted while copying.
#[derive(Debug, Clone)]
pub enum CopyEvent {
    /// An extension directory was created
    DirectoryCreated { extension: String, path: PathBuf },
    /// An example was copied
    Copied {
        extension: String,
        source: PathBuf,
        destination: PathBuf,
    },
    /// An example was skipped
    Skipped(SkippedExample),
}

/// Outcome of a copy run.
#[derive(Debug, Default)]
pub struct CopyReport {
    pub directories: Vec<PathBuf>,
    pub copied: Vec<PathBuf>,
    pub skipped: Vec<SkippedExample>,
}

/// Copies selected examples from a package's document tree.
pub struct Copier {
    documents_root: PathBuf,
    output_root: PathBuf,
}

impl Copier {
    pub fn new(documents_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            documents_root: documents_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Copy every selected example.
    pub fn copy(&self, samples: &SampleSet) -> Result<CopyReport, CopyError> {
        self.copy_with_events(samples, |_| {})
    }

    /// Copy every selected example, reporting progress through `on_event`.
    ///
    /// Extension directories must not exist yet. Failing to create one aborts
    /// the run; directories and files from earlier extensions stay on disk.
    /// Per-file failures are logged and recorded as skipped.
    pub fn copy_with_events<F>(
        &self,
        samples: &SampleSet,
        mut on_event: F,
    ) -> Result<CopyReport, CopyError>
    where
        F: FnMut(CopyEvent),
    {
        let mut report = CopyReport::default();

        for (extension, paths) in samples.iter() {
            let dir = extension_dir(&self.output_root, extension);
            fs::create_dir(&dir).map_err(|source| CopyError::CreateDir {
                path: dir.clone(),
                source,
            })?;
            debug!("Created {}", dir.display());
            report.directories.push(dir.clone());
            on_event(CopyEvent::DirectoryCreated {
                extension: extension.to_string(),
                path: dir.clone(),
            });

            for path in paths {
                match self.copy_one(&dir, path) {
                    Ok((source, destination)) => {
                        report.copied.push(destination.clone());
                        on_event(CopyEvent::Copied {
                            extension: extension.to_string(),
                            source,
                            destination,
                        });
                    }
                    Err(reason) => {
                        warn!("[{}] skipping {}: {}", extension, path, reason);
                        let skipped = SkippedExample {
                            extension: extension.to_string(),
                            path: path.clone(),
                            reason,
                        };
                        report.skipped.push(skipped.clone());
                        on_event(CopyEvent::Skipped(skipped));
                    }
                }
            }
        }

        info!(
            "Copied {} examples into {} directories ({} skipped)",
            report.copied.len(),
            report.directories.len(),
            report.skipped.len()
        );

        Ok(report)
    }

    fn copy_one(
        &self,
        dir: &Path,
        path: &DocumentPath,
    ) -> Result<(PathBuf, PathBuf), SkipReason> {
        let source = path.resolve(&self.documents_root);
        if !source.is_file() {
            return Err(SkipReason::SourceMissing);
        }

        let failed = |e: io::Error| SkipReason::CopyFailed(e.to_string());
        let mut input = File::open(&source).map_err(failed)?;
        let metadata = input.metadata().map_err(failed)?;
        let (destination, mut output) = create_destination(dir, path).map_err(failed)?;

        if let Err(e) = write_copy(&mut input, &mut output, &metadata) {
            drop(output);
            let _ = fs::remove_file(&destination);
            return Err(failed(e));
        }

        debug!("{} -> {}", source.display(), destination.display());
        Ok((source, destination))
    }
}

/// Create a new destination file for `path`, numbering the name when an
/// earlier example in the same directory already flattened to it.
fn create_destination(dir: &Path, path: &DocumentPath) -> io::Result<(PathBuf, File)> {
    let mut attempt = 1;
    loop {
        let destination = numbered_destination(dir, path, attempt);
        match File::options().write(true).create_new(true).open(&destination) {
            Ok(file) => {
                if attempt > 1 {
                    warn!(
                        "{} collides with an earlier example, copying as {}",
                        path,
                        destination.display()
                    );
                }
                return Ok((destination, file));
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}

/// Copy contents, then access and modification times, then permissions.
///
/// Permissions go last so a read-only source does not lock the copy before
/// its times are set.
fn write_copy(input: &mut File, output: &mut File, metadata: &Metadata) -> io::Result<()> {
    io::copy(input, output)?;

    let times = FileTimes::new()
        .set_accessed(metadata.accessed()?)
        .set_modified(metadata.modified()?);
    output.set_times(times)?;
    output.set_permissions(metadata.permissions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{ChecksumIndex, DocumentCatalog};
    use crate::models::DocumentRecord;
    use crate::services::sample;
    use std::num::NonZeroUsize;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    fn write_document(root: &Path, collection: &str, id: &str, content: &[u8]) {
        let dir = root.join(collection).join(id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("1.tif"), content).unwrap();
    }

    fn samples(records: &[DocumentRecord], cap: usize) -> SampleSet {
        let catalog: DocumentCatalog = records.iter().cloned().collect();
        sample(
            &catalog,
            &ChecksumIndex::default(),
            NonZeroUsize::new(cap).unwrap(),
        )
    }

    #[test]
    fn test_copy_flattens_into_extension_dir() {
        let docs = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_document(docs.path(), "docCollection1", "1", b"tiff bytes");

        let set = samples(
            &[DocumentRecord::new("brev.odt", "docCollection1", "1", "tif")],
            1,
        );
        let report = Copier::new(docs.path(), out.path()).copy(&set).unwrap();

        let copied = out.path().join("odt").join("docCollection1_1_1.tif");
        assert!(copied.exists());
        assert_eq!(fs::read(&copied).unwrap(), b"tiff bytes");
        assert_eq!(report.copied, vec![copied]);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_copy_reserved_extension_name() {
        let docs = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_document(docs.path(), "docCollection1", "1", b"x");

        let set = samples(
            &[DocumentRecord::new("device.con", "docCollection1", "1", "tif")],
            1,
        );
        let report = Copier::new(docs.path(), out.path()).copy(&set).unwrap();

        assert_eq!(report.directories, vec![out.path().join("con_ext")]);
        assert!(out
            .path()
            .join("con_ext")
            .join("docCollection1_1_1.tif")
            .exists());
    }

    #[test]
    fn test_copy_skips_missing_source() {
        let docs = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_document(docs.path(), "docCollection1", "2", b"present");

        let set = samples(
            &[
                DocumentRecord::new("a.pdf", "docCollection1", "1", "tif"),
                DocumentRecord::new("b.pdf", "docCollection1", "2", "tif"),
            ],
            2,
        );
        let mut events = Vec::new();
        let report = Copier::new(docs.path(), out.path())
            .copy_with_events(&set, |e| events.push(e))
            .unwrap();

        assert_eq!(report.copied.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::SourceMissing);
        assert_eq!(report.skipped[0].path.as_str(), "docCollection1/1/1.tif");
        assert!(out.path().join("pdf").join("docCollection1_2_1.tif").exists());
        assert_eq!(events.len(), 3);
        assert!(matches!(events[1], CopyEvent::Skipped(_)));
    }

    #[test]
    fn test_copy_existing_directory_is_fatal() {
        let docs = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_document(docs.path(), "docCollection1", "1", b"x");
        fs::create_dir(out.path().join("odt")).unwrap();

        let set = samples(
            &[DocumentRecord::new("a.odt", "docCollection1", "1", "tif")],
            1,
        );
        let err = Copier::new(docs.path(), out.path()).copy(&set).unwrap_err();

        match err {
            CopyError::CreateDir { path, .. } => assert_eq!(path, out.path().join("odt")),
        }
    }

    #[test]
    fn test_copy_preserves_modification_time() {
        let docs = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_document(docs.path(), "docCollection1", "1", b"old");

        let source = docs.path().join("docCollection1").join("1").join("1.tif");
        let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
        File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(past)
            .unwrap();

        let set = samples(
            &[DocumentRecord::new("a.odt", "docCollection1", "1", "tif")],
            1,
        );
        let report = Copier::new(docs.path(), out.path()).copy(&set).unwrap();

        let modified = fs::metadata(&report.copied[0]).unwrap().modified().unwrap();
        assert_eq!(modified, past);
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_read_only_source() {
        use std::os::unix::fs::PermissionsExt;

        let docs = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_document(docs.path(), "docCollection1", "1", b"archived");

        let source = docs.path().join("docCollection1").join("1").join("1.tif");
        let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_200_000_000);
        File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(past)
            .unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o444)).unwrap();

        let set = samples(
            &[DocumentRecord::new("a.odt", "docCollection1", "1", "tif")],
            1,
        );
        let report = Copier::new(docs.path(), out.path()).copy(&set).unwrap();

        assert!(report.skipped.is_empty(), "{:?}", report.skipped);
        assert_eq!(report.copied.len(), 1);
        let copied = &report.copied[0];
        assert_eq!(fs::read(copied).unwrap(), b"archived");
        let metadata = fs::metadata(copied).unwrap();
        assert_eq!(metadata.permissions().mode() & 0o777, 0o444);
        assert_eq!(metadata.modified().unwrap(), past);
    }

    #[test]
    fn test_copy_numbers_colliding_flattened_names() {
        let docs = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_document(docs.path(), "a_b", "1", b"first");
        write_document(docs.path(), "a", "b_1", b"second");

        let set = samples(
            &[
                DocumentRecord::new("x.odt", "a_b", "1", "tif"),
                DocumentRecord::new("y.odt", "a", "b_1", "tif"),
            ],
            2,
        );
        let report = Copier::new(docs.path(), out.path()).copy(&set).unwrap();

        let dir = out.path().join("odt");
        assert_eq!(
            report.copied,
            vec![dir.join("a_b_1_1.tif"), dir.join("a_b_1_1_2.tif")]
        );
        assert_eq!(fs::read(dir.join("a_b_1_1.tif")).unwrap(), b"first");
        assert_eq!(fs::read(dir.join("a_b_1_1_2.tif")).unwrap(), b"second");
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 2);
    }
}

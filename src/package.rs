//! AVID package layout.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::PackageConfig;
use crate::index::{ChecksumIndex, DocumentCatalog, IndexError};

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("AVID package is missing its {what}: {}", path.display())]
    Missing { what: &'static str, path: PathBuf },
}

/// Resolved locations inside an AVID package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    pub root: PathBuf,
    pub documents_dir: PathBuf,
    pub document_index: PathBuf,
    pub file_index: PathBuf,
    /// Folder name that marks document storage in file index paths.
    pub storage_root: String,
}

impl PackageLayout {
    pub fn new(root: &Path, config: &PackageConfig) -> Self {
        let indices = root.join(&config.indices_dir);
        Self {
            root: root.to_path_buf(),
            documents_dir: root.join(&config.documents_dir),
            document_index: indices.join(&config.document_index),
            file_index: indices.join(&config.file_index),
            storage_root: config.documents_dir.clone(),
        }
    }

    /// Check that the package root, both indices and the document tree exist.
    pub fn validate(&self) -> Result<(), PackageError> {
        let checks = [
            ("root directory", self.root.as_path(), self.root.is_dir()),
            ("document index", self.document_index.as_path(), self.document_index.is_file()),
            ("file index", self.file_index.as_path(), self.file_index.is_file()),
            ("document directory", self.documents_dir.as_path(), self.documents_dir.is_dir()),
        ];

        for (what, path, ok) in checks {
            if !ok {
                return Err(PackageError::Missing {
                    what,
                    path: path.to_path_buf(),
                });
            }
        }
        Ok(())
    }

    /// Parse the document index.
    pub fn load_catalog(&self) -> Result<DocumentCatalog, IndexError> {
        DocumentCatalog::from_file(&self.document_index)
    }

    /// Parse the file index, keeping only entries under the document tree.
    pub fn load_checksums(&self) -> Result<ChecksumIndex, IndexError> {
        ChecksumIndex::from_file(&self.file_index, &self.storage_root)
    }
}

//! Index parsing error types.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Which of the two package indices an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Document,
    File,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Document => f.write_str("document index"),
            IndexKind::File => f.write_str("file index"),
        }
    }
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Failed to read {kind} {}: {source}", path.display())]
    Io {
        kind: IndexKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "Malformed XML in {kind}{}: {source}",
        path.as_ref().map(|p| format!(" {}", p.display())).unwrap_or_default()
    )]
    Xml {
        kind: IndexKind,
        /// Index file, when parsed from disk.
        path: Option<PathBuf>,
        #[source]
        source: roxmltree::Error,
    },
    #[error("{kind} record {record} is missing required field '{field}'")]
    MissingField {
        kind: IndexKind,
        record: usize,
        field: &'static str,
    },
}

impl IndexError {
    /// Record which file a parse error came from.
    pub(crate) fn in_file(self, file: &Path) -> Self {
        match self {
            IndexError::Xml { kind, source, .. } => IndexError::Xml {
                kind,
                path: Some(file.to_path_buf()),
                source,
            },
            other => other,
        }
    }
}

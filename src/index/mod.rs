//! Parsers for the two AVID package indices.
//!
//! - [`DocumentCatalog`] reads `docIndex.xml` (original filename → stored location)
//! - [`ChecksumIndex`] reads `fileIndex.xml` (stored location → MD5)
//!
//! Both are pure parses and are built independently of each other.

mod catalog;
mod checksum;
mod error;
mod xml;

pub use catalog::DocumentCatalog;
pub use checksum::ChecksumIndex;
pub use error::{IndexError, IndexKind};
pub use xml::AVID_NAMESPACE;

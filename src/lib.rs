//! avid-sample - representative sample extraction for AVID archival packages.
//!
//! Reads a package's document index and file index, groups documents by the
//! extension of their original filename, and copies a few content-distinct
//! examples of each extension into an output tree for manual spot checks.
//!
//! The pipeline is:
//!
//! 1. [`index::DocumentCatalog`] and [`index::ChecksumIndex`] parse the indices
//! 2. [`services::sample`] picks up to N distinct examples per extension
//! 3. [`services::Copier`] writes them to `<output>/<extension>/`

pub mod config;
pub mod index;
pub mod models;
pub mod package;
pub mod services;
pub mod storage;

pub use config::Config;
pub use package::PackageLayout;

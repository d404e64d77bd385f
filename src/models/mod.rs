//! Data models for AVID packages.

mod document;

pub use document::{normalize_extension, DocumentPath, DocumentRecord, NO_EXTENSION};

//! Service layer for the sampling pipeline.
//!
//! This module contains domain logic separated from UI concerns.
//! Services are driven by the CLI but can be used by any caller.

pub mod copier;
pub mod report;
pub mod sampler;

pub use copier::{CopyError, CopyEvent, CopyReport, Copier, SkipReason, SkippedExample};
pub use report::{checksum_matches, ChecksumReport, Histogram};
pub use sampler::{sample, SampleSet};

//! Command-line interface for avid-sample.

mod commands;
pub mod helpers;

pub use commands::{is_verbose, run};

//! Shared helper functions for CLI commands.

use std::fmt;
use std::path::Path;

use anyhow::{bail, Context};
use console::style;

/// Status markers printed in front of CLI output lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    /// Green ✓
    Done,
    /// Cyan →
    Info,
    /// Yellow !
    Warn,
    /// Dim →, between a document and its destination
    Arrow,
    /// Dim •
    Bullet,
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled = match self {
            Icon::Done => style("✓").green(),
            Icon::Info => style("→").cyan(),
            Icon::Warn => style("!").yellow(),
            Icon::Arrow => style("→").dim(),
            Icon::Bullet => style("•").dim(),
        };
        write!(f, "{}", styled)
    }
}

/// Whether raw arguments ask for verbose output.
///
/// Runs before clap so logging can be configured first. Recognizes `-v` inside
/// combined short flags (`-vm 2`); characters after `-m` or `-c` are a value.
pub fn verbose_requested<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for arg in args {
        let arg = arg.as_ref();
        match arg {
            "--" => return false,
            "--verbose" => return true,
            _ => {}
        }
        let Some(flags) = arg.strip_prefix('-').filter(|f| !f.starts_with('-')) else {
            continue;
        };
        for flag in flags.chars() {
            match flag {
                'v' => return true,
                'm' | 'c' => break,
                _ => {}
            }
        }
    }
    false
}

/// Check that the output directory exists and that files can be created in it.
///
/// The probe file is removed again when it goes out of scope.
pub fn ensure_writable_dir(path: &Path) -> anyhow::Result<()> {
    if !path.is_dir() {
        bail!("Output directory does not exist: {}", path.display());
    }

    tempfile::NamedTempFile::new_in(path)
        .with_context(|| format!("Output directory is not writable: {}", path.display()))?;
    Ok(())
}

//! CLI commands implementation.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use avid_sample::index::{ChecksumIndex, DocumentCatalog};
use avid_sample::services::{
    checksum_matches, sample, ChecksumReport, CopyEvent, Copier, Histogram, SampleSet,
};
use avid_sample::storage::{example_destination, extension_dir, numbered_destination};
use avid_sample::{Config, PackageLayout};

use super::helpers::{ensure_writable_dir, verbose_requested, Icon};

#[derive(Parser)]
#[command(name = "avid-sample")]
#[command(about = "Copy a few content-distinct example files per extension out of an AVID package")]
#[command(version)]
pub struct Cli {
    /// AVID package directory
    #[arg(value_name = "AVID_DIR")]
    input: PathBuf,

    /// Output directory for copied examples
    #[arg(
        value_name = "OUTPUT_DIR",
        required_unless_present_any = ["histogram", "checksum", "dry_run"]
    )]
    output: Option<PathBuf>,

    /// Maximum examples per extension (default: 3, or from config)
    #[arg(short, long)]
    max_examples: Option<NonZeroUsize>,

    /// Print the number of documents per extension instead of copying
    #[arg(long, conflicts_with_all = ["checksum", "dry_run"])]
    histogram: bool,

    /// Print how many documents per extension have this MD5 checksum instead of copying
    #[arg(long, value_name = "MD5", conflicts_with = "dry_run")]
    checksum: Option<String>,

    /// Show which documents would be copied without copying anything
    #[arg(long)]
    dry_run: bool,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,

    /// Config file (TOML or JSON)
    #[arg(short, long, env = "AVID_SAMPLE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    verbose_requested(
        std::env::args_os()
            .skip(1)
            .map(|arg| arg.to_string_lossy().into_owned()),
    )
}

/// Run the CLI.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let max_examples = cli.max_examples.unwrap_or(config.max_examples);
    if cli.verbose {
        match &config.source_path {
            Some(path) => println!("{} Using config {}", Icon::Info, path.display()),
            None => println!("{} Using built-in defaults", Icon::Info),
        }
    }

    let layout = PackageLayout::new(&cli.input, &config.package);
    layout.validate()?;

    let copy_to = match (&cli.output, cli.histogram || cli.checksum.is_some() || cli.dry_run) {
        (Some(output), false) => {
            ensure_writable_dir(output)?;
            Some(output.as_path())
        }
        _ => None,
    };

    let catalog = layout
        .load_catalog()
        .with_context(|| format!("Failed to load {}", layout.document_index.display()))?;

    if cli.histogram {
        return cmd_histogram(&catalog, cli.json);
    }

    let checksums = layout
        .load_checksums()
        .with_context(|| format!("Failed to load {}", layout.file_index.display()))?;

    if let Some(md5) = cli.checksum.as_deref() {
        return cmd_checksum(&catalog, &checksums, md5, cli.json);
    }

    let samples = sample(&catalog, &checksums, max_examples);

    match copy_to {
        Some(output) => cmd_copy(&layout, output, &samples),
        None => cmd_dry_run(&samples, cli.output.as_deref(), cli.json),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the number of candidate documents per extension.
fn cmd_histogram(catalog: &DocumentCatalog, json: bool) -> anyhow::Result<()> {
    let histogram = Histogram::from_catalog(catalog);
    if json {
        return print_json(&histogram);
    }

    println!(
        "{} {} documents across {} extensions",
        Icon::Info,
        histogram.total,
        histogram.extensions.len()
    );
    let width = histogram.extensions.keys().map(String::len).max().unwrap_or(0);
    for (extension, count) in &histogram.extensions {
        println!("  {:<width$}  {:>8}", extension, count, width = width);
    }
    Ok(())
}

/// Print how many documents share a checksum, per extension.
fn cmd_checksum(
    catalog: &DocumentCatalog,
    checksums: &ChecksumIndex,
    md5: &str,
    json: bool,
) -> anyhow::Result<()> {
    let report: ChecksumReport = checksum_matches(catalog, checksums, md5);
    if json {
        return print_json(&report);
    }

    if report.total == 0 {
        println!(
            "{} No documents with checksum {}",
            Icon::Warn,
            style(&report.checksum).bold()
        );
        return Ok(());
    }

    println!(
        "{} {} documents with checksum {}",
        Icon::Info,
        report.total,
        style(&report.checksum).bold()
    );
    for (extension, count) in &report.by_extension {
        println!("  {} {}: {}", Icon::Bullet, extension, count);
    }
    Ok(())
}

/// Print the selection without touching the output directory.
fn cmd_dry_run(samples: &SampleSet, output: Option<&Path>, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(samples);
    }

    println!(
        "{} Would copy {} examples across {} extensions (dry run)",
        Icon::Info,
        samples.total(),
        samples.extension_count()
    );
    let output = output.unwrap_or(Path::new("."));
    for (extension, paths) in samples.iter() {
        let dir = extension_dir(output, extension);
        println!("\n  {}", style(dir.display()).bold());
        let mut planned = HashSet::new();
        for path in paths {
            let destination = (1..)
                .map(|attempt| numbered_destination(&dir, path, attempt))
                .find(|candidate| !planned.contains(candidate))
                .unwrap_or_else(|| example_destination(&dir, path));
            println!("    {} {} {}", path, Icon::Arrow, destination.display());
            planned.insert(destination);
        }
    }
    Ok(())
}

/// Copy the selected examples into the output directory.
fn cmd_copy(layout: &PackageLayout, output: &Path, samples: &SampleSet) -> anyhow::Result<()> {
    println!(
        "{} Copying up to {} examples from {}",
        Icon::Info,
        samples.total(),
        layout.root.display()
    );

    let pb = ProgressBar::new(samples.total() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/dim} {pos}/{len} files {msg}")?
            .progress_chars("=>-"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let copier = Copier::new(&layout.documents_dir, output);
    let result = copier.copy_with_events(samples, |event| match event {
        CopyEvent::DirectoryCreated { extension, .. } => pb.set_message(extension),
        CopyEvent::Copied { .. } => pb.inc(1),
        CopyEvent::Skipped(skipped) => {
            pb.println(format!(
                "  {} {} ({})",
                Icon::Warn,
                skipped.path,
                skipped.reason
            ));
            pb.inc(1);
        }
    });
    pb.finish_and_clear();
    let report = result?;

    println!(
        "{} Copied {} examples into {} directories under {}",
        Icon::Done,
        report.copied.len(),
        report.directories.len(),
        output.display()
    );
    if !report.skipped.is_empty() {
        println!(
            "{} Skipped {} examples (see warnings above)",
            Icon::Warn,
            report.skipped.len()
        );
    }
    Ok(())
}

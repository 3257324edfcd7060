use std::path::{Path, PathBuf};

use colored::Colorize;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use outline_core::{render_json, render_markdown, Outline, OutlineBuilder, OutlineError};
use pdf::PdfLayoutSource;

use crate::prelude::{eprintln, println, *};

#[derive(Debug, Clone, clap::Args)]
pub struct Options {
    /// Directory scanned (non-recursively) for PDF files
    #[arg(short, long, env = "OUTLINER_INPUT", default_value = "/app/input")]
    input: PathBuf,

    /// Directory receiving one `<stem>_outline.json` per document
    #[arg(short, long, env = "OUTLINER_OUTPUT", default_value = "/app/output")]
    output: PathBuf,

    /// Also write `<stem>_outline.md` next to each JSON record
    #[arg(long)]
    markdown: bool,

    /// Documents processed concurrently
    #[arg(short, long, env = "OUTLINER_JOBS", default_value = "4")]
    jobs: usize,
}

/// Result of running one document through the builder.
#[derive(Debug)]
pub struct DocumentOutcome {
    pub path: PathBuf,
    pub outline: Outline,
    /// Extraction failed and `outline` is the fallback record.
    pub fallback: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub processed: usize,
    pub fallback: usize,
    pub failed: usize,
}

pub async fn run(options: Options, global: crate::Global) -> Result<()> {
    let config = crate::settings::load(&global)?;
    let paths = scan_input(&options.input)?;

    std::fs::create_dir_all(&options.output).map_err(|e| {
        Error::OutputDirectory(f!("{}: {}", options.output.display(), e))
    })?;

    if paths.is_empty() {
        println!(
            "No PDF files found in {}",
            options.input.display().to_string().bold()
        );
        return Ok(());
    }

    let progress = ProgressBar::new(paths.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .map_err(|e| eyre!("Invalid progress template: {}", e))?,
    );

    let builder = OutlineBuilder::new(config);
    let summary = process_all(
        paths,
        &builder,
        &options.output,
        options.markdown,
        options.jobs,
        &progress,
    )
    .await?;
    progress.finish_and_clear();

    println!(
        "{} {} processed, {} fallback, {} failed",
        "Done:".green().bold(),
        summary.processed.to_string().bold(),
        summary.fallback.to_string().yellow(),
        summary.failed.to_string().red()
    );

    if summary.failed > 0 {
        return Err(Error::WriteFailed(summary.failed).into());
    }
    Ok(())
}

/// PDF files directly under `dir`, sorted by path.
pub fn scan_input(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::InputDirectory(f!("{}: {}", dir.display(), e)))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| Error::InputDirectory(f!("{}: {}", dir.display(), e)))?
            .path();
        if path.is_file() && is_pdf(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Lowercase `.pdf` only, so no two inputs share an output stem.
fn is_pdf(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "pdf")
}

/// `<output_dir>/<stem>_outline.<extension>`
pub fn output_path(output_dir: &Path, input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(f!("{stem}_outline.{extension}"))
}

/// Read and outline one document. Any failure yields the fallback record.
pub fn process_document(builder: &OutlineBuilder, path: &Path) -> DocumentOutcome {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let source = PdfLayoutSource::new().with_max_pages(builder.config().max_pages);

    let result = std::fs::read(path)
        .map_err(OutlineError::from)
        .and_then(|bytes| builder.extract(&source, &bytes, &file_name));

    match result {
        Ok(outline) => DocumentOutcome {
            path: path.to_path_buf(),
            outline,
            fallback: false,
        },
        Err(e) => {
            warn!("Error processing {file_name}: {e}");
            DocumentOutcome {
                path: path.to_path_buf(),
                outline: Outline::fallback(&file_name),
                fallback: true,
            }
        }
    }
}

/// A worker that panicked or was cancelled degrades to the fallback record.
fn worker_failed(path: PathBuf, error: tokio::task::JoinError) -> DocumentOutcome {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    warn!("Error processing {file_name}: {error}");
    DocumentOutcome {
        outline: Outline::fallback(&file_name),
        path,
        fallback: true,
    }
}

/// Write the JSON record, and the markdown list when asked, for one outcome.
pub fn write_outputs(outcome: &DocumentOutcome, output_dir: &Path, markdown: bool) -> Result<PathBuf> {
    let json_path = output_path(output_dir, &outcome.path, "json");
    let json = render_json(&outcome.outline)?;
    std::fs::write(&json_path, json)
        .wrap_err_with(|| f!("Failed to write {}", json_path.display()))?;

    if markdown {
        let md_path = output_path(output_dir, &outcome.path, "md");
        std::fs::write(&md_path, render_markdown(&outcome.outline.entries))
            .wrap_err_with(|| f!("Failed to write {}", md_path.display()))?;
    }

    Ok(json_path)
}

/// Outline every path with at most `jobs` documents in flight.
pub async fn process_all(
    paths: Vec<PathBuf>,
    builder: &OutlineBuilder,
    output_dir: &Path,
    markdown: bool,
    jobs: usize,
    progress: &ProgressBar,
) -> Result<Summary> {
    let mut outcomes = stream::iter(paths)
        .map(|path| {
            let builder = builder.clone();
            let worker_path = path.clone();
            let handle =
                tokio::task::spawn_blocking(move || process_document(&builder, &worker_path));
            async move { (path, handle.await) }
        })
        .buffer_unordered(jobs.max(1));

    let mut summary = Summary::default();
    while let Some((path, joined)) = outcomes.next().await {
        let outcome = joined.unwrap_or_else(|e| worker_failed(path, e));
        let name = outcome
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        progress.set_message(name.clone());

        match write_outputs(&outcome, output_dir, markdown) {
            Ok(json_path) => {
                if outcome.fallback {
                    summary.fallback += 1;
                } else {
                    summary.processed += 1;
                }
                info!("Processed {} -> {}", name, json_path.display());
            }
            Err(e) => {
                summary.failed += 1;
                progress.suspend(|| eprintln!("{} {:#}", "Error:".red().bold(), e));
            }
        }
        progress.inc(1);
    }

    Ok(summary)
}

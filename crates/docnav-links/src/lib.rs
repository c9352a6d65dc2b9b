//! Post-build link normalization for docnav.
//!
//! Some toolchains emit cross-document references as fragment-only hrefs
//! (`href="#../api/widget#constructor"`). Browsers resolve those against the
//! current page, so they never navigate. [`normalize_links`] walks a rendered
//! HTML tree and rewrites them into relative file links
//! (`href="../api/widget.html#constructor"`).

mod rewrite;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

pub use rewrite::{LinkRewriter, Rewrite};

/// Settings for a normalization run.
#[derive(Debug, Clone)]
pub struct LinkOptions {
    /// Subdirectories of the output directory to scan. Empty scans everything.
    pub scan_dirs: Vec<PathBuf>,
    /// File extensions (without dot) to scan.
    pub extensions: Vec<String>,
    /// Extension appended to paths without one.
    pub output_extension: String,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            scan_dirs: Vec::new(),
            extensions: vec!["html".to_owned()],
            output_extension: "html".to_owned(),
        }
    }
}

/// Summary of a normalization run.
#[derive(Debug, Default)]
pub struct NormalizeReport {
    /// Files read and checked.
    pub scanned: usize,
    /// Files written back with changes.
    pub rewritten: usize,
    /// Total hrefs rewritten.
    pub links_fixed: usize,
    /// Files that could not be processed, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

/// Error returned when normalization cannot start.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Output directory not found: {}", .0.display())]
    OutputDirNotFound(PathBuf),
}

/// Rewrite malformed fragment links in every matching file under `output_dir`.
///
/// Per-file failures are recorded in the report and do not stop the run.
///
/// # Errors
///
/// Returns [`NormalizeError::OutputDirNotFound`] if `output_dir` is not a
/// directory.
pub fn normalize_links(
    output_dir: &Path,
    options: &LinkOptions,
) -> Result<NormalizeReport, NormalizeError> {
    if !output_dir.is_dir() {
        return Err(NormalizeError::OutputDirNotFound(output_dir.to_path_buf()));
    }

    let rewriter = LinkRewriter::new(&options.output_extension);
    let mut report = NormalizeReport::default();

    let roots: Vec<PathBuf> = if options.scan_dirs.is_empty() {
        vec![output_dir.to_path_buf()]
    } else {
        options.scan_dirs.iter().map(|d| output_dir.join(d)).collect()
    };

    for root in roots {
        if !root.is_dir() {
            tracing::info!(path = %root.display(), "Scan directory not found, skipping");
            continue;
        }
        normalize_dir(&root, options, &rewriter, &mut report);
    }

    tracing::info!(
        scanned = report.scanned,
        rewritten = report.rewritten,
        links_fixed = report.links_fixed,
        skipped = report.skipped.len(),
        "Link normalization finished"
    );
    Ok(report)
}

fn normalize_dir(
    root: &Path,
    options: &LinkOptions,
    rewriter: &LinkRewriter,
    report: &mut NormalizeReport,
) {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to walk output directory");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) || !has_extension(path, &options.extensions)
        {
            continue;
        }

        report.scanned += 1;
        match normalize_file(path, rewriter) {
            Ok(0) => {}
            Ok(fixed) => {
                tracing::debug!(path = %path.display(), links = fixed, "Rewrote file");
                report.rewritten += 1;
                report.links_fixed += fixed;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping file");
                report.skipped.push((path.to_path_buf(), e.to_string()));
            }
        }
    }
}

/// Rewrite one file in place if anything changed; return the number of fixed links.
fn normalize_file(path: &Path, rewriter: &LinkRewriter) -> io::Result<usize> {
    let content = fs::read_to_string(path)?;
    let result = rewriter.rewrite(&content);
    if result.links_fixed > 0 && result.content != content {
        fs::write(path, result.content.as_bytes())?;
        return Ok(result.links_fixed);
    }
    Ok(0)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

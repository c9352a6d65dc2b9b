//! Filesystem source backend.
//!
//! Walks a source directory and turns every file whose suffix is a
//! configured source suffix into a [`Document`]. Include and exclude glob
//! patterns are matched against the path relative to the source directory,
//! with `*` never crossing a `/` (so `*.md` only matches top-level files and
//! `guide/**` matches a whole subtree).

use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::source::{Document, Source, SourceError, SourceErrorKind, SourceFormat};
use crate::title::extract_title;

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Glob matching options: `*` and `?` do not match `/`.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compile a list of glob patterns.
fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>, SourceError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                SourceError::new(SourceErrorKind::InvalidPattern)
                    .with_path(p)
                    .with_backend(BACKEND)
                    .with_source(e)
            })
        })
        .collect()
}

/// Convert a relative file path to a docname, stripping the matching suffix.
///
/// Returns `None` if the file does not end with one of `suffixes`.
///
/// Examples:
/// - `index.md` -> `index`
/// - `guide/intro.rst` -> `guide/intro`
/// - `guide\intro.md` -> `guide/intro`
pub(crate) fn file_path_to_docname<'a>(
    rel_path: &Path,
    suffixes: &'a [String],
) -> Option<(String, &'a str)> {
    let path_str = rel_path.to_string_lossy().replace('\\', "/");
    suffixes.iter().find_map(|suffix| {
        path_str
            .strip_suffix(suffix.as_str())
            .filter(|stem| !stem.is_empty() && !stem.ends_with('/'))
            .map(|stem| (stem.to_owned(), suffix.as_str()))
    })
}

/// Filesystem source implementation.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use docnav_source::{FsSource, Source};
///
/// let source = FsSource::new(PathBuf::from("docs"))
///     .with_suffixes(vec![".md".to_owned()])
///     .with_patterns(&["**".to_owned()], &["_build/**".to_owned()])?;
/// let documents = source.scan()?;
/// ```
pub struct FsSource {
    /// Root directory for source documents.
    source_dir: PathBuf,
    /// Recognized source suffixes, including the leading dot.
    suffixes: Vec<String>,
    /// A document must match at least one of these.
    include: Vec<Pattern>,
    /// A document or directory matching any of these is skipped.
    exclude: Vec<Pattern>,
}

impl FsSource {
    /// Create a filesystem source with `.rst` and `.md` suffixes and no
    /// pattern filtering.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self {
            source_dir,
            suffixes: vec![".rst".to_owned(), ".md".to_owned()],
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// Replace the recognized source suffixes.
    #[must_use]
    pub fn with_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.suffixes = suffixes;
        self
    }

    /// Set include and exclude glob patterns.
    ///
    /// An empty include list admits every document.
    ///
    /// # Errors
    ///
    /// Returns [`SourceErrorKind::InvalidPattern`] for malformed globs.
    pub fn with_patterns(
        mut self,
        include: &[String],
        exclude: &[String],
    ) -> Result<Self, SourceError> {
        self.include = compile_patterns(include)?;
        self.exclude = compile_patterns(exclude)?;
        Ok(self)
    }

    fn is_excluded(&self, rel: &str) -> bool {
        self.exclude
            .iter()
            .any(|p| p.matches_with(rel, MATCH_OPTIONS))
    }

    fn is_included(&self, rel: &str) -> bool {
        self.include.is_empty()
            || self
                .include
                .iter()
                .any(|p| p.matches_with(rel, MATCH_OPTIONS))
    }

    /// Validate that a docname doesn't escape the source directory.
    fn validate_docname(docname: &str) -> Result<(), SourceError> {
        if docname.is_empty()
            || docname.starts_with('/')
            || docname.split('/').any(|segment| segment == "..")
        {
            return Err(SourceError::new(SourceErrorKind::InvalidPath)
                .with_path(docname)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    /// Whether a relative file path survives the scan filters.
    ///
    /// Mirrors [`Self::scan_directory`]: hidden segments and excluded parent
    /// directories reject the file as well.
    fn admits(&self, rel: &str) -> bool {
        if rel.split('/').any(|segment| segment.starts_with('.')) {
            return false;
        }
        let excluded_parent = rel
            .match_indices('/')
            .any(|(i, _)| self.is_excluded(&rel[..i]));
        !excluded_parent && !self.is_excluded(rel) && self.is_included(rel)
    }

    /// Resolve a docname to its file, trying each suffix in configured order.
    ///
    /// Files filtered out by the scan are never returned.
    fn resolve_file(&self, docname: &str) -> Option<PathBuf> {
        self.suffixes.iter().find_map(|suffix| {
            let rel = format!("{docname}{suffix}");
            let path = self.source_dir.join(&rel);
            (self.admits(&rel) && path.is_file()).then_some(path)
        })
    }

    /// Position of `suffix` in the configured suffix list.
    fn suffix_rank(&self, suffix: &str) -> usize {
        self.suffixes
            .iter()
            .position(|s| s == suffix)
            .unwrap_or(usize::MAX)
    }

    fn read_path(path: &Path) -> Result<String, SourceError> {
        fs::read_to_string(path)
            .map_err(|e| SourceError::io(e, Some(path.to_path_buf())).with_backend(BACKEND))
    }

    /// Walk a directory, collecting documents.
    ///
    /// Each document is paired with the rank of its suffix.
    fn scan_directory(&self, dir: &Path, rel_prefix: &str, docs: &mut Vec<(usize, Document)>) {
        let Ok(entries) = fs::read_dir(dir) else {
            tracing::warn!(dir = %dir.display(), "Cannot read source directory");
            return;
        };

        let mut entries: Vec<_> = entries.filter_map(Result::ok).collect();
        entries.sort_by_key(fs::DirEntry::file_name);

        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let rel = if rel_prefix.is_empty() {
                name
            } else {
                format!("{rel_prefix}/{name}")
            };
            if self.is_excluded(&rel) {
                tracing::debug!(path = %rel, "Excluded by pattern");
                continue;
            }

            let path = entry.path();
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                self.scan_directory(&path, &rel, docs);
                continue;
            }

            let Some((docname, suffix)) = file_path_to_docname(Path::new(&rel), &self.suffixes)
            else {
                continue;
            };
            if !self.is_included(&rel) {
                continue;
            }

            let format = SourceFormat::from_suffix(suffix);
            let title = match fs::read_to_string(&path) {
                Ok(content) => extract_title(&content, format),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Cannot read document");
                    None
                }
            }
            .unwrap_or_else(|| docname.clone());

            docs.push((
                self.suffix_rank(suffix),
                Document {
                    docname,
                    title,
                    format,
                    source_path: PathBuf::from(rel),
                },
            ));
        }
    }
}

impl Source for FsSource {
    fn scan(&self) -> Result<Vec<Document>, SourceError> {
        if !self.source_dir.is_dir() {
            return Err(SourceError::not_found(&self.source_dir).with_backend(BACKEND));
        }

        let mut ranked = Vec::new();
        self.scan_directory(&self.source_dir, "", &mut ranked);
        ranked.sort_by(|(rank_a, a), (rank_b, b)| {
            a.docname.cmp(&b.docname).then(rank_a.cmp(rank_b))
        });

        // The first suffix in configured order wins a docname.
        let mut docs: Vec<Document> = Vec::with_capacity(ranked.len());
        for (_, doc) in ranked {
            match docs.last() {
                Some(kept) if kept.docname == doc.docname => {
                    tracing::warn!(
                        docname = %doc.docname,
                        kept = %kept.source_path.display(),
                        ignored = %doc.source_path.display(),
                        "Multiple source files for one document"
                    );
                }
                _ => docs.push(doc),
            }
        }
        Ok(docs)
    }

    fn read(&self, docname: &str) -> Result<String, SourceError> {
        Self::validate_docname(docname)?;
        let path = self
            .resolve_file(docname)
            .ok_or_else(|| SourceError::not_found(docname).with_backend(BACKEND))?;
        Self::read_path(&path)
    }

    fn read_document(&self, document: &Document) -> Result<String, SourceError> {
        let rel = document.source_path.to_string_lossy().replace('\\', "/");
        Self::validate_docname(&rel)?;
        Self::read_path(&self.source_dir.join(&document.source_path))
    }
}

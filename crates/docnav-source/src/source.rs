//! Source trait and error types.
//!
//! Provides the core [`Source`] trait for abstracting document discovery and
//! retrieval, along with [`SourceError`] for unified error handling across
//! backends.
//!
//! # Docname Convention
//!
//! All document parameters are **docnames**, not file paths:
//! - `"index"` - root document (`index.md` or `index.rst`)
//! - `"guide/intro"` - nested document (`guide/intro.md`)
//!
//! The source suffix is never part of a docname.

use std::path::PathBuf;

/// Markup flavor of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Markdown with `MyST` directive fences.
    Markdown,
    /// reStructuredText.
    Rst,
}

impl SourceFormat {
    /// Classify a file suffix (including the leading dot).
    ///
    /// Unknown suffixes are treated as reStructuredText, the default parser
    /// for documentation toolchains of this kind.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Self {
        match suffix.to_ascii_lowercase().as_str() {
            ".md" | ".markdown" | ".myst" => Self::Markdown,
            _ => Self::Rst,
        }
    }
}

/// A discovered source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Docname (e.g., "index", "guide/intro").
    pub docname: String,
    /// Document title (first heading, falling back to the docname).
    pub title: String,
    /// Markup flavor.
    pub format: SourceFormat,
    /// Source file the document was scanned from, relative to the source root.
    pub source_path: PathBuf,
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceErrorKind {
    /// Document does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid docname (e.g. path traversal).
    InvalidPath,
    /// Invalid include/exclude glob pattern.
    InvalidPattern,
    /// Content is not valid UTF-8.
    Decode,
    /// Other/unknown error category.
    Other,
}

/// Source error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct SourceError {
    /// Semantic error category.
    pub kind: SourceErrorKind,
    /// Path or docname context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Create a new source error.
    #[must_use]
    pub fn new(kind: SourceErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(SourceErrorKind::NotFound).with_path(path)
    }

    /// Create a source error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => SourceErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => SourceErrorKind::PermissionDenied,
            std::io::ErrorKind::InvalidData => SourceErrorKind::Decode,
            _ => SourceErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            SourceErrorKind::NotFound => "Not found",
            SourceErrorKind::PermissionDenied => "Permission denied",
            SourceErrorKind::InvalidPath => "Invalid path",
            SourceErrorKind::InvalidPattern => "Invalid pattern",
            SourceErrorKind::Decode => "Invalid UTF-8",
            SourceErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Source abstraction for document discovery and retrieval.
///
/// Implementations map docnames to their internal storage format and
/// resolve document titles.
pub trait Source {
    /// Scan and return all known documents, sorted by docname.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if scanning fails (e.g., invalid patterns,
    /// permission denied on the source root).
    fn scan(&self) -> Result<Vec<Document>, SourceError>;

    /// Read the full text of a document.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the document doesn't exist or can't be
    /// read as UTF-8 text.
    fn read(&self, docname: &str) -> Result<String, SourceError>;

    /// Read the file a scanned document came from.
    ///
    /// Backends that can hold several files per docname override this so the
    /// text always matches the scanned title and format.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file can't be read as UTF-8 text.
    fn read_document(&self, document: &Document) -> Result<String, SourceError> {
        self.read(&document.docname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_suffix() {
        assert_eq!(SourceFormat::from_suffix(".md"), SourceFormat::Markdown);
        assert_eq!(SourceFormat::from_suffix(".MD"), SourceFormat::Markdown);
        assert_eq!(SourceFormat::from_suffix(".rst"), SourceFormat::Rst);
        assert_eq!(SourceFormat::from_suffix(".txt"), SourceFormat::Rst);
    }

    #[test]
    fn test_error_display_with_backend_and_path() {
        let err = SourceError::not_found("guide/intro").with_backend("Fs");
        assert_eq!(err.to_string(), "[Fs] Not found (path: guide/intro)");
    }

    #[test]
    fn test_error_from_io_maps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = SourceError::io(io, Some(PathBuf::from("/docs/a.md")));
        assert_eq!(err.kind, SourceErrorKind::PermissionDenied);
        assert!(err.to_string().contains("denied"));
        assert!(std::error::Error::source(&err).is_some());
    }
}

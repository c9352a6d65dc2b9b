//! Mock source implementation for testing.
//!
//! Provides [`MockSource`] for unit testing without filesystem access.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::source::{Document, Source, SourceError, SourceErrorKind, SourceFormat};
use crate::title::extract_title;

/// Mock source for testing.
///
/// Stores documents in memory, keyed by docname. Titles are extracted from
/// the content exactly as [`FsSource`](crate::FsSource) would.
///
/// # Example
///
/// ```ignore
/// use docnav_source::{MockSource, Source};
///
/// let source = MockSource::new()
///     .with_markdown("index", "# Home\n")
///     .with_rst("guide", "Guide\n=====\n");
///
/// let docs = source.scan().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    documents: BTreeMap<String, (SourceFormat, Option<String>)>,
}

impl MockSource {
    /// Create a new empty mock source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a Markdown document.
    #[must_use]
    pub fn with_markdown(self, docname: impl Into<String>, content: impl Into<String>) -> Self {
        self.with_document(docname, SourceFormat::Markdown, Some(content.into()))
    }

    /// Add a reStructuredText document.
    #[must_use]
    pub fn with_rst(self, docname: impl Into<String>, content: impl Into<String>) -> Self {
        self.with_document(docname, SourceFormat::Rst, Some(content.into()))
    }

    /// Add a document that is listed by `scan()` but fails to `read()`.
    #[must_use]
    pub fn with_unreadable(self, docname: impl Into<String>) -> Self {
        self.with_document(docname, SourceFormat::Markdown, None)
    }

    fn with_document(
        mut self,
        docname: impl Into<String>,
        format: SourceFormat,
        content: Option<String>,
    ) -> Self {
        self.documents.insert(docname.into(), (format, content));
        self
    }
}

impl Source for MockSource {
    fn scan(&self) -> Result<Vec<Document>, SourceError> {
        Ok(self
            .documents
            .iter()
            .map(|(docname, (format, content))| Document {
                docname: docname.clone(),
                title: content
                    .as_deref()
                    .and_then(|c| extract_title(c, *format))
                    .unwrap_or_else(|| docname.clone()),
                format: *format,
                source_path: PathBuf::from(match format {
                    SourceFormat::Markdown => format!("{docname}.md"),
                    SourceFormat::Rst => format!("{docname}.rst"),
                }),
            })
            .collect())
    }

    fn read(&self, docname: &str) -> Result<String, SourceError> {
        match self.documents.get(docname) {
            Some((_, Some(content))) => Ok(content.clone()),
            Some((_, None)) => Err(SourceError::new(SourceErrorKind::Decode)
                .with_path(docname)
                .with_backend("Mock")),
            None => Err(SourceError::not_found(docname).with_backend("Mock")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_sorted_with_titles() {
        let source = MockSource::new()
            .with_rst("zeta", "Zeta\n====\n")
            .with_markdown("alpha", "# Alpha\n");

        let docs = source.scan().unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].docname, "alpha");
        assert_eq!(docs[0].title, "Alpha");
        assert_eq!(docs[1].title, "Zeta");
        assert_eq!(docs[1].source_path, PathBuf::from("zeta.rst"));
    }

    #[test]
    fn test_read_unknown_and_unreadable() {
        let source = MockSource::new().with_unreadable("broken");
        assert_eq!(source.read("missing").unwrap_err().kind, SourceErrorKind::NotFound);
        assert_eq!(source.read("broken").unwrap_err().kind, SourceErrorKind::Decode);
        assert_eq!(source.scan().unwrap()[0].title, "broken");
    }
}

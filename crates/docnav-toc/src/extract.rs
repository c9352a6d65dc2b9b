//! Comment-block handling.
//!
//! Authors can hide navigation directives from the page body by wrapping
//! them in an HTML comment with configurable markers:
//!
//! ````text
//! <!-- RTD-TOC-START
//! ```{toctree}
//! :caption: Guide
//! guide/intro
//! ```
//! RTD-TOC-END -->
//! ````
//!
//! Two strategies turn such a document into directive blocks, selected by
//! [`CommentMode`]:
//!
//! - [`OutOfBandExtractor`] parses the comment blocks directly and emits
//!   their directives first, followed by the ordinary directives of the
//!   document with the comment blocks removed.
//! - [`UncommentExtractor`] replaces every comment block with its inner
//!   content and parses the result in source order.

use std::borrow::Cow;
use std::sync::LazyLock;

use docnav_config::CommentMode;
use docnav_source::SourceFormat;
use regex::Regex;

use crate::TocError;
use crate::directive::{DirectiveBlock, parse_directives};

static DEFAULT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--\s*RTD-TOC-START\s*(.*?)\s*RTD-TOC-END\s*-->")
        .expect("invalid comment block regex")
});

/// Start and end markers of a comment block.
#[derive(Debug, Clone)]
pub struct CommentMarkers {
    pattern: Regex,
}

impl CommentMarkers {
    /// Build markers from their literal texts.
    ///
    /// # Errors
    ///
    /// Returns [`TocError::InvalidMarkers`] if either marker is empty or
    /// both are equal.
    pub fn new(start: &str, end: &str) -> Result<Self, TocError> {
        let (start, end) = (start.trim(), end.trim());
        if start.is_empty() || end.is_empty() {
            return Err(TocError::InvalidMarkers(
                "markers must not be empty".to_owned(),
            ));
        }
        if start == end {
            return Err(TocError::InvalidMarkers(format!(
                "start and end markers are both '{start}'"
            )));
        }

        let pattern = format!(
            r"(?s)<!--\s*{}\s*(.*?)\s*{}\s*-->",
            regex::escape(start),
            regex::escape(end)
        );
        let pattern =
            Regex::new(&pattern).map_err(|e| TocError::InvalidMarkers(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Inner content of every comment block, in source order.
    pub fn blocks<'a>(&'a self, content: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pattern
            .captures_iter(content)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
    }

    /// Remove every comment block from the content.
    #[must_use]
    pub fn strip<'a>(&self, content: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(content, "")
    }
}

impl Default for CommentMarkers {
    /// `RTD-TOC-START` / `RTD-TOC-END`.
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.clone(),
        }
    }
}

/// Replace every comment block with its inner content.
#[must_use]
pub fn uncomment<'a>(content: &'a str, markers: &CommentMarkers) -> Cow<'a, str> {
    markers.pattern.replace_all(content, "$1")
}

/// Strategy for turning a document into directive blocks.
pub trait SectionExtractor {
    /// Extract directive blocks in the order they contribute sections.
    fn extract_sections(&self, content: &str, format: SourceFormat) -> Vec<DirectiveBlock>;
}

/// Parses comment blocks out of band, ahead of ordinary directives.
#[derive(Debug, Clone, Default)]
pub struct OutOfBandExtractor {
    markers: CommentMarkers,
}

impl OutOfBandExtractor {
    #[must_use]
    pub fn new(markers: CommentMarkers) -> Self {
        Self { markers }
    }
}

impl SectionExtractor for OutOfBandExtractor {
    fn extract_sections(&self, content: &str, format: SourceFormat) -> Vec<DirectiveBlock> {
        let mut blocks: Vec<DirectiveBlock> = self
            .markers
            .blocks(content)
            .flat_map(|inner| parse_directives(inner, format))
            .collect();
        blocks.extend(parse_directives(&self.markers.strip(content), format));
        blocks
    }
}

/// Uncomments comment blocks in place before parsing.
#[derive(Debug, Clone, Default)]
pub struct UncommentExtractor {
    markers: CommentMarkers,
}

impl UncommentExtractor {
    #[must_use]
    pub fn new(markers: CommentMarkers) -> Self {
        Self { markers }
    }
}

impl SectionExtractor for UncommentExtractor {
    fn extract_sections(&self, content: &str, format: SourceFormat) -> Vec<DirectiveBlock> {
        parse_directives(&uncomment(content, &self.markers), format)
    }
}

/// Instantiate the strategy for a comment mode.
#[must_use]
pub fn extractor_for(mode: CommentMode, markers: CommentMarkers) -> Box<dyn SectionExtractor> {
    match mode {
        CommentMode::OutOfBand => Box::new(OutOfBandExtractor::new(markers)),
        CommentMode::Uncomment => Box::new(UncommentExtractor::new(markers)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOC: &str = "\
# Home

```{toctree}
:caption: Middle
b
```

<!-- RTD-TOC-START
```{toctree}
:caption: Hidden
a
```
RTD-TOC-END -->

```{toctree}
:caption: Last
c
```
";

    fn captions(blocks: &[DirectiveBlock]) -> Vec<&str> {
        blocks.iter().filter_map(|b| b.caption.as_deref()).collect()
    }

    #[test]
    fn test_out_of_band_emits_comment_blocks_first() {
        let blocks = OutOfBandExtractor::default().extract_sections(DOC, SourceFormat::Markdown);
        assert_eq!(captions(&blocks), vec!["Hidden", "Middle", "Last"]);
    }

    #[test]
    fn test_hidden_block_with_nested_fence() {
        let text = "<!-- RTD-TOC-START\n```{toctree}\n:caption: Guide\nguide/intro\n```\nRTD-TOC-END -->\n";
        for mode in [CommentMode::OutOfBand, CommentMode::Uncomment] {
            let blocks = extractor_for(mode, CommentMarkers::default())
                .extract_sections(text, SourceFormat::Markdown);
            assert_eq!(captions(&blocks), vec!["Guide"]);
            assert_eq!(blocks[0].entries[0].target, "guide/intro");
        }
    }

    #[test]
    fn test_uncomment_keeps_source_order() {
        let blocks = UncommentExtractor::default().extract_sections(DOC, SourceFormat::Markdown);
        assert_eq!(captions(&blocks), vec!["Middle", "Hidden", "Last"]);
    }

    #[test]
    fn test_uncomment_replaces_block_with_inner_content() {
        let markers = CommentMarkers::default();
        let text = "before\n<!-- RTD-TOC-START\ninner\nRTD-TOC-END -->\nafter";
        assert_eq!(uncomment(text, &markers), "before\ninner\nafter");
    }

    #[test]
    fn test_ordinary_html_comments_untouched() {
        let markers = CommentMarkers::default();
        let text = "<!-- just a note -->";
        assert_eq!(uncomment(text, &markers), text);
        assert_eq!(markers.blocks(text).count(), 0);
    }

    #[test]
    fn test_custom_markers_are_literal() {
        let markers = CommentMarkers::new("NAV(", "NAV)").unwrap();
        let text = "<!-- NAV(\n.. toctree::\n\n   x\nNAV) -->";
        let blocks = extractor_for(CommentMode::OutOfBand, markers)
            .extract_sections(text, SourceFormat::Rst);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].entries[0].target, "x");
    }

    #[test]
    fn test_invalid_markers() {
        assert!(matches!(
            CommentMarkers::new("", "END"),
            Err(TocError::InvalidMarkers(_))
        ));
        assert!(matches!(
            CommentMarkers::new("SAME", "SAME"),
            Err(TocError::InvalidMarkers(_))
        ));
    }
}

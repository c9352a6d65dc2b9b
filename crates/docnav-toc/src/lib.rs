//! Navigation tree generation for docnav.
//!
//! Discovers the navigation hierarchy by following `toctree` directives from
//! a root document and renders it as a standalone sidebar page.
//!
//! # Example
//!
//! ```ignore
//! use docnav_source::FsSource;
//! use docnav_toc::{TocConfig, TocGenerator};
//!
//! let source = FsSource::new("docs".into());
//! let generator = TocGenerator::new(TocConfig::default())?;
//! let written = generator.generate(&source, "docs/_build/html".as_ref())?;
//! ```

mod builder;
mod directive;
mod error;
mod extract;
mod model;
mod render;
mod url;

use std::fs;
use std::path::{Path, PathBuf};

use docnav_source::Source;

pub use builder::TreeBuilder;
pub use directive::{DirectiveBlock, RawEntry, parse_directives};
pub use error::TocError;
pub use docnav_config::CommentMode;
pub use extract::{
    CommentMarkers, OutOfBandExtractor, SectionExtractor, UncommentExtractor, extractor_for,
    uncomment,
};
pub use model::{NavigationEntry, NavigationSection, Target};
pub use render::{IdGenerator, render_fragment, render_page};
pub use url::{TargetResolver, relative_path};

/// Settings for navigation generation.
#[derive(Debug, Clone)]
pub struct TocConfig {
    /// Root docname.
    pub root_doc: String,
    /// Source suffixes stripped from directive links.
    pub source_suffixes: Vec<String>,
    /// URL schemes treated as external links.
    pub url_schemes: Vec<String>,
    /// Extension of rendered pages.
    pub output_extension: String,
    /// Artifact path relative to the output directory.
    pub output_path: String,
    /// Optional JSON export path relative to the output directory.
    pub json_path: Option<String>,
    /// Comment-block strategy.
    pub comment_mode: CommentMode,
    pub start_marker: String,
    pub end_marker: String,
    /// Emit a full HTML page instead of a bare fragment.
    pub standalone: bool,
    /// Page title for standalone output.
    pub title: String,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            root_doc: "index".to_owned(),
            source_suffixes: vec![".rst".to_owned(), ".md".to_owned()],
            url_schemes: ["http", "https", "mailto", "ftp"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            output_extension: "html".to_owned(),
            output_path: "_static/toc.html".to_owned(),
            json_path: None,
            comment_mode: CommentMode::OutOfBand,
            start_marker: "RTD-TOC-START".to_owned(),
            end_marker: "RTD-TOC-END".to_owned(),
            standalone: true,
            title: "Table of Contents".to_owned(),
        }
    }
}

/// Builds and writes the navigation artifact.
pub struct TocGenerator {
    config: TocConfig,
    resolver: TargetResolver,
    extractor: Box<dyn SectionExtractor>,
}

impl TocGenerator {
    /// Create a generator.
    ///
    /// # Errors
    ///
    /// Returns [`TocError::InvalidMarkers`] if the comment markers are empty
    /// or identical.
    pub fn new(config: TocConfig) -> Result<Self, TocError> {
        let markers = CommentMarkers::new(&config.start_marker, &config.end_marker)?;
        let resolver = TargetResolver::new(
            config.source_suffixes.clone(),
            config.url_schemes.clone(),
            config.output_extension.clone(),
            config.output_path.clone(),
        );
        let extractor = extractor_for(config.comment_mode, markers);
        Ok(Self {
            config,
            resolver,
            extractor,
        })
    }

    /// Discover the navigation tree from the root document.
    ///
    /// # Errors
    ///
    /// Returns [`TocError::RootNotFound`] if the root document is unknown,
    /// or [`TocError::Source`] if the source cannot be scanned.
    pub fn build(&self, source: &dyn Source) -> Result<Vec<NavigationSection>, TocError> {
        let builder = TreeBuilder::new(source, &self.resolver, self.extractor.as_ref())?;
        tracing::debug!(documents = builder.document_count(), "Scanned source documents");
        builder.build(&self.config.root_doc)
    }

    /// Render sections according to the `standalone` setting.
    #[must_use]
    pub fn render(&self, sections: &[NavigationSection]) -> String {
        if self.config.standalone {
            render_page(sections, &self.config.title)
        } else {
            render_fragment(sections)
        }
    }

    /// Build, render and write the artifact under `output_dir`.
    ///
    /// Parent directories are created as needed. Returns the path of the
    /// written HTML file.
    ///
    /// # Errors
    ///
    /// Returns [`TocError`] if discovery fails or a file cannot be written.
    pub fn generate(&self, source: &dyn Source, output_dir: &Path) -> Result<PathBuf, TocError> {
        let sections = self.build(source)?;

        let html_path = output_dir.join(&self.config.output_path);
        write_file(&html_path, &self.render(&sections))?;
        tracing::info!(path = %html_path.display(), "Generated navigation");

        if let Some(json_path) = &self.config.json_path {
            let json_path = output_dir.join(json_path);
            write_file(&json_path, &serde_json::to_string_pretty(&sections)?)?;
            tracing::info!(path = %json_path.display(), "Exported navigation JSON");
        }

        Ok(html_path)
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), TocError> {
    let to_error = |source| TocError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    fs::write(path, content).map_err(to_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docnav_source::{FsSource, MockSource};
    use pretty_assertions::assert_eq;

    fn sample_source() -> MockSource {
        MockSource::new()
            .with_markdown(
                "index",
                "# Home\n\n```{toctree}\n:caption: Guide\nguide/intro\nExternal <https://example.com>\n```\n",
            )
            .with_markdown("guide/intro", "# Introduction\n")
    }

    #[test]
    fn test_build_index_scenario() {
        let generator = TocGenerator::new(TocConfig::default()).unwrap();
        let sections = generator.build(&sample_source()).unwrap();

        assert_eq!(
            sections,
            vec![NavigationSection {
                caption: Some("Guide".to_owned()),
                entries: vec![
                    NavigationEntry::leaf(
                        "Introduction",
                        Target::Internal {
                            docname: "guide/intro".to_owned(),
                            url: "../guide/intro.html".to_owned(),
                        }
                    ),
                    NavigationEntry::leaf(
                        "External",
                        Target::External {
                            url: "https://example.com".to_owned(),
                        }
                    ),
                ],
            }]
        );
    }

    #[test]
    fn test_unresolved_entry_renders_literal_text() {
        let source = MockSource::new()
            .with_rst("index", ".. toctree::\n\n   reference/legacy-api\n");
        let generator = TocGenerator::new(TocConfig::default()).unwrap();

        let html = generator.render(&generator.build(&source).unwrap());

        assert!(html.contains(
            "<a class=\"reference unresolved\" href=\"reference/legacy-api\" target=\"_top\">reference/legacy-api</a>"
        ));
    }

    #[test]
    fn test_generate_writes_artifact() {
        let temp = tempfile::tempdir().unwrap();
        let generator = TocGenerator::new(TocConfig::default()).unwrap();

        let path = generator.generate(&sample_source(), temp.path()).unwrap();

        assert_eq!(path, temp.path().join("_static/toc.html"));
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("<span class=\"caption-text\">Guide</span>"));
        assert!(html.contains(
            "<a class=\"reference internal\" href=\"../guide/intro.html\" target=\"_top\">Introduction</a>"
        ));
        assert!(html.contains(
            "<a class=\"reference external\" href=\"https://example.com\" target=\"_top\">External</a>"
        ));
        assert!(!temp.path().join("_static/toc.json").exists());
    }

    #[test]
    fn test_generate_fragment_and_json() {
        let temp = tempfile::tempdir().unwrap();
        let generator = TocGenerator::new(TocConfig {
            standalone: false,
            output_path: "nav.html".to_owned(),
            json_path: Some("meta/nav.json".to_owned()),
            ..TocConfig::default()
        })
        .unwrap();

        generator.generate(&sample_source(), temp.path()).unwrap();

        let html = fs::read_to_string(temp.path().join("nav.html")).unwrap();
        assert!(html.starts_with("<div class=\"sidebar-tree\">"));
        assert!(html.contains("href=\"guide/intro.html\""));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(temp.path().join("meta/nav.json")).unwrap())
                .unwrap();
        assert_eq!(json[0]["caption"], "Guide");
        assert_eq!(json[0]["entries"][0]["target"]["docname"], "guide/intro");
    }

    #[test]
    fn test_generate_missing_root_writes_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let generator = TocGenerator::new(TocConfig {
            root_doc: "start".to_owned(),
            ..TocConfig::default()
        })
        .unwrap();

        let err = generator.generate(&sample_source(), temp.path()).unwrap_err();
        assert!(matches!(err, TocError::RootNotFound(_)));
        assert!(!temp.path().join("_static").exists());
    }

    #[test]
    fn test_uncomment_mode_from_filesystem() {
        let temp = tempfile::tempdir().unwrap();
        let docs = temp.path().join("docs");
        fs::create_dir_all(docs.join("guide")).unwrap();
        fs::write(
            docs.join("index.md"),
            "# Home\n\n```{toctree}\nguide/a\n```\n\n\
             <!-- RTD-TOC-START\n```{toctree}\n:caption: Hidden\nguide/b\n```\nRTD-TOC-END -->\n",
        )
        .unwrap();
        fs::write(docs.join("guide/a.md"), "# A\n").unwrap();
        fs::write(docs.join("guide/b.rst"), "B\n==\n").unwrap();

        let generator = TocGenerator::new(TocConfig {
            comment_mode: CommentMode::Uncomment,
            ..TocConfig::default()
        })
        .unwrap();
        let sections = generator.build(&FsSource::new(docs)).unwrap();

        let captions: Vec<_> = sections.iter().map(|s| s.caption.as_deref()).collect();
        assert_eq!(captions, vec![None, Some("Hidden")]);
        assert_eq!(sections[1].entries[0].title, "B");
    }

    #[test]
    fn test_duplicate_root_uses_first_configured_suffix() {
        let temp = tempfile::tempdir().unwrap();
        let docs = temp.path();
        fs::write(docs.join("index.md"), "# Markdown home\n").unwrap();
        fs::write(
            docs.join("index.rst"),
            "Home\n====\n\n.. toctree::\n   :caption: Guide\n\n   intro\n",
        )
        .unwrap();
        fs::write(docs.join("intro.md"), "# Intro\n").unwrap();

        let generator = TocGenerator::new(TocConfig::default()).unwrap();
        let sections = generator.build(&FsSource::new(docs.to_path_buf())).unwrap();

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].caption.as_deref(), Some("Guide"));
        assert_eq!(sections[0].entries[0].title, "Intro");
    }

    #[test]
    fn test_excluded_duplicate_root_is_ignored() {
        let temp = tempfile::tempdir().unwrap();
        let docs = temp.path();
        fs::write(docs.join("index.md"), "# Excluded\n\n```{toctree}\nother\n```\n").unwrap();
        fs::write(docs.join("index.rst"), "Home\n====\n\n.. toctree::\n\n   intro\n").unwrap();
        fs::write(docs.join("intro.md"), "# Intro\n").unwrap();
        fs::write(docs.join("other.md"), "# Other\n").unwrap();

        let source = FsSource::new(docs.to_path_buf())
            .with_suffixes(vec![".md".to_owned(), ".rst".to_owned()])
            .with_patterns(&[], &["index.md".to_owned()])
            .unwrap();
        let generator = TocGenerator::new(TocConfig {
            source_suffixes: vec![".md".to_owned(), ".rst".to_owned()],
            ..TocConfig::default()
        })
        .unwrap();
        let sections = generator.build(&source).unwrap();

        let titles: Vec<_> = sections[0].entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Intro"]);
    }

    #[test]
    fn test_invalid_markers_rejected() {
        let result = TocGenerator::new(TocConfig {
            end_marker: "RTD-TOC-START".to_owned(),
            ..TocConfig::default()
        });
        assert!(matches!(result, Err(TocError::InvalidMarkers(_))));
    }
}

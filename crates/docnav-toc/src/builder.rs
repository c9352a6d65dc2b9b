//! Navigation tree traversal.

use std::collections::{HashMap, HashSet};

use docnav_source::{Document, Source};
use glob::Pattern;

use crate::TocError;
use crate::directive::{DirectiveBlock, RawEntry};
use crate::extract::SectionExtractor;
use crate::model::{NavigationEntry, NavigationSection, Target};
use crate::url::TargetResolver;

/// Walks navigation directives from a root document.
///
/// Each document is expanded at most once per [`build`](Self::build) call:
/// later references to an already visited document become leaf entries,
/// which makes cyclic directive graphs terminate.
pub struct TreeBuilder<'a> {
    source: &'a dyn Source,
    resolver: &'a TargetResolver,
    extractor: &'a dyn SectionExtractor,
    documents: HashMap<String, Document>,
    /// Known docnames, sorted, for glob expansion.
    docnames: Vec<String>,
}

impl<'a> TreeBuilder<'a> {
    /// Scan the source and prepare a traversal.
    ///
    /// # Errors
    ///
    /// Returns [`TocError::Source`] if the source cannot be scanned.
    pub fn new(
        source: &'a dyn Source,
        resolver: &'a TargetResolver,
        extractor: &'a dyn SectionExtractor,
    ) -> Result<Self, TocError> {
        let scanned = source.scan()?;
        let mut docnames: Vec<String> = scanned.iter().map(|d| d.docname.clone()).collect();
        docnames.sort();
        let documents = scanned
            .into_iter()
            .map(|d| (d.docname.clone(), d))
            .collect();

        Ok(Self {
            source,
            resolver,
            extractor,
            documents,
            docnames,
        })
    }

    /// Number of known documents.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.docnames.len()
    }

    /// Build the sections contributed by `root` and everything it reaches.
    ///
    /// # Errors
    ///
    /// Returns [`TocError::RootNotFound`] if `root` is not a known document.
    pub fn build(&self, root: &str) -> Result<Vec<NavigationSection>, TocError> {
        if !self.documents.contains_key(root) {
            return Err(TocError::RootNotFound(root.to_owned()));
        }
        let mut visited = HashSet::from([root.to_owned()]);
        Ok(self.sections_of(root, &mut visited))
    }

    fn sections_of(&self, docname: &str, visited: &mut HashSet<String>) -> Vec<NavigationSection> {
        let Some(document) = self.documents.get(docname) else {
            return Vec::new();
        };
        let content = match self.source.read_document(document) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(docname, error = %e, "Failed to read document, skipping its navigation");
                return Vec::new();
            }
        };

        self.extractor
            .extract_sections(&content, document.format)
            .into_iter()
            .map(|block| self.section(docname, &block, visited))
            .collect()
    }

    fn section(
        &self,
        current: &str,
        block: &DirectiveBlock,
        visited: &mut HashSet<String>,
    ) -> NavigationSection {
        let mut entries = Vec::new();
        for raw in &block.entries {
            if block.glob && is_glob(&raw.target) {
                for docname in self.expand_glob(current, &raw.target) {
                    entries.push(self.internal_entry(&docname, None, visited));
                }
            } else {
                entries.push(self.entry(current, raw, visited));
            }
        }
        if block.reversed {
            entries.reverse();
        }

        NavigationSection {
            caption: block.caption.clone(),
            entries,
        }
    }

    fn entry(
        &self,
        current: &str,
        raw: &RawEntry,
        visited: &mut HashSet<String>,
    ) -> NavigationEntry {
        if self.resolver.is_external(&raw.target) {
            let title = raw.title.clone().unwrap_or_else(|| raw.target.clone());
            return NavigationEntry::leaf(
                title,
                Target::External {
                    url: raw.target.clone(),
                },
            );
        }

        if raw.target == "self" {
            return NavigationEntry::leaf(
                raw.title.clone().unwrap_or_else(|| self.title_of(current)),
                self.internal_target(current),
            );
        }

        let docname = self.resolver.resolve_docname(current, &raw.target);
        if self.documents.contains_key(&docname) {
            return self.internal_entry(&docname, raw.title.clone(), visited);
        }

        tracing::warn!(
            document = current,
            link = %raw.target,
            "Navigation entry references unknown document"
        );
        NavigationEntry::leaf(
            raw.title.clone().unwrap_or_else(|| raw.target.clone()),
            Target::Unresolved {
                link: raw.target.clone(),
            },
        )
    }

    fn internal_entry(
        &self,
        docname: &str,
        title: Option<String>,
        visited: &mut HashSet<String>,
    ) -> NavigationEntry {
        let children = if visited.insert(docname.to_owned()) {
            self.sections_of(docname, visited)
        } else {
            tracing::debug!(docname, "Document already visited, emitting leaf");
            Vec::new()
        };

        NavigationEntry {
            title: title.unwrap_or_else(|| self.title_of(docname)),
            target: self.internal_target(docname),
            children,
        }
    }

    fn internal_target(&self, docname: &str) -> Target {
        Target::Internal {
            docname: docname.to_owned(),
            url: self.resolver.page_url(docname),
        }
    }

    fn title_of(&self, docname: &str) -> String {
        self.documents
            .get(docname)
            .map_or_else(|| docname.to_owned(), |d| d.title.clone())
    }

    /// Known docnames matching a wildcard entry, excluding `current`.
    fn expand_glob(&self, current: &str, pattern: &str) -> Vec<String> {
        let resolved = self.resolver.resolve_docname(current, pattern);
        let pattern = match Pattern::new(&resolved) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(document = current, pattern = %resolved, error = %e, "Invalid glob entry");
                return Vec::new();
            }
        };

        let matches: Vec<String> = self
            .docnames
            .iter()
            .filter(|d| d.as_str() != current && pattern.matches(d))
            .cloned()
            .collect();
        if matches.is_empty() {
            tracing::warn!(document = current, pattern = %resolved, "Glob entry matched no documents");
        }
        matches
    }
}

fn is_glob(target: &str) -> bool {
    target.contains(['*', '?', '['])
}

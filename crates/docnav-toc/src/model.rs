//! Navigation tree types.

use serde::Serialize;

/// Where a navigation entry points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Target {
    /// A known source document.
    Internal {
        /// Docname of the linked document.
        docname: String,
        /// URL relative to the navigation artifact.
        url: String,
    },
    /// A link with a recognized URL scheme, emitted verbatim.
    External {
        /// Original URL.
        url: String,
    },
    /// A link that matched neither a known document nor a URL scheme.
    Unresolved {
        /// Raw link text as written in the directive.
        link: String,
    },
}

impl Target {
    /// The `href` value this target renders with.
    #[must_use]
    pub fn href(&self) -> &str {
        match self {
            Self::Internal { url, .. } | Self::External { url } => url,
            Self::Unresolved { link } => link,
        }
    }

    /// CSS class suffix for the rendered link.
    #[must_use]
    pub(crate) fn css_class(&self) -> &'static str {
        match self {
            Self::Internal { .. } => "internal",
            Self::External { .. } => "external",
            Self::Unresolved { .. } => "unresolved",
        }
    }
}

/// One entry of the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationEntry {
    /// Display title.
    pub title: String,
    /// Link target.
    pub target: Target,
    /// Sections contributed by the linked document's own directives.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavigationSection>,
}

impl NavigationEntry {
    /// Create an entry with no children.
    #[must_use]
    pub fn leaf(title: impl Into<String>, target: Target) -> Self {
        Self {
            title: title.into(),
            target,
            children: Vec::new(),
        }
    }

    /// Whether any child section contains entries.
    #[must_use]
    pub fn has_children(&self) -> bool {
        self.children.iter().any(|s| !s.entries.is_empty())
    }
}

/// An ordered group of entries produced by one navigation directive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationSection {
    /// Optional heading.
    pub caption: Option<String>,
    /// Entries in directive order.
    pub entries: Vec<NavigationEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_target_href() {
        let internal = Target::Internal {
            docname: "guide/intro".to_owned(),
            url: "../guide/intro.html".to_owned(),
        };
        assert_eq!(internal.href(), "../guide/intro.html");
        assert_eq!(
            Target::Unresolved {
                link: "missing".to_owned()
            }
            .href(),
            "missing"
        );
    }

    #[test]
    fn test_has_children_ignores_empty_sections() {
        let mut entry = NavigationEntry::leaf(
            "Guide",
            Target::External {
                url: "https://example.com".to_owned(),
            },
        );
        assert!(!entry.has_children());

        entry.children.push(NavigationSection::default());
        assert!(!entry.has_children());

        entry.children[0].entries.push(NavigationEntry::leaf(
            "x",
            Target::Unresolved {
                link: "x".to_owned(),
            },
        ));
        assert!(entry.has_children());
    }

    #[test]
    fn test_serialize_tagged_target() {
        let section = NavigationSection {
            caption: Some("Guide".to_owned()),
            entries: vec![NavigationEntry::leaf(
                "Example",
                Target::External {
                    url: "https://example.com".to_owned(),
                },
            )],
        };
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "caption": "Guide",
                "entries": [{
                    "title": "Example",
                    "target": {"kind": "external", "url": "https://example.com"}
                }]
            })
        );
    }
}

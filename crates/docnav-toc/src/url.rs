//! Link classification and URL computation.

/// Classifies directive links and computes artifact-relative URLs.
#[derive(Debug, Clone)]
pub struct TargetResolver {
    suffixes: Vec<String>,
    url_schemes: Vec<String>,
    output_extension: String,
    artifact_path: String,
}

impl TargetResolver {
    /// Create a resolver.
    ///
    /// `artifact_path` is the navigation artifact's path relative to the
    /// output root (e.g. `_static/toc.html`); internal URLs are computed
    /// relative to its directory.
    #[must_use]
    pub fn new(
        suffixes: Vec<String>,
        url_schemes: Vec<String>,
        output_extension: impl Into<String>,
        artifact_path: impl Into<String>,
    ) -> Self {
        Self {
            suffixes,
            url_schemes,
            output_extension: output_extension.into(),
            artifact_path: artifact_path.into(),
        }
    }

    /// Whether a link carries one of the recognized URL schemes.
    #[must_use]
    pub fn is_external(&self, link: &str) -> bool {
        let Some((scheme, _)) = link.split_once(':') else {
            return false;
        };
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
            && self
                .url_schemes
                .iter()
                .any(|s| s.eq_ignore_ascii_case(scheme))
    }

    /// Resolve a link written in `current` to a docname.
    ///
    /// A known source suffix is stripped. Links starting with `/` are
    /// relative to the source root, all others to the directory of
    /// `current`. `.` and `..` segments are normalized; `..` past the root
    /// is dropped.
    #[must_use]
    pub fn resolve_docname(&self, current: &str, link: &str) -> String {
        let link = self.strip_suffix(link.trim());

        let mut segments: Vec<&str> = Vec::new();
        if !link.starts_with('/') {
            segments.extend(current.split('/').filter(|s| !s.is_empty()));
            segments.pop();
        }

        for segment in link.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }
        segments.join("/")
    }

    /// URL of a document's rendered page, relative to the artifact.
    #[must_use]
    pub fn page_url(&self, docname: &str) -> String {
        let page = format!("{docname}.{}", self.output_extension);
        relative_path(&self.artifact_path, &page)
    }

    fn strip_suffix<'a>(&self, link: &'a str) -> &'a str {
        self.suffixes
            .iter()
            .find_map(|suffix| link.strip_suffix(suffix.as_str()))
            .filter(|stem| !stem.is_empty() && !stem.ends_with('/'))
            .unwrap_or(link)
    }
}

/// Compute a relative path from one output file to another.
///
/// Both arguments are `/`-separated paths relative to the output root.
/// The last segment of `from` is the file itself and is dropped to get the
/// base directory.
#[must_use]
pub fn relative_path(from: &str, to: &str) -> String {
    let from_segs: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_segs: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let from_dir = if from.ends_with('/') || from_segs.is_empty() {
        &from_segs[..]
    } else {
        &from_segs[..from_segs.len() - 1]
    };

    let common = from_dir
        .iter()
        .zip(&to_segs)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = "../".repeat(from_dir.len() - common);
    let down = to_segs[common..].join("/");
    let result = format!("{ups}{down}");
    if result.is_empty() {
        "./".to_owned()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> TargetResolver {
        TargetResolver::new(
            vec![".rst".to_owned(), ".md".to_owned()],
            vec![
                "http".to_owned(),
                "https".to_owned(),
                "mailto".to_owned(),
                "ftp".to_owned(),
            ],
            "html",
            "_static/toc.html",
        )
    }

    #[test]
    fn test_is_external() {
        let r = resolver();
        assert!(r.is_external("https://example.com"));
        assert!(r.is_external("HTTP://example.com"));
        assert!(r.is_external("mailto:team@example.com"));
        assert!(!r.is_external("javascript:alert(1)"));
        assert!(!r.is_external("guide/intro"));
        assert!(!r.is_external(":caption"));
    }

    #[test]
    fn test_resolve_relative_to_current_dir() {
        let r = resolver();
        assert_eq!(r.resolve_docname("index", "guide/intro"), "guide/intro");
        assert_eq!(r.resolve_docname("guide/index", "intro"), "guide/intro");
        assert_eq!(r.resolve_docname("guide/index", "../api/index"), "api/index");
        assert_eq!(r.resolve_docname("guide/index", "./setup.md"), "guide/setup");
    }

    #[test]
    fn test_resolve_root_relative() {
        let r = resolver();
        assert_eq!(r.resolve_docname("guide/deep/page", "/api/widget"), "api/widget");
        assert_eq!(r.resolve_docname("guide/index", "/index.rst"), "index");
    }

    #[test]
    fn test_resolve_parent_past_root_is_clamped() {
        assert_eq!(resolver().resolve_docname("index", "../../x"), "x");
    }

    #[test]
    fn test_suffix_only_stripped_from_a_name() {
        let r = resolver();
        assert_eq!(r.strip_suffix("notes.md"), "notes");
        assert_eq!(r.strip_suffix(".md"), ".md");
        assert_eq!(r.strip_suffix("guide/.rst"), "guide/.rst");
    }

    #[test]
    fn test_page_url_relative_to_artifact() {
        let r = resolver();
        assert_eq!(r.page_url("guide/intro"), "../guide/intro.html");
        assert_eq!(r.page_url("index"), "../index.html");
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path("toc.html", "guide/intro.html"), "guide/intro.html");
        assert_eq!(relative_path("a/b/toc.html", "a/c.html"), "../c.html");
        assert_eq!(relative_path("a/toc.html", "a/"), "./");
        assert_eq!(relative_path("nav/", "index.html"), "../index.html");
    }
}

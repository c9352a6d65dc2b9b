//! Fragment-href rewriting for a single HTML document.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `href="#path[#fragment]"` in either quote style.
///
/// Groups 1/2 hold path/fragment for double quotes, 3/4 for single quotes.
static FRAGMENT_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r##"href=(?:"#([^"#]+)(?:#([^"]*))?"|'#([^'#]+)(?:#([^']*))?')"##)
        .expect("invalid fragment href regex")
});

/// Page extensions that mark a fragment as a file reference on their own.
const PAGE_EXTENSIONS: [&str; 2] = [".html", ".htm"];

/// Result of rewriting one document.
#[derive(Debug)]
pub struct Rewrite<'a> {
    /// Document content after rewriting.
    pub content: Cow<'a, str>,
    /// Number of hrefs rewritten.
    pub links_fixed: usize,
}

/// Rewrites malformed fragment-only hrefs into relative file links.
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    output_extension: String,
}

impl LinkRewriter {
    /// Create a rewriter appending `.{output_extension}` to bare paths.
    #[must_use]
    pub fn new(output_extension: impl Into<String>) -> Self {
        Self {
            output_extension: output_extension.into(),
        }
    }

    /// Rewrite every malformed href in `html`.
    ///
    /// Borrows the input unchanged when nothing matches.
    #[must_use]
    pub fn rewrite<'a>(&self, html: &'a str) -> Rewrite<'a> {
        let mut links_fixed = 0;
        let content = FRAGMENT_HREF.replace_all(html, |caps: &Captures| {
            let (quote, path, fragment) = match caps.get(1) {
                Some(path) => ('"', path.as_str(), caps.get(2)),
                None => ('\'', &caps[3], caps.get(4)),
            };

            if !is_path_like(path) {
                return caps[0].to_owned();
            }

            links_fixed += 1;
            let mut href = self.complete_path(path);
            if let Some(fragment) = fragment {
                href.push('#');
                href.push_str(fragment.as_str());
            }
            tracing::debug!(from = &caps[0], to = %href, "Rewriting fragment link");
            format!("href={quote}{href}{quote}")
        });

        // `replace_all` allocates whenever any match was found, even if every
        // replacement was identical.
        let content = match content {
            Cow::Owned(_) if links_fixed == 0 => Cow::Borrowed(html),
            other => other,
        };
        Rewrite {
            content,
            links_fixed,
        }
    }

    /// Append the output extension when the last segment has none.
    fn complete_path(&self, path: &str) -> String {
        let last_segment = path.rsplit('/').next().unwrap_or(path);
        if path.ends_with('/') || last_segment.contains('.') {
            path.to_owned()
        } else {
            format!("{path}.{}", self.output_extension)
        }
    }
}

/// Whether a fragment looks like a relative file path rather than an anchor.
///
/// Root-relative fragments (`#/route`) are client-side routes and are left
/// alone; so are plain anchors without a `/` or page extension, and anything
/// whose first segment carries a scheme (`https:`).
fn is_path_like(fragment: &str) -> bool {
    if fragment.starts_with('/') {
        return false;
    }
    let first_segment = fragment.split('/').next().unwrap_or(fragment);
    if first_segment.contains(':') {
        return false;
    }
    let lower = fragment.to_ascii_lowercase();
    fragment.contains('/') || PAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rewrite(html: &str) -> (String, usize) {
        let result = LinkRewriter::new("html").rewrite(html);
        (result.content.into_owned(), result.links_fixed)
    }

    #[test]
    fn test_rewrites_path_with_fragment() {
        assert_eq!(
            rewrite(r##"<a href="#../api/widget#constructor">x</a>"##),
            (
                r#"<a href="../api/widget.html#constructor">x</a>"#.to_owned(),
                1
            )
        );
    }

    #[test]
    fn test_rewrites_single_quoted_path() {
        assert_eq!(
            rewrite("<a href='#../api/widget'>x</a>"),
            ("<a href='../api/widget.html'>x</a>".to_owned(), 1)
        );
    }

    #[test]
    fn test_existing_extension_kept() {
        assert_eq!(
            rewrite(r##"<a href="#guide/intro.html#setup">"##).0,
            r#"<a href="guide/intro.html#setup">"#
        );
        assert_eq!(
            rewrite(r##"<a href="#intro.htm">"##).0,
            r#"<a href="intro.htm">"#
        );
    }

    #[test]
    fn test_trailing_slash_kept() {
        assert_eq!(
            rewrite(r##"<a href="#../guide/">"##).0,
            r#"<a href="../guide/">"#
        );
    }

    #[test]
    fn test_anchors_and_routes_untouched() {
        let html = r##"<a href="#section-2">a</a><a href="#/route/x">b</a><a href="#">c</a>"##;
        let result = LinkRewriter::new("html").rewrite(html);
        assert_eq!(result.links_fixed, 0);
        assert!(matches!(result.content, Cow::Borrowed(_)));
        assert_eq!(result.content, html);
    }

    #[test]
    fn test_fragments_with_scheme_untouched() {
        let html = r##"<a href="#https://example.com/a">a</a><a href='#mailto:x/y'>b</a>"##;
        let result = LinkRewriter::new("html").rewrite(html);
        assert_eq!(result.links_fixed, 0);
        assert_eq!(result.content, html);
    }

    #[test]
    fn test_ordinary_links_untouched() {
        let html = r#"<a href="../api/widget.html#constructor">ok</a><a href="https://x.org/a">ext</a>"#;
        assert_eq!(rewrite(html), (html.to_owned(), 0));
    }

    #[test]
    fn test_idempotent() {
        let (once, fixed) = rewrite(r##"<a href="#../a/b#c">1</a><a href='#d/e'>2</a>"##);
        assert_eq!(fixed, 2);
        assert_eq!(rewrite(&once), (once.clone(), 0));
    }

    #[test]
    fn test_custom_output_extension() {
        let result = LinkRewriter::new("xhtml").rewrite(r##"<a href="#../api/widget">"##);
        assert_eq!(result.content, r#"<a href="../api/widget.xhtml">"#);
    }

    #[test]
    fn test_is_path_like() {
        assert!(is_path_like("../api/widget"));
        assert!(is_path_like("page.HTML"));
        assert!(!is_path_like("/route"));
        assert!(!is_path_like("section"));
        assert!(!is_path_like("v1.2"));
        assert!(!is_path_like("https://example.com/a"));
        assert!(is_path_like("../a:b/c"));
    }
}

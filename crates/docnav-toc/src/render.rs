//! HTML rendering of the navigation tree.
//!
//! The markup follows the sidebar conventions of common documentation
//! themes so existing stylesheets apply: `toctree-l{level}` list items,
//! `reference internal|external` links and checkbox toggles for entries
//! with children.

use std::fmt::Write;

use crate::model::{NavigationEntry, NavigationSection};

const STYLES: &str = include_str!("../assets/toc.css");
const SCRIPT: &str = include_str!("../assets/toc.js");

/// Sequential ids for expand/collapse toggles.
///
/// One generator is created per render so ids start at 1 for every
/// artifact and are unique within it.
#[derive(Debug)]
pub struct IdGenerator {
    next: usize,
}

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Return the next id.
    pub fn next_id(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the tree only, wrapped in a `sidebar-tree` container.
#[must_use]
pub fn render_fragment(sections: &[NavigationSection]) -> String {
    let mut html = String::with_capacity(4096);
    let mut ids = IdGenerator::new();

    html.push_str("<div class=\"sidebar-tree\">\n");
    for section in sections {
        if let Some(caption) = &section.caption {
            let _ = writeln!(
                html,
                "<p class=\"caption\" role=\"heading\"><span class=\"caption-text\">{}</span></p>",
                escape(caption)
            );
        }
        html.push_str("<ul>\n");
        render_entries(&mut html, &section.entries, 1, &mut ids);
        html.push_str("</ul>\n");
    }
    html.push_str("</div>\n");
    html
}

/// Render a standalone HTML page embedding the tree, styles and scripts.
#[must_use]
pub fn render_page(sections: &[NavigationSection], title: &str) -> String {
    let mut html = String::with_capacity(16384);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape(title));
    let _ = writeln!(html, "<style>\n{STYLES}</style>");
    html.push_str("</head>\n<body>\n");

    // Search header
    html.push_str("<div id=\"tocSearchPanel\">\n<div id=\"tocSearchPanelInner\">\n");
    html.push_str(
        "<input id=\"txtSearch\" type=\"search\" placeholder=\"Search\" \
         autocomplete=\"off\" aria-label=\"Search navigation\">\n",
    );
    html.push_str("</div>\n<div id=\"tocSearchResult\"></div>\n</div>\n");

    html.push_str("<div class=\"sidebar-scroll\">\n");
    html.push_str(&render_fragment(sections));
    html.push_str("</div>\n");

    let _ = writeln!(html, "<script>\n{SCRIPT}</script>");
    html.push_str("</body>\n</html>\n");
    html
}

fn render_entries(
    html: &mut String,
    entries: &[NavigationEntry],
    level: usize,
    ids: &mut IdGenerator,
) {
    for entry in entries {
        let has_children = entry.has_children();
        let _ = write!(
            html,
            "<li class=\"toctree-l{level}{}\">",
            if has_children { " has-children" } else { "" }
        );
        let _ = write!(
            html,
            "<a class=\"reference {}\" href=\"{}\" target=\"_top\">{}</a>",
            entry.target.css_class(),
            escape(entry.target.href()),
            escape(&entry.title),
        );

        if has_children {
            let id = ids.next_id();
            let _ = write!(
                html,
                "<input class=\"toctree-checkbox\" id=\"toctree-checkbox-{id}\" \
                 name=\"toctree-checkbox-{id}\" role=\"switch\" type=\"checkbox\">\
                 <label for=\"toctree-checkbox-{id}\"><span class=\"visually-hidden\">\
                 Toggle navigation of {}</span></label>",
                escape(&entry.title)
            );
            html.push_str("\n<ul>\n");
            for section in &entry.children {
                if section.entries.is_empty() {
                    continue;
                }
                if let Some(caption) = &section.caption {
                    let _ = writeln!(
                        html,
                        "<li class=\"caption\"><span class=\"caption-text\">{}</span></li>",
                        escape(caption)
                    );
                }
                render_entries(html, &section.entries, level + 1, ids);
            }
            html.push_str("</ul>\n");
        }

        html.push_str("</li>\n");
    }
}

/// Escape HTML special characters.
fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

//! Title extraction from document source.
//!
//! The title of a document is the text of its first heading, whatever its
//! level. Markdown is parsed with `pulldown-cmark`; reStructuredText titles
//! are recognized by their adornment lines.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::SourceFormat;

/// Characters docutils accepts as section adornment.
const ADORNMENT_CHARS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Extract the first heading of a document.
///
/// Returns `None` when the document has no heading.
#[must_use]
pub fn extract_title(content: &str, format: SourceFormat) -> Option<String> {
    match format {
        SourceFormat::Markdown => markdown_title(content),
        SourceFormat::Rst => rst_title(content),
    }
}

fn markdown_title(content: &str) -> Option<String> {
    let mut in_heading = false;
    let mut title = String::new();

    for event in Parser::new_ext(content, Options::ENABLE_YAML_STYLE_METADATA_BLOCKS) {
        match event {
            Event::Start(Tag::Heading { .. }) => in_heading = true,
            Event::End(TagEnd::Heading(_)) => {
                let trimmed = title.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_owned());
                }
                in_heading = false;
                title.clear();
            }
            Event::Text(text) | Event::Code(text) if in_heading => title.push_str(&text),
            Event::SoftBreak | Event::HardBreak if in_heading => title.push(' '),
            _ => {}
        }
    }
    None
}

/// Check whether a line consists of one repeated adornment character.
fn is_adornment(line: &str) -> bool {
    let line = line.trim_end();
    let mut chars = line.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    ADORNMENT_CHARS.contains(first) && line.len() >= 2 && chars.all(|c| c == first)
}

fn rst_title(content: &str) -> Option<String> {
    let lines: Vec<&str> = content.lines().collect();

    for (i, window) in lines.windows(2).enumerate() {
        let (text, underline) = (window[0], window[1]);
        let overlined = i > 0 && is_adornment(lines[i - 1]);
        if text.trim().is_empty()
            || (text.starts_with(char::is_whitespace) && !overlined)
            || text.starts_with("..")
            || is_adornment(text)
            || !is_adornment(underline)
        {
            continue;
        }

        // A title starts a block: the previous line is blank or an overline.
        let starts_block = i == 0 || overlined || lines[i - 1].trim().is_empty();
        let long_enough = underline.trim_end().chars().count() >= text.trim().chars().count();
        if starts_block && long_enough {
            return Some(text.trim().to_owned());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_atx_heading() {
        let content = "# Getting Started\n\nBody text.";
        assert_eq!(
            extract_title(content, SourceFormat::Markdown),
            Some("Getting Started".to_owned())
        );
    }

    #[test]
    fn test_markdown_first_heading_of_any_level() {
        let content = "Intro paragraph.\n\n## Second Level\n\n# Later Top Level\n";
        assert_eq!(
            extract_title(content, SourceFormat::Markdown),
            Some("Second Level".to_owned())
        );
    }

    #[test]
    fn test_markdown_heading_with_inline_code() {
        let content = "# The `Widget` type\n";
        assert_eq!(
            extract_title(content, SourceFormat::Markdown),
            Some("The Widget type".to_owned())
        );
    }

    #[test]
    fn test_markdown_setext_heading() {
        let content = "User Guide\n==========\n\nText.";
        assert_eq!(
            extract_title(content, SourceFormat::Markdown),
            Some("User Guide".to_owned())
        );
    }

    #[test]
    fn test_markdown_front_matter_is_not_a_heading() {
        let content = "---\norphan: true\n---\n\n# Real Title\n";
        assert_eq!(
            extract_title(content, SourceFormat::Markdown),
            Some("Real Title".to_owned())
        );
    }

    #[test]
    fn test_markdown_heading_inside_code_fence_ignored() {
        let content = "```\n# not a heading\n```\n\nNo headings here.";
        assert_eq!(extract_title(content, SourceFormat::Markdown), None);
    }

    #[test]
    fn test_rst_underlined_title() {
        let content = ".. _label:\n\nWelcome\n=======\n\nSome text.\n";
        assert_eq!(
            extract_title(content, SourceFormat::Rst),
            Some("Welcome".to_owned())
        );
    }

    #[test]
    fn test_rst_overlined_title() {
        let content = "=============\n Slang Docs\n=============\n\nIntro.\n";
        assert_eq!(
            extract_title(content, SourceFormat::Rst),
            Some("Slang Docs".to_owned())
        );
    }

    #[test]
    fn test_rst_short_underline_is_not_title() {
        let content = "A long paragraph line\n--\n";
        assert_eq!(extract_title(content, SourceFormat::Rst), None);
    }

    #[test]
    fn test_rst_directive_is_not_title() {
        let content = ".. toctree::\n   :caption: Guide\n\n   intro\n";
        assert_eq!(extract_title(content, SourceFormat::Rst), None);
    }

    #[test]
    fn test_is_adornment() {
        assert!(is_adornment("====="));
        assert!(is_adornment("~~~~  "));
        assert!(!is_adornment("=-=-"));
        assert!(!is_adornment("abc"));
        assert!(!is_adornment("-"));
        assert!(!is_adornment(""));
    }
}

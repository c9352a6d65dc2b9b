//! Navigation directive parsing.
//!
//! Recognizes `toctree` directives in both source flavors:
//!
//! - `MyST` Markdown: a fenced block opened with ```` ```{toctree} ````,
//!   `~~~{toctree}` or `:::{toctree}` and closed by the same fence.
//! - reStructuredText: `.. toctree::` followed by an indented body.
//!
//! A directive body starts with options (`:caption: Text`, or a `---`
//! delimited YAML block in `MyST`), followed by one entry per line:
//! either `target` or `Title <target>`.

use docnav_source::SourceFormat;

/// One entry line of a navigation directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Explicit title from `Title <target>` syntax.
    pub title: Option<String>,
    /// Link text as written in the source.
    pub target: String,
}

/// A parsed navigation directive, before any link resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveBlock {
    /// `:caption:` option.
    pub caption: Option<String>,
    /// `:glob:` option: entries may contain wildcards.
    pub glob: bool,
    /// `:reversed:` option: resolved entries are listed in reverse order.
    pub reversed: bool,
    /// Entries in source order.
    pub entries: Vec<RawEntry>,
}

/// Parse every navigation directive in a document, in source order.
#[must_use]
pub fn parse_directives(content: &str, format: SourceFormat) -> Vec<DirectiveBlock> {
    match format {
        SourceFormat::Markdown => parse_myst(content),
        SourceFormat::Rst => parse_rst(content),
    }
}

/// Parse an entry line: `Title <target>` or `target`.
#[must_use]
pub fn parse_entry(line: &str) -> Option<RawEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(inner) = line.strip_suffix('>')
        && let Some(open) = inner.rfind('<')
    {
        let title = inner[..open].trim();
        let target = inner[open + 1..].trim();
        if !title.is_empty() && !target.is_empty() {
            return Some(RawEntry {
                title: Some(title.to_owned()),
                target: target.to_owned(),
            });
        }
    }

    Some(RawEntry {
        title: None,
        target: line.to_owned(),
    })
}

/// Parse an option line `:name: value` into `(name, value)`.
fn parse_option(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim().strip_prefix(':')?;
    let (name, value) = rest.split_once(':')?;
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return None;
    }
    Some((name, value.trim()))
}

/// Apply a directive option to a block. Unknown options are ignored.
fn apply_option(block: &mut DirectiveBlock, name: &str, value: &str) {
    match name {
        "caption" if !value.is_empty() => block.caption = Some(value.to_owned()),
        "glob" => block.glob = true,
        "reversed" => block.reversed = true,
        _ => {}
    }
}

/// Build a block from body lines (options first, then entries).
fn parse_body<'a>(lines: impl IntoIterator<Item = &'a str>) -> DirectiveBlock {
    let mut block = DirectiveBlock::default();
    let mut lines = lines.into_iter().peekable();

    // MyST allows options as a YAML block delimited by `---`.
    if lines.peek().is_some_and(|l| l.trim() == "---") {
        lines.next();
        for line in lines.by_ref() {
            if line.trim() == "---" {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                if name.trim() == "glob" || name.trim() == "reversed" {
                    if value.eq_ignore_ascii_case("true") {
                        apply_option(&mut block, name.trim(), "");
                    }
                } else {
                    apply_option(&mut block, name.trim(), value);
                }
            }
        }
    }

    let mut in_options = true;
    for line in lines {
        if in_options {
            if let Some((name, value)) = parse_option(line) {
                apply_option(&mut block, name, value);
                continue;
            }
            in_options = false;
        }
        if let Some(entry) = parse_entry(line) {
            block.entries.push(entry);
        }
    }

    block
}

/// Recognize a fence opening line, returning `(fence_char, fence_len, info)`.
fn fence_open(line: &str) -> Option<(char, usize, &str)> {
    let indent = line.len() - line.trim_start().len();
    if indent > 3 {
        return None;
    }
    let trimmed = line.trim_start();
    let fence_char = trimmed.chars().next().filter(|c| matches!(c, '`' | '~' | ':'))?;
    let fence_len = trimmed.chars().take_while(|&c| c == fence_char).count();
    if fence_len < 3 {
        return None;
    }
    Some((fence_char, fence_len, trimmed[fence_len..].trim()))
}

/// Check whether a line closes a fence opened with `fence_char` x `fence_len`.
fn is_fence_close(line: &str, fence_char: char, fence_len: usize) -> bool {
    let trimmed = line.trim();
    trimmed.chars().count() >= fence_len && trimmed.chars().all(|c| c == fence_char)
}

/// Check whether fence info names the `toctree` directive.
fn is_toctree_info(info: &str) -> bool {
    info.strip_prefix("{toctree}")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

fn parse_myst(content: &str) -> Vec<DirectiveBlock> {
    let mut blocks = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some((fence_char, fence_len, info)) = fence_open(line) else {
            continue;
        };
        // A colon run only opens a directive when followed by `{name}`.
        if fence_char == ':' && !info.starts_with('{') {
            continue;
        }

        let body: Vec<&str> = lines
            .by_ref()
            .take_while(|l| !is_fence_close(l, fence_char, fence_len))
            .collect();

        if is_toctree_info(info) {
            blocks.push(parse_body(body));
        }
    }

    blocks
}

/// Width of leading whitespace.
fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn parse_rst(content: &str) -> Vec<DirectiveBlock> {
    let mut blocks = Vec::new();
    let lines: Vec<&str> = content.lines().collect();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;

        let Some(rest) = line.trim_start().strip_prefix("..") else {
            continue;
        };
        let Some(after) = rest.trim_start().strip_prefix("toctree::") else {
            continue;
        };
        if !rest.starts_with(char::is_whitespace) {
            continue;
        }

        let directive_indent = indent_of(line);
        let mut body = Vec::new();
        // Text after `::` is a directive argument; toctree takes none, so it
        // is read as the first body line.
        if !after.trim().is_empty() {
            body.push(after.trim());
        }
        while i < lines.len() {
            let next = lines[i];
            if !next.trim().is_empty() && indent_of(next) <= directive_indent {
                break;
            }
            body.push(next.trim());
            i += 1;
        }

        // Leading blank lines between the directive and its options.
        let start = body.iter().take_while(|l| l.is_empty()).count();
        blocks.push(parse_body(body[start..].iter().copied()));
    }

    blocks
}

//! Progress lines for docnav commands, written to stderr.

use std::path::Path;

use console::{Style, Term};

/// Styled progress reporter.
///
/// Lines go to stderr so the generated artifacts can be piped elsewhere.
pub(crate) struct Output {
    term: Term,
    label: Style,
    done: Style,
    warn: Style,
    fail: Style,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().dim(),
            done: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red().bold(),
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    /// `label: value` setting line, label dimmed.
    pub(crate) fn setting(&self, label: &str, value: &str) {
        self.line(&format!("{} {value}", self.label.apply_to(format!("{label}:"))));
    }

    /// An artifact was written.
    pub(crate) fn written(&self, artifact: &str, path: &Path) {
        self.line(&self.done.apply_to(written_line(artifact, path)).to_string());
    }

    /// Step finished with a summary.
    pub(crate) fn done(&self, summary: &str) {
        self.line(&self.done.apply_to(summary).to_string());
    }

    /// A file was left untouched because it could not be processed.
    pub(crate) fn skipped(&self, path: &Path, reason: &str) {
        self.line(&self.warn.apply_to(skipped_line(path, reason)).to_string());
    }

    /// A step failed without failing the command.
    pub(crate) fn step_failed(&self, step: &str, err: &dyn std::fmt::Display) {
        self.line(&self.warn.apply_to(format!("Warning: {step}: {err}")).to_string());
    }

    /// Fatal command error.
    pub(crate) fn error(&self, err: &dyn std::fmt::Display) {
        self.line(&self.fail.apply_to(format!("Error: {err}")).to_string());
    }
}

fn written_line(artifact: &str, path: &Path) -> String {
    format!("{artifact} written to {}", path.display())
}

fn skipped_line(path: &Path, reason: &str) -> String {
    format!("  skipped {} ({reason})", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_formats() {
        assert_eq!(
            written_line("Navigation", Path::new("out/_static/toc.html")),
            "Navigation written to out/_static/toc.html"
        );
        assert_eq!(
            skipped_line(Path::new("out/bad.html"), "stream did not contain valid UTF-8"),
            "  skipped out/bad.html (stream did not contain valid UTF-8)"
        );
    }
}

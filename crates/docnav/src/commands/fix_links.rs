//! `docnav fix-links` command implementation.

use std::path::PathBuf;

use clap::Args;
use docnav_config::Config;
use docnav_links::{LinkOptions, NormalizeReport, normalize_links};

use super::CommonArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the fix-links command.
#[derive(Args)]
pub(crate) struct FixLinksArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl FixLinksArgs {
    /// Execute the fix-links command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the output directory is
    /// missing.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load(None, None)?;

        let report = fix_links(&config)?;
        print_report(&output, &report);
        Ok(())
    }
}

/// Build link normalization settings from configuration.
pub(crate) fn link_options(config: &Config) -> LinkOptions {
    LinkOptions {
        scan_dirs: config.links.scan_dirs.iter().map(PathBuf::from).collect(),
        extensions: config.links.extensions.clone(),
        output_extension: config.docs_resolved.output_extension.clone(),
    }
}

/// Normalize links under the configured output directory.
pub(crate) fn fix_links(config: &Config) -> Result<NormalizeReport, CliError> {
    Ok(normalize_links(
        &config.docs_resolved.output_dir,
        &link_options(config),
    )?)
}

/// Summarize a normalization run.
pub(crate) fn print_report(output: &Output, report: &NormalizeReport) {
    for (path, reason) in &report.skipped {
        output.skipped(path, reason);
    }
    output.done(&format!(
        "Fixed {} links in {} of {} files",
        report.links_fixed, report.rewritten, report.scanned
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_link_options_from_config() {
        let mut config = Config::default();
        config.links.scan_dirs = vec!["external/stdlib-reference".to_owned()];
        config.links.extensions = vec!["html".to_owned(), "htm".to_owned()];

        let options = link_options(&config);

        assert_eq!(
            options.scan_dirs,
            vec![PathBuf::from("external/stdlib-reference")]
        );
        assert_eq!(options.extensions, vec!["html", "htm"]);
        assert_eq!(options.output_extension, "html");
    }
}

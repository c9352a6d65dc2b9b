//! `docnav post-build` command implementation.

use clap::Args;
use docnav_config::Config;

use super::fix_links::{fix_links, print_report};
use super::toc::generate_toc;
use super::{CommonArgs, SourceArgs};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the post-build command.
#[derive(Args)]
pub(crate) struct PostBuildArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    source: SourceArgs,
}

/// Outcome of the post-build steps.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct PostBuildSummary {
    pub toc_written: bool,
    pub links_checked: bool,
    pub warnings: usize,
}

impl PostBuildArgs {
    /// Execute the post-build command.
    ///
    /// Step failures are reported as warnings; only configuration errors
    /// fail the command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load(Some(&self.source), None)?;
        let summary = run_steps(&config, &output);
        tracing::info!(
            toc_written = summary.toc_written,
            links_checked = summary.links_checked,
            warnings = summary.warnings,
            "Post-build finished"
        );
        Ok(())
    }
}

/// Run navigation generation and link normalization independently.
pub(crate) fn run_steps(config: &Config, output: &Output) -> PostBuildSummary {
    let mut summary = PostBuildSummary::default();

    match generate_toc(config) {
        Ok(path) => {
            summary.toc_written = true;
            output.written("Navigation", &path);
        }
        Err(e) => {
            summary.warnings += 1;
            tracing::warn!(error = %e, "Navigation generation failed");
            output.step_failed("navigation not generated", &e);
        }
    }

    if config.links.enabled {
        match fix_links(config) {
            Ok(report) => {
                summary.links_checked = true;
                summary.warnings += report.skipped.len();
                print_report(output, &report);
            }
            Err(e) => {
                summary.warnings += 1;
                tracing::warn!(error = %e, "Link normalization failed");
                output.step_failed("links not normalized", &e);
            }
        }
    } else {
        output.setting("Link normalization", "disabled");
    }

    summary
}

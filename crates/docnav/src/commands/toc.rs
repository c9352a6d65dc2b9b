//! `docnav toc` command implementation.

use std::path::PathBuf;

use clap::Args;
use docnav_config::Config;
use docnav_source::FsSource;
use docnav_toc::{TocConfig, TocGenerator};

use super::{CommonArgs, SourceArgs};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the toc command.
#[derive(Args)]
pub(crate) struct TocArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    source: SourceArgs,

    /// Emit only the navigation tree instead of a standalone page.
    #[arg(long)]
    fragment: bool,
}

impl TocArgs {
    /// Execute the toc command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the root document is missing
    /// or the artifact cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let standalone = self.fragment.then_some(false);
        let config = self.common.load(Some(&self.source), standalone)?;

        output.setting(
            "Source directory",
            &config.docs_resolved.source_dir.display().to_string(),
        );
        output.setting("Artifact", &config.toc_output_file().display().to_string());
        let path = generate_toc(&config)?;
        output.written("Navigation", &path);
        Ok(())
    }
}

/// Build the navigation generator settings from configuration.
pub(crate) fn toc_config(config: &Config) -> TocConfig {
    let docs = &config.docs_resolved;
    TocConfig {
        root_doc: docs.root_doc.clone(),
        source_suffixes: docs.source_suffixes.clone(),
        url_schemes: config.toc.url_schemes.clone(),
        output_extension: docs.output_extension.clone(),
        output_path: config.toc.output_path.clone(),
        json_path: config.toc.json_path.clone(),
        comment_mode: config.toc.comment_mode,
        start_marker: config.toc.start_marker.clone(),
        end_marker: config.toc.end_marker.clone(),
        standalone: config.toc.standalone,
        title: config.toc.title.clone(),
    }
}

/// Generate the navigation artifact, returning its path.
pub(crate) fn generate_toc(config: &Config) -> Result<PathBuf, CliError> {
    let docs = &config.docs_resolved;
    let source = FsSource::new(docs.source_dir.clone())
        .with_suffixes(docs.source_suffixes.clone())
        .with_patterns(&docs.include_patterns, &docs.exclude_patterns)?;

    let generator = TocGenerator::new(toc_config(config))?;
    Ok(generator.generate(&source, &docs.output_dir)?)
}

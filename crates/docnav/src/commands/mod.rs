//! CLI command implementations.

pub(crate) mod fix_links;
pub(crate) mod post_build;
pub(crate) mod toc;

use std::path::PathBuf;

use clap::Args;
use docnav_config::{CliSettings, CommentMode, Config};

use crate::error::CliError;

pub(crate) use fix_links::FixLinksArgs;
pub(crate) use post_build::PostBuildArgs;
pub(crate) use toc::TocArgs;

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover docnav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rendered HTML output directory (overrides config).
    #[arg(short, long, env = "DOCNAV_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Options for commands that read the source tree.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Root document (overrides config).
    #[arg(long)]
    root: Option<String>,

    /// Comment-block handling: `out-of-band` or `uncomment` (overrides config).
    #[arg(long)]
    comment_mode: Option<CommentMode>,
}

impl CommonArgs {
    /// Load configuration with CLI overrides applied.
    fn load(&self, source: Option<&SourceArgs>, standalone: Option<bool>) -> Result<Config, CliError> {
        let settings = CliSettings {
            source_dir: source.and_then(|s| s.source_dir.clone()),
            output_dir: self.output_dir.clone(),
            root_doc: source.and_then(|s| s.root.clone()),
            comment_mode: source.and_then(|s| s.comment_mode),
            standalone,
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

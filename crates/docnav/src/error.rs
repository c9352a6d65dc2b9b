//! CLI error types.

use docnav_config::ConfigError;
use docnav_links::NormalizeError;
use docnav_source::SourceError;
use docnav_toc::TocError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Toc(#[from] TocError),

    #[error("{0}")]
    Links(#[from] NormalizeError),
}

use std::path::PathBuf;

use docnav_source::SourceError;

/// Error returned by navigation generation.
#[derive(Debug, thiserror::Error)]
pub enum TocError {
    #[error("Root document '{0}' not found")]
    RootNotFound(String),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Invalid comment markers: {0}")]
    InvalidMarkers(String),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

//! Error types for the build pipeline.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for build operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors that can occur while building a pack.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Build file {0:?} not found")]
    BuildFileNotFound(PathBuf),

    #[error("Failed to parse build file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unknown format '{format}' of language translate data for {language}")]
    UnsupportedFormat { language: String, format: String },

    #[error("Invalid language data in {path:?}: {message}")]
    LanguageData { path: PathBuf, message: String },

    #[error("Failed to read {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid upstream language file {path}: {message}")]
    UpstreamData { path: String, message: String },

    #[error("Upstream language merge timed out after {0:?}")]
    MergeTimeout(Duration),

    #[error("Upstream language merge task failed: {0}")]
    MergeTask(String),

    #[error("Asset error: {0}")]
    Asset(#[from] canary_assets::AssetError),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BuildError {
    /// Whether the error comes from the build file or the data it references.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigParse { .. } | Self::UnsupportedFormat { .. } | Self::LanguageData { .. }
        )
    }

    /// Whether the error comes from upstream asset merging.
    pub fn is_upstream_error(&self) -> bool {
        matches!(
            self,
            Self::Asset(_) | Self::UpstreamData { .. } | Self::MergeTimeout(_) | Self::MergeTask(_)
        )
    }
}

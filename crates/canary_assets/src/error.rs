//! Error types for asset fetching.

use thiserror::Error;

/// Result type alias for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;

/// Errors that can occur while fetching upstream assets.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Unknown Minecraft version: {0}")]
    UnknownVersion(String),

    #[error("Asset {path} not found for Minecraft {version}")]
    AssetNotFound { version: String, path: String },

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Malformed metadata from {url}: {message}")]
    Metadata { url: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

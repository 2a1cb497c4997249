//! Mock asset fetcher for testing.
//!
//! Serves canned assets and records every request, so tests can assert on
//! which assets a build asked for without touching the network.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{AssetError, AssetResult};
use crate::fetcher::AssetFetcher;

/// Captured fetch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFetch {
    pub version: String,
    pub path: String,
}

/// Mock asset fetcher.
#[derive(Clone, Default)]
pub struct MockFetcher {
    assets: Arc<RwLock<HashMap<(String, String), Vec<u8>>>>,
    captured: Arc<RwLock<Vec<CapturedFetch>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    hang: Arc<RwLock<bool>>,
}

impl MockFetcher {
    /// Create a mock with no assets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` for `(version, path)`.
    pub fn with_asset(self, version: &str, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.assets
            .write()
            .insert((version.to_string(), path.to_string()), content.into());
        self
    }

    /// Delay every response.
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.write() = Some(delay);
        self
    }

    /// Never answer, like a stalled connection.
    pub fn hanging(self) -> Self {
        *self.hang.write() = true;
        self
    }

    /// All requests seen so far.
    pub fn captured(&self) -> Vec<CapturedFetch> {
        self.captured.read().clone()
    }

    /// Number of requests seen so far.
    pub fn call_count(&self) -> usize {
        self.captured.read().len()
    }
}

#[async_trait]
impl AssetFetcher for MockFetcher {
    async fn fetch_asset(&self, version: &str, path: &str) -> AssetResult<Vec<u8>> {
        self.captured.write().push(CapturedFetch {
            version: version.to_string(),
            path: path.to_string(),
        });

        let hang = *self.hang.read();
        if hang {
            std::future::pending::<()>().await;
        }

        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let asset = self
            .assets
            .read()
            .get(&(version.to_string(), path.to_string()))
            .cloned();
        asset.ok_or_else(|| AssetError::AssetNotFound {
            version: version.to_string(),
            path: path.to_string(),
        })
    }
}

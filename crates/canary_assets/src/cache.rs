//! On-disk cache for upstream assets.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::AssetResult;
use crate::fetcher::AssetFetcher;

/// Default cache location, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = ".icecanary/cache";

/// Fetcher decorator that stores every fetched asset under
/// `<root>/<version>/<path>` and serves later requests from disk.
pub struct CachedFetcher<F> {
    inner: F,
    root: PathBuf,
}

impl<F: AssetFetcher> CachedFetcher<F> {
    /// Wrap a fetcher with a cache rooted at `root`.
    pub fn new(inner: F, root: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            root: root.into(),
        }
    }

    /// Location of a cached asset. Parent and root components of `path` are
    /// dropped so entries always stay inside the cache root.
    pub fn cache_path(&self, version: &str, path: &str) -> PathBuf {
        let mut target = self.root.join(sanitize(version));
        for component in Path::new(path).components() {
            if let Component::Normal(part) = component {
                target.push(part);
            }
        }
        target
    }
}

fn sanitize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| if c == '/' || c == '\\' || c == ':' { '_' } else { c })
        .collect()
}

#[async_trait]
impl<F: AssetFetcher> AssetFetcher for CachedFetcher<F> {
    async fn fetch_asset(&self, version: &str, path: &str) -> AssetResult<Vec<u8>> {
        let cached = self.cache_path(version, path);

        if let Ok(bytes) = tokio::fs::read(&cached).await {
            debug!("Cache hit: {:?}", cached);
            return Ok(bytes);
        }

        let bytes = self.inner.fetch_asset(version, path).await?;

        if let Some(parent) = cached.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                warn!("Failed to create cache directory {:?}: {}", parent, e);
                return Ok(bytes);
            }
        }
        if let Err(e) = tokio::fs::write(&cached, &bytes).await {
            warn!("Failed to cache {:?}: {}", cached, e);
        } else {
            debug!("Cached: {:?}", cached);
        }

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockFetcher;
    use tempfile::tempdir;

    #[test]
    fn test_cache_path_stays_inside_root() {
        let cache = CachedFetcher::new(MockFetcher::new(), "/tmp/cache");
        assert_eq!(
            cache.cache_path("1.16.5", "assets/minecraft/lang/zh_CN.json"),
            PathBuf::from("/tmp/cache/1.16.5/assets/minecraft/lang/zh_CN.json")
        );
        assert_eq!(
            cache.cache_path("../x", "/../../etc/passwd"),
            PathBuf::from("/tmp/cache/.._x/etc/passwd")
        );
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_disk() {
        let temp = tempdir().unwrap();
        let mock = MockFetcher::new().with_asset("1.16.5", "assets/a.json", b"{}".to_vec());
        let cache = CachedFetcher::new(mock.clone(), temp.path());

        let first = cache.fetch_asset("1.16.5", "assets/a.json").await.unwrap();
        let second = cache.fetch_asset("1.16.5", "assets/a.json").await.unwrap();

        assert_eq!(first, b"{}");
        assert_eq!(second, b"{}");
        assert_eq!(mock.call_count(), 1);
        assert!(temp.path().join("1.16.5/assets/a.json").exists());
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let temp = tempdir().unwrap();
        let mock = MockFetcher::new();
        let cache = CachedFetcher::new(mock.clone(), temp.path());

        assert!(cache.fetch_asset("1.16.5", "assets/missing.json").await.is_err());
        assert!(!temp.path().join("1.16.5/assets/missing.json").exists());
    }
}

//! Fetcher backed by Mojang's launcher metadata and resource CDN.
//!
//! Resolution goes version manifest → version JSON → asset index → object
//! hash → resource download. Asset indexes are kept in memory per version, so
//! several merges against the same version only resolve metadata once.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{AssetError, AssetResult};
use crate::fetcher::AssetFetcher;

/// Default location of the launcher version manifest.
pub const VERSION_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

/// Default base URL for hashed resource objects.
pub const RESOURCES_URL: &str = "https://resources.download.minecraft.net";

#[derive(Debug, Deserialize)]
struct VersionManifest {
    versions: Vec<VersionRef>,
}

#[derive(Debug, Deserialize)]
struct VersionRef {
    id: String,
    url: String,
}

impl VersionManifest {
    fn find(&self, id: &str) -> AssetResult<&VersionRef> {
        self.versions
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| AssetError::UnknownVersion(id.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct VersionMeta {
    #[serde(rename = "assetIndex")]
    asset_index: AssetIndexRef,
}

#[derive(Debug, Deserialize)]
struct AssetIndexRef {
    url: String,
}

/// Parsed asset index (`objects` maps logical paths to hashed objects).
#[derive(Debug, Deserialize)]
pub struct AssetIndex {
    objects: HashMap<String, AssetObject>,
}

#[derive(Debug, Clone, Deserialize)]
struct AssetObject {
    hash: String,
}

impl AssetIndex {
    /// Find the object hash for a game-relative asset path.
    ///
    /// The `assets/` prefix is optional. Lookups fall back to the lowercased
    /// key since the index stores lowercase locale names.
    pub fn hash_for(&self, path: &str) -> Option<&str> {
        let key = path.trim_start_matches('/');
        let key = key.strip_prefix("assets/").unwrap_or(key);

        self.objects
            .get(key)
            .or_else(|| self.objects.get(&key.to_lowercase()))
            .map(|o| o.hash.as_str())
    }
}

/// Asset fetcher talking to Mojang's public endpoints.
pub struct MojangFetcher {
    client: reqwest::Client,
    manifest_url: String,
    resources_url: String,
    indexes: RwLock<HashMap<String, Arc<AssetIndex>>>,
}

impl Default for MojangFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MojangFetcher {
    /// Create a fetcher using the public Mojang endpoints.
    pub fn new() -> Self {
        Self::with_endpoints(VERSION_MANIFEST_URL, RESOURCES_URL)
    }

    /// Create a fetcher against custom endpoints (mirrors, proxies).
    pub fn with_endpoints(manifest_url: impl Into<String>, resources_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            manifest_url: manifest_url.into(),
            resources_url: resources_url.into().trim_end_matches('/').to_string(),
            indexes: RwLock::new(HashMap::new()),
        }
    }

    /// Use a preconfigured HTTP client (proxies, timeouts, user agent).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    async fn get_bytes(&self, url: &str) -> AssetResult<Vec<u8>> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> AssetResult<T> {
        let bytes = self.get_bytes(url).await?;
        serde_json::from_slice(&bytes).map_err(|e| AssetError::Metadata {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Resolve (and memoize) the asset index for a version.
    async fn asset_index(&self, version: &str) -> AssetResult<Arc<AssetIndex>> {
        let cached = self.indexes.read().get(version).cloned();
        if let Some(index) = cached {
            return Ok(index);
        }

        let manifest: VersionManifest = self.get_json(&self.manifest_url).await?;
        let version_ref = manifest.find(version)?;

        let meta: VersionMeta = self.get_json(&version_ref.url).await?;
        let index: Arc<AssetIndex> = Arc::new(self.get_json(&meta.asset_index.url).await?);

        self.indexes
            .write()
            .insert(version.to_string(), index.clone());
        Ok(index)
    }

    fn object_url(&self, hash: &str) -> AssetResult<String> {
        let prefix = hash.get(..2).ok_or_else(|| AssetError::Metadata {
            url: self.resources_url.clone(),
            message: format!("invalid object hash {:?}", hash),
        })?;
        Ok(format!("{}/{}/{}", self.resources_url, prefix, hash))
    }
}

#[async_trait]
impl AssetFetcher for MojangFetcher {
    async fn fetch_asset(&self, version: &str, path: &str) -> AssetResult<Vec<u8>> {
        let index = self.asset_index(version).await?;
        let hash = index.hash_for(path).ok_or_else(|| AssetError::AssetNotFound {
            version: version.to_string(),
            path: path.to_string(),
        })?;

        self.get_bytes(&self.object_url(hash)?).await
    }
}

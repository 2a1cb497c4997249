//! Asset fetcher trait.

use async_trait::async_trait;

use crate::error::AssetResult;

/// Source of upstream Minecraft assets.
///
/// `path` is relative to the game directory, e.g.
/// `assets/minecraft/lang/zh_cn.json`.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch the raw bytes of an asset for a Minecraft version.
    async fn fetch_asset(&self, version: &str, path: &str) -> AssetResult<Vec<u8>>;
}

/// Path of the base-game language file for a locale.
pub fn lang_asset_path(locale: &str) -> String {
    format!("assets/minecraft/lang/{}.json", locale)
}

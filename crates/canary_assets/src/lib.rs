//! # canary_assets
//!
//! Upstream Minecraft asset access for IceCanary.
//!
//! Language merges need the base-game translation files of a given Minecraft
//! version. This crate hides where those bytes come from:
//!
//! - [`MojangFetcher`] resolves assets through Mojang's launcher metadata
//! - [`CachedFetcher`] keeps downloaded assets on disk between builds
//! - [`MockFetcher`] serves canned assets in tests
//!
//! ## Example
//!
//! ```rust,no_run
//! use canary_assets::{lang_asset_path, AssetFetcher, CachedFetcher, MojangFetcher};
//!
//! # async fn run() -> canary_assets::AssetResult<()> {
//! let fetcher = CachedFetcher::new(MojangFetcher::new(), ".icecanary/cache");
//! let bytes = fetcher.fetch_asset("1.16.5", &lang_asset_path("zh_CN")).await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod fetcher;
pub mod mock;
pub mod mojang;

pub use cache::{CachedFetcher, DEFAULT_CACHE_DIR};
pub use error::{AssetError, AssetResult};
pub use fetcher::{lang_asset_path, AssetFetcher};
pub use mock::{CapturedFetch, MockFetcher};
pub use mojang::{AssetIndex, MojangFetcher, RESOURCES_URL, VERSION_MANIFEST_URL};

//! Pipeline stages.
//!
//! Each stage turns one part of the build file into pack entries written
//! through the [`OutputSink`]. Stages are independent of each other; the
//! driver runs them in the fixed order returned by [`default_stages`].
//!
//! # Example
//!
//! ```rust,ignore
//! use canary_core::{Stage, StageContext, BuildResult};
//!
//! struct CreditsStage;
//!
//! impl Stage for CreditsStage {
//!     fn name(&self) -> &str { "credits" }
//!     fn description(&self) -> &str { "Writes credits.txt" }
//!
//!     fn run(&self, ctx: &mut StageContext<'_>) -> BuildResult<()> {
//!         ctx.sink.write("credits.txt", b"Thanks!")
//!     }
//! }
//! ```

use std::sync::Arc;

use canary_assets::AssetFetcher;

use crate::config::BuildConfig;
use crate::error::BuildResult;
use crate::sink::OutputSink;
use crate::tracker::CompletionGroup;

pub mod icon;
pub mod language;
pub mod metadata;
pub mod raw;

pub use icon::IconStage;
pub use language::{load_texts, merge_upstream, LanguageStage, MergedLanguage};
pub use metadata::{pack_metadata, MetadataStage};
pub use raw::{copy_tree, ArchiveRawStage, RawStage};

/// Where upstream language files come from.
#[derive(Clone)]
pub struct Upstream {
    pub fetcher: Arc<dyn AssetFetcher>,
    /// Minecraft version used for upstream lookups
    pub mc_version: String,
}

/// Everything a stage may read or write.
pub struct StageContext<'a> {
    pub config: &'a BuildConfig,
    pub sink: &'a mut dyn OutputSink,
    /// Asynchronous units the driver awaits before finalizing
    pub merges: &'a mut CompletionGroup<MergedLanguage>,
    pub upstream: &'a Upstream,
}

/// One generation step of the pipeline.
pub trait Stage: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Run the stage. Asynchronous work goes into `ctx.merges`.
    fn run(&self, ctx: &mut StageContext<'_>) -> BuildResult<()>;
}

/// The stages of a pack build, in execution order.
pub fn default_stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(MetadataStage),
        Box::new(IconStage),
        Box::new(LanguageStage),
        Box::new(RawStage),
        Box::new(ArchiveRawStage),
    ]
}

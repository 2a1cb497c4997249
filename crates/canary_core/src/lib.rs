//! # canary_core
//!
//! Resource pack build pipeline for IceCanary.
//!
//! A build reads a YAML build file into a [`BuildConfig`], runs a fixed
//! sequence of [`Stage`]s that write pack entries through an [`OutputSink`],
//! waits for any upstream language merges tracked by a [`CompletionGroup`],
//! and finally finalizes the sink.
//!
//! # Architecture
//!
//! - **Config**: build file model and default resolution
//! - **Sink**: directory or ZIP archive output with shared path rules
//! - **Stages**: metadata, icon, languages, raw copy, raw-to-archive copy
//! - **Tracker**: joins the asynchronous merges before finalization
//! - **Pipeline**: the driver tying everything together
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use canary_assets::{CachedFetcher, MojangFetcher};
//! use canary_core::{BuildOptions, PackBuilder};
//!
//! # async fn run() -> canary_core::BuildResult<()> {
//! let fetcher = Arc::new(CachedFetcher::new(MojangFetcher::new(), ".icecanary/cache"));
//! let options = BuildOptions::new("icecanary.yml", "outputs");
//!
//! let report = PackBuilder::new(options, fetcher).build().await?;
//! println!("Built {} ({} files)", report.pack, report.files_written);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod flatten;
pub mod pipeline;
pub mod sink;
pub mod stages;
pub mod tracker;

pub use config::{BuildConfig, DataFormat, LanguageData, LanguageEntry, ResolvedLanguage};
pub use error::{BuildError, BuildResult};
pub use flatten::{flatten, Texts};
pub use pipeline::{prepare_output_dir, BuildOptions, BuildReport, PackBuilder};
pub use sink::{create_sink, ArchiveSink, DirectorySink, OutputSink};
pub use stages::{default_stages, MergedLanguage, Stage, StageContext, Upstream};
pub use tracker::CompletionGroup;

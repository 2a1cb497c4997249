//! Pipeline driver.
//!
//! A build runs strictly in this order:
//!
//! 1. check the build file exists and prepare (create or empty) the output
//!    directory
//! 2. load the build file
//! 3. create the output sink
//! 4. run every stage in order
//! 5. wait for upstream merges and write their results
//! 6. finalize the sink

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use canary_assets::AssetFetcher;
use tracing::{debug, info};

use crate::config::{BuildConfig, DEFAULT_BUILD_FILE};
use crate::error::{BuildError, BuildResult};
use crate::sink::create_sink;
use crate::stages::{default_stages, Stage, StageContext, Upstream};
use crate::tracker::CompletionGroup;

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Default bound on upstream merges, in seconds.
pub const DEFAULT_MERGE_TIMEOUT_SECS: u64 = 120;

/// How a build is run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Build file to read
    pub build_file: PathBuf,
    /// Directory receiving the pack or the archive
    pub output_dir: PathBuf,
    /// Package into a ZIP archive instead of a directory tree
    pub archive: bool,
    /// Minecraft version for upstream lookups, overriding `mcver`
    pub mc_version: Option<String>,
    /// Bound on upstream merges; `None` waits forever
    pub merge_timeout: Option<Duration>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            build_file: PathBuf::from(DEFAULT_BUILD_FILE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            archive: true,
            mc_version: None,
            merge_timeout: Some(Duration::from_secs(DEFAULT_MERGE_TIMEOUT_SECS)),
        }
    }
}

impl BuildOptions {
    pub fn new(build_file: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_file: build_file.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Write a directory tree instead of an archive.
    pub fn directory(mut self) -> Self {
        self.archive = false;
        self
    }

    /// Override the Minecraft version used for upstream lookups.
    pub fn with_mc_version(mut self, version: impl Into<String>) -> Self {
        self.mc_version = Some(version.into());
        self
    }

    /// Bound upstream merges (`None` disables the bound).
    pub fn with_merge_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.merge_timeout = timeout;
        self
    }
}

/// Summary of a finished build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// `<name>-<version>`
    pub pack: String,
    /// Archive path when packaging into an archive
    pub archive: Option<PathBuf>,
    /// Number of distinct entries written
    pub files_written: usize,
    /// Codes of languages merged with upstream texts
    pub merged_languages: Vec<String>,
}

/// Create the output directory, or empty it when it already exists.
pub fn prepare_output_dir(path: &Path) -> BuildResult<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
        return Ok(());
    }

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    debug!("Emptied output directory {:?}", path);
    Ok(())
}

/// Runs pack builds.
pub struct PackBuilder {
    options: BuildOptions,
    fetcher: Arc<dyn AssetFetcher>,
    stages: Vec<Box<dyn Stage>>,
}

impl PackBuilder {
    /// Create a builder with the standard stages.
    pub fn new(options: BuildOptions, fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self {
            options,
            fetcher,
            stages: default_stages(),
        }
    }

    /// Run a full build from the build file.
    pub async fn build(&self) -> BuildResult<BuildReport> {
        let build_file = &self.options.build_file;
        if !build_file.is_file() {
            return Err(BuildError::BuildFileNotFound(build_file.clone()));
        }

        prepare_output_dir(&self.options.output_dir)?;
        let config = BuildConfig::load(build_file)?;

        self.build_config(&config).await
    }

    /// Run the stages for an already loaded config into the output directory.
    pub async fn build_config(&self, config: &BuildConfig) -> BuildResult<BuildReport> {
        info!("Building {}-{}", config.name, config.version);

        let mut sink = create_sink(config, &self.options.output_dir, self.options.archive);
        let upstream = Upstream {
            fetcher: self.fetcher.clone(),
            mc_version: self
                .options
                .mc_version
                .clone()
                .unwrap_or_else(|| config.mcver.clone()),
        };
        let mut merges = CompletionGroup::new();

        {
            let mut ctx = StageContext {
                config,
                sink: sink.as_mut(),
                merges: &mut merges,
                upstream: &upstream,
            };
            for stage in &self.stages {
                debug!("Running stage {}: {}", stage.name(), stage.description());
                stage.run(&mut ctx)?;
            }
        }

        if merges.started() > 0 {
            info!(
                "Waiting for {} upstream language merge(s) against Minecraft {}",
                merges.started(),
                upstream.mc_version
            );
        }

        let mut merged_languages = Vec::new();
        for merged in merges.wait(self.options.merge_timeout).await? {
            sink.write(&merged.path, &merged.content)?;
            merged_languages.push(merged.code);
        }

        let files_written = sink.files_written();
        let archive = sink.finalize()?;

        Ok(BuildReport {
            pack: format!("{}-{}", config.name, config.version),
            archive,
            files_written,
            merged_languages,
        })
    }
}

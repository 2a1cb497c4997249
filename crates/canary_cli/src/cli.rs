//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use canary_assets::DEFAULT_CACHE_DIR;
use canary_core::config::DEFAULT_BUILD_FILE;
use canary_core::pipeline::{DEFAULT_MERGE_TIMEOUT_SECS, DEFAULT_OUTPUT_DIR};
use canary_core::BuildOptions;
use clap::Parser;

/// IceCanary - Minecraft resource pack builder
#[derive(Parser, Debug)]
#[command(name = "icecanary")]
#[command(version, about = "IceCanary - Minecraft resource pack builder")]
#[command(long_about = r#"
IceCanary builds a Minecraft resource pack from a YAML build file: pack
metadata, icon, language files (optionally merged with the base-game
translations), and raw asset directories, packed into a ZIP archive or
written as a directory tree.

EXIT CODES:
  0 - Success
  1 - General error
  2 - Build file not found
  3 - Build file or language data error
  4 - Upstream asset error (fetch failure or merge timeout)
"#)]
pub struct Cli {
    /// Build file to use
    #[arg(short, long, default_value = DEFAULT_BUILD_FILE)]
    pub file: PathBuf,

    /// Output folder (emptied before each build)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Do not create a ZIP archive, write a directory tree instead
    #[arg(short = 'z', long)]
    pub nozip: bool,

    /// Minecraft version used for upstream assets, overriding `mcver`
    #[arg(long, visible_alias = "mcv")]
    pub mcversion: Option<String>,

    /// Directory caching downloaded Minecraft assets
    #[arg(long, env = "ICECANARY_CACHE_DIR", default_value = DEFAULT_CACHE_DIR)]
    pub cache_dir: PathBuf,

    /// Always download Minecraft assets, bypassing the cache
    #[arg(long)]
    pub no_cache: bool,

    /// Seconds to wait for upstream language merges (0 waits forever)
    #[arg(long, env = "ICECANARY_MERGE_TIMEOUT", default_value_t = DEFAULT_MERGE_TIMEOUT_SECS)]
    pub merge_timeout: u64,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Build options described by the arguments.
    pub fn build_options(&self) -> BuildOptions {
        let mut options = BuildOptions::new(&self.file, &self.output)
            .with_merge_timeout((self.merge_timeout > 0).then(|| Duration::from_secs(self.merge_timeout)));

        if self.nozip {
            options = options.directory();
        }
        if let Some(version) = &self.mcversion {
            options = options.with_mc_version(version);
        }
        options
    }

    /// Default log filter for the chosen verbosity.
    pub fn log_directives(&self) -> &'static str {
        if self.verbose {
            "canary_cli=debug,canary_core=debug,canary_assets=debug,info"
        } else if self.quiet {
            "warn"
        } else {
            "canary_cli=info,canary_core=info,canary_assets=info,warn"
        }
    }
}

//! Build command - build the resource pack described by the build file.

use std::sync::Arc;

use anyhow::Result;
use canary_assets::{AssetFetcher, CachedFetcher, MojangFetcher};
use canary_core::PackBuilder;
use console::style;
use tracing::{debug, info};

use crate::cli::Cli;

pub async fn execute(cli: &Cli) -> Result<()> {
    let fetcher: Arc<dyn AssetFetcher> = if cli.no_cache {
        Arc::new(MojangFetcher::new())
    } else {
        debug!("Using asset cache at {:?}", cli.cache_dir);
        Arc::new(CachedFetcher::new(MojangFetcher::new(), &cli.cache_dir))
    };

    let report = PackBuilder::new(cli.build_options(), fetcher).build().await?;

    match &report.archive {
        Some(archive) => info!("Packed {} into {}", report.pack, archive.display()),
        None => info!(
            "Wrote {} files for {} to {}",
            report.files_written,
            report.pack,
            cli.output.display()
        ),
    }
    if !report.merged_languages.is_empty() {
        info!("Merged upstream texts into: {}", report.merged_languages.join(", "));
    }

    println!("{}", style("Successful!").green().bold());
    Ok(())
}

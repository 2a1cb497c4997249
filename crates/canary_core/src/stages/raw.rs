//! Raw asset copying.

use std::fs;
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{BuildError, BuildResult};
use crate::sink::OutputSink;
use crate::stages::{Stage, StageContext};

/// Copy every file below `source` into the sink under `base`.
///
/// Entries keep their path relative to `source`; an empty `base` places them
/// at the output root. Returns the number of files copied.
pub fn copy_tree(sink: &mut dyn OutputSink, base: &str, source: &Path) -> BuildResult<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(source)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let name = if base.is_empty() {
            relative
        } else {
            format!("{}/{}", base, relative)
        };

        let content = fs::read(entry.path()).map_err(|source| BuildError::ReadFailed {
            path: entry.path().to_path_buf(),
            source,
        })?;
        sink.write(&name, &content)?;
        copied += 1;
    }

    debug!("Copied {} files from {:?}", copied, source);
    Ok(copied)
}

/// Copies each `raw` directory to `assets/<name>/`.
pub struct RawStage;

impl Stage for RawStage {
    fn name(&self) -> &str {
        "raw"
    }

    fn description(&self) -> &str {
        "Copies raw asset directories into assets/"
    }

    fn run(&self, ctx: &mut StageContext<'_>) -> BuildResult<()> {
        for (name, source) in ctx.config.raw.iter().flatten() {
            info!("Creating raw data from {} as {}", source.display(), name);
            copy_tree(ctx.sink, &format!("assets/{}", name), source)?;
        }
        Ok(())
    }
}

/// Copies `archive_raw` to the output root.
pub struct ArchiveRawStage;

impl Stage for ArchiveRawStage {
    fn name(&self) -> &str {
        "archive-raw"
    }

    fn description(&self) -> &str {
        "Copies a directory to the output root"
    }

    fn run(&self, ctx: &mut StageContext<'_>) -> BuildResult<()> {
        if let Some(source) = &ctx.config.archive_raw {
            info!("Copying {} to the output root", source.display());
            copy_tree(ctx.sink, "", source)?;
        }
        Ok(())
    }
}

//! Pack icon copy.

use std::fs;

use crate::error::{BuildError, BuildResult};
use crate::stages::{Stage, StageContext};

/// Copies the configured icon to `pack.png`.
pub struct IconStage;

impl Stage for IconStage {
    fn name(&self) -> &str {
        "icon"
    }

    fn description(&self) -> &str {
        "Copies the pack icon"
    }

    fn run(&self, ctx: &mut StageContext<'_>) -> BuildResult<()> {
        let Some(icon) = &ctx.config.icon else {
            return Ok(());
        };

        let content = fs::read(icon).map_err(|source| BuildError::ReadFailed {
            path: icon.clone(),
            source,
        })?;
        ctx.sink.write("pack.png", &content)
    }
}

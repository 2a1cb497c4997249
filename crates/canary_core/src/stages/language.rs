//! Language file generation.
//!
//! Every configured language becomes `assets/<ns>/lang/<code>.json`. Texts
//! are read from the language's data file, flattened when the data is
//! objective, and for merge-mode languages completed with the upstream
//! base-game translations of the same Minecraft version. Local texts always
//! win over upstream ones.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use canary_assets::{lang_asset_path, AssetFetcher};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::{DataFormat, ResolvedLanguage};
use crate::error::{BuildError, BuildResult};
use crate::flatten::{flatten, Texts};
use crate::stages::{Stage, StageContext};

/// Output of an upstream merge, written by the driver once all merges end.
#[derive(Debug, Clone)]
pub struct MergedLanguage {
    pub code: String,
    pub path: String,
    pub content: Vec<u8>,
}

/// Read a language's translation texts.
pub fn load_texts(language: &ResolvedLanguage) -> BuildResult<Texts> {
    let path = &language.file;
    let content = fs::read_to_string(path).map_err(|source| BuildError::ReadFailed {
        path: path.clone(),
        source,
    })?;

    let value: Value = match language.format {
        DataFormat::Json => serde_json::from_str(&content).map_err(|e| invalid(path, e))?,
        DataFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| invalid(path, e))?,
    };

    if language.objective {
        return Ok(flatten(&value));
    }

    match value {
        Value::Object(texts) => Ok(texts),
        Value::Null => Ok(Texts::new()),
        _ => Err(BuildError::LanguageData {
            path: path.clone(),
            message: "expected a mapping of translation keys".to_string(),
        }),
    }
}

fn invalid(path: &Path, err: impl std::fmt::Display) -> BuildError {
    BuildError::LanguageData {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Add every upstream key missing from `local`.
pub fn merge_upstream(mut local: Texts, upstream: &[u8], source: &str) -> BuildResult<Texts> {
    let upstream: Value = serde_json::from_slice(upstream).map_err(|e| BuildError::UpstreamData {
        path: source.to_string(),
        message: e.to_string(),
    })?;

    let Value::Object(upstream) = upstream else {
        return Err(BuildError::UpstreamData {
            path: source.to_string(),
            message: "expected a JSON object".to_string(),
        });
    };

    let mut added = 0;
    for (key, text) in upstream {
        if !local.contains_key(&key) {
            local.insert(key, text);
            added += 1;
        }
    }
    debug!("Merged {} upstream keys from {}", added, source);

    Ok(local)
}

/// One pending upstream merge.
struct MergeJob {
    code: String,
    path: String,
    asset: String,
    version: String,
    texts: Texts,
}

impl MergeJob {
    async fn run(self, fetcher: Arc<dyn AssetFetcher>) -> BuildResult<MergedLanguage> {
        let upstream = fetcher.fetch_asset(&self.version, &self.asset).await?;
        let merged = merge_upstream(self.texts, &upstream, &self.asset)?;

        Ok(MergedLanguage {
            code: self.code,
            path: self.path,
            content: serde_json::to_vec(&merged)?,
        })
    }
}

/// Generates language files.
pub struct LanguageStage;

impl Stage for LanguageStage {
    fn name(&self) -> &str {
        "languages"
    }

    fn description(&self) -> &str {
        "Generates language files, merging upstream translations when asked"
    }

    fn run(&self, ctx: &mut StageContext<'_>) -> BuildResult<()> {
        for (code, entry) in ctx.config.language_entries() {
            info!("Creating language {} as {}", entry.name, code);

            let language = entry.resolve(code)?;
            let texts = load_texts(&language)?;

            let Some(locale) = language.merge_locale.clone() else {
                ctx.sink.write(&language.output_path(), &serde_json::to_vec(&texts)?)?;
                continue;
            };

            let job = MergeJob {
                code: language.code.clone(),
                path: language.output_path(),
                asset: lang_asset_path(&locale),
                version: ctx.upstream.mc_version.clone(),
                texts,
            };
            debug!("Merging {} with upstream {} ({})", job.code, locale, job.version);
            ctx.merges.start(job.run(ctx.upstream.fetcher.clone()));
        }

        Ok(())
    }
}

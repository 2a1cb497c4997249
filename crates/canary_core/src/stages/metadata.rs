//! `pack.mcmeta` generation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::BuildConfig;
use crate::error::BuildResult;
use crate::stages::{Stage, StageContext};

#[derive(Debug, Serialize)]
struct PackMeta<'a> {
    pack: PackSection<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<BTreeMap<&'a str, LanguageMeta<'a>>>,
}

#[derive(Debug, Serialize)]
struct PackSection<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    pack_format: u32,
}

#[derive(Debug, Serialize)]
struct LanguageMeta<'a> {
    name: &'a str,
    region: &'a str,
    bidirectional: bool,
}

/// Serialize the `pack.mcmeta` document for a build.
pub fn pack_metadata(config: &BuildConfig) -> BuildResult<Vec<u8>> {
    let language = config.has_languages().then(|| {
        config
            .language_entries()
            .map(|(code, entry)| {
                (
                    code.as_str(),
                    LanguageMeta {
                        name: &entry.name,
                        region: &entry.region,
                        bidirectional: entry.is_bidirectional(),
                    },
                )
            })
            .collect()
    });

    let meta = PackMeta {
        pack: PackSection {
            description: config.description.as_deref(),
            pack_format: config.packformat,
        },
        language,
    };

    Ok(serde_json::to_vec(&meta)?)
}

/// Writes `pack.mcmeta`.
pub struct MetadataStage;

impl Stage for MetadataStage {
    fn name(&self) -> &str {
        "metadata"
    }

    fn description(&self) -> &str {
        "Generates pack.mcmeta"
    }

    fn run(&self, ctx: &mut StageContext<'_>) -> BuildResult<()> {
        let content = pack_metadata(ctx.config)?;
        ctx.sink.write("pack.mcmeta", &content)
    }
}

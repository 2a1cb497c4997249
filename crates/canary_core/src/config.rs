//! Build file model.
//!
//! The build file (`icecanary.yml`) is parsed once into a [`BuildConfig`] and
//! shared read-only by every stage. Optional language fields stay optional
//! here; [`LanguageEntry::resolve`] derives a fully populated
//! [`ResolvedLanguage`] instead of patching defaults into the config.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{BuildError, BuildResult};

/// Default namespace for language files.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Default upstream locale used by merge-mode languages.
pub const DEFAULT_MERGE_LOCALE: &str = "zh_CN";

/// Default build file name.
pub const DEFAULT_BUILD_FILE: &str = "./icecanary.yml";

/// Parsed build file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Pack name, used in the archive file name
    #[serde(deserialize_with = "scalar_string")]
    pub name: String,
    /// Pack version
    #[serde(deserialize_with = "scalar_string")]
    pub version: String,
    /// Pack description written to pack.mcmeta
    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub description: Option<String>,
    /// Target Minecraft version
    #[serde(deserialize_with = "scalar_string")]
    pub mcver: String,
    /// Resource pack format number
    pub packformat: u32,
    /// Pack icon, copied to pack.png
    #[serde(default)]
    pub icon: Option<PathBuf>,
    /// Languages keyed by language code (e.g. `zh_cn`)
    #[serde(default)]
    pub languages: Option<BTreeMap<String, LanguageEntry>>,
    /// Raw asset directories keyed by their name under `assets/`
    #[serde(default)]
    pub raw: Option<BTreeMap<String, PathBuf>>,
    /// Directory copied as-is to the output root
    #[serde(default)]
    pub archive_raw: Option<PathBuf>,
    /// Extra text appended to the archive comment
    #[serde(default)]
    pub packaging_comment: Option<String>,
}

impl BuildConfig {
    /// Load a build file.
    pub fn load(path: impl AsRef<Path>) -> BuildResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(BuildError::BuildFileNotFound(path.to_path_buf()));
        }

        debug!("Loading build file from {:?}", path);
        let content = fs::read_to_string(path).map_err(|source| BuildError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        serde_yaml::from_str(&content).map_err(|source| BuildError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a build file from a string.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Configured languages, if any.
    pub fn language_entries(&self) -> impl Iterator<Item = (&String, &LanguageEntry)> {
        self.languages.iter().flatten()
    }

    /// Whether at least one language is declared.
    pub fn has_languages(&self) -> bool {
        self.languages.as_ref().is_some_and(|l| !l.is_empty())
    }

    /// Whether pack paths must be lowercase (pack format 3 and later).
    pub fn lowercase_paths(&self) -> bool {
        self.packformat >= 3
    }

    /// File name of the packed archive.
    pub fn archive_file_name(&self) -> String {
        format!("{}-{}-{}.zip", self.name, self.mcver, self.version)
    }
}

/// A language declared in the build file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageEntry {
    /// Display name
    pub name: String,
    /// Display region
    pub region: String,
    /// Right-to-left language (defaults to false)
    #[serde(default)]
    pub bidirectional: Option<bool>,
    /// Namespace the language file is written to (defaults to `minecraft`)
    #[serde(default)]
    pub ns: Option<String>,
    /// Translation data source
    pub data: LanguageData,
}

/// Translation data source of a language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageData {
    /// Translation file
    pub file: PathBuf,
    /// `json` or `yaml` (defaults to `json`)
    #[serde(default)]
    pub format: Option<String>,
    /// Nested data that must be flattened (defaults to false)
    #[serde(default)]
    pub objective: Option<bool>,
    /// `merge` to fill missing keys from the upstream language
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Upstream locale to merge against (defaults to `zh_CN`)
    #[serde(default)]
    pub lang: Option<String>,
}

/// Translation file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Yaml,
}

impl FromStr for DataFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// A language with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLanguage {
    pub code: String,
    pub name: String,
    pub region: String,
    pub bidirectional: bool,
    pub namespace: String,
    pub file: PathBuf,
    pub format: DataFormat,
    pub objective: bool,
    /// Upstream locale when the language merges against base-game texts
    pub merge_locale: Option<String>,
}

impl ResolvedLanguage {
    /// Output path of the language file inside the pack.
    pub fn output_path(&self) -> String {
        format!("assets/{}/lang/{}.json", self.namespace, self.code)
    }
}

impl LanguageEntry {
    /// Bidirectional flag with its default applied.
    pub fn is_bidirectional(&self) -> bool {
        self.bidirectional.unwrap_or(false)
    }

    /// Derive the fully defaulted language for `code`.
    pub fn resolve(&self, code: &str) -> BuildResult<ResolvedLanguage> {
        let format = match &self.data.format {
            None => DataFormat::Json,
            Some(raw) => raw
                .parse()
                .map_err(|format| BuildError::UnsupportedFormat {
                    language: self.name.clone(),
                    format,
                })?,
        };

        let merge_locale = (self.data.kind.as_deref() == Some("merge")).then(|| {
            self.data
                .lang
                .clone()
                .unwrap_or_else(|| DEFAULT_MERGE_LOCALE.to_string())
        });

        Ok(ResolvedLanguage {
            code: code.to_string(),
            name: self.name.clone(),
            region: self.region.clone(),
            bidirectional: self.is_bidirectional(),
            namespace: self
                .ns
                .clone()
                .filter(|ns| !ns.is_empty())
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            file: self.data.file.clone(),
            format,
            objective: self.data.objective.unwrap_or(false),
            merge_locale,
        })
    }
}

/// YAML scalars such as `version: 1.0` arrive as numbers; keep them as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(s) => s,
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Scalar::deserialize(deserializer).map(String::from)
}

fn optional_scalar_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<Scalar>::deserialize(deserializer).map(|s| s.map(String::from))
}

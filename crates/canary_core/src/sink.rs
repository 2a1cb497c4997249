//! Output sinks for generated pack files.
//!
//! Every stage writes `(path, bytes)` pairs through an [`OutputSink`]. The
//! sink decides where they end up: straight into a directory tree
//! ([`DirectorySink`]) or into a ZIP archive assembled in memory and written
//! once on [`OutputSink::finalize`] ([`ArchiveSink`]).
//!
//! Both variants apply the same path rules: lowercasing for pack format 3
//! and later, then [`trim_path`] normalization.

use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::BuildConfig;
use crate::error::BuildResult;

/// Destination for generated pack files.
pub trait OutputSink: Send {
    /// Write `content` as the full contents of `name`.
    fn write(&mut self, name: &str, content: &[u8]) -> BuildResult<()>;

    /// Complete the output. Returns the archive path for archive sinks.
    fn finalize(self: Box<Self>) -> BuildResult<Option<PathBuf>>;

    /// Number of distinct entries written so far.
    fn files_written(&self) -> usize;
}

/// Apply the pack-format casing rule to an entry name.
pub fn entry_name(name: &str, lowercase: bool) -> String {
    if lowercase {
        name.to_lowercase()
    } else {
        name.to_string()
    }
}

/// Normalize a path into a safe relative entry name.
///
/// Backslashes become `/`; leading separators, drive markers, empty, `.`
/// and `..` segments are removed.
pub fn trim_path(name: &str) -> String {
    let normalized = name.replace('\\', "/");
    let bytes = normalized.as_bytes();
    let rest = if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        &normalized[2..]
    } else {
        &normalized[..]
    };

    rest.split('/')
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .collect::<Vec<_>>()
        .join("/")
}

/// Comment embedded in pack archives.
pub fn archive_comment(config: &BuildConfig) -> String {
    let mut comment = format!(
        "Generated by IceCanary\nPack Name: {}\nPack Version: {}\nPack Description: {}\nTarget Minecraft Version: {}\n",
        config.name,
        config.version,
        config.description.as_deref().unwrap_or_default(),
        config.mcver
    );
    if let Some(extra) = &config.packaging_comment {
        comment.push('\n');
        comment.push_str(extra);
    }
    comment
}

/// Pick the sink for a build.
pub fn create_sink(config: &BuildConfig, output_dir: &Path, archive: bool) -> Box<dyn OutputSink> {
    if archive {
        Box::new(ArchiveSink::new(
            output_dir.join(config.archive_file_name()),
            archive_comment(config),
            config.lowercase_paths(),
        ))
    } else {
        Box::new(DirectorySink::new(output_dir, config.lowercase_paths()))
    }
}

/// Writes files directly below a root directory.
pub struct DirectorySink {
    root: PathBuf,
    lowercase: bool,
    written: HashSet<String>,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>, lowercase: bool) -> Self {
        Self {
            root: root.into(),
            lowercase,
            written: HashSet::new(),
        }
    }
}

impl OutputSink for DirectorySink {
    fn write(&mut self, name: &str, content: &[u8]) -> BuildResult<()> {
        let relative = trim_path(&entry_name(name, self.lowercase));
        let target = self.root.join(&relative);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, content)?;

        debug!("Wrote: {}", relative);
        self.written.insert(relative);
        Ok(())
    }

    fn finalize(self: Box<Self>) -> BuildResult<Option<PathBuf>> {
        Ok(None)
    }

    fn files_written(&self) -> usize {
        self.written.len()
    }
}

/// Buffers entries in memory and writes one ZIP archive on finalize.
///
/// Rewriting an entry replaces its content but keeps its original position.
pub struct ArchiveSink {
    path: PathBuf,
    comment: String,
    lowercase: bool,
    entries: Vec<(String, Vec<u8>)>,
    positions: HashMap<String, usize>,
}

impl ArchiveSink {
    pub fn new(path: impl Into<PathBuf>, comment: impl Into<String>, lowercase: bool) -> Self {
        Self {
            path: path.into(),
            comment: comment.into(),
            lowercase,
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Buffered entry names, in archive order.
    pub fn entry_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl OutputSink for ArchiveSink {
    fn write(&mut self, name: &str, content: &[u8]) -> BuildResult<()> {
        let entry = trim_path(&entry_name(name, self.lowercase));

        match self.positions.get(&entry) {
            Some(&index) => self.entries[index].1 = content.to_vec(),
            None => {
                self.positions.insert(entry.clone(), self.entries.len());
                self.entries.push((entry.clone(), content.to_vec()));
            }
        }

        debug!("Added: {}", entry);
        Ok(())
    }

    fn finalize(self: Box<Self>) -> BuildResult<Option<PathBuf>> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut writer = ZipWriter::new(File::create(&self.path)?);
        writer.set_comment(self.comment.clone());

        for (name, content) in &self.entries {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(content)?;
        }
        writer.finish()?;

        info!("Zip file outputed to {}", self.path.display());
        Ok(Some(self.path))
    }

    fn files_written(&self) -> usize {
        self.entries.len()
    }
}

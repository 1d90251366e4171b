use super::simple::{flatten_csv, flatten_yaml};
use super::structured::flatten_json;
use super::{PresetEntry, PresetError, PresetKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Version-control metadata directories never searched for presets.
const EXCLUDED_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// What to do when a single preset file cannot be read or parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Fail the whole load.
    #[default]
    Abort,
    /// Drop the file, log a warning and keep going.
    Skip,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub on_error: ErrorPolicy,
}

impl LoadOptions {
    pub fn with_policy(on_error: ErrorPolicy) -> Self {
        Self { on_error }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PresetFormat {
    Csv,
    Yaml,
    Json,
}

impl PresetFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "yml" | "yaml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// A preset file dropped under [`ErrorPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Immutable result of one load pass.
#[derive(Debug, Clone, Default)]
pub struct PresetSnapshot {
    entries: IndexMap<String, PresetEntry>,
    sources: Vec<PathBuf>,
    skipped: Vec<SkippedFile>,
}

impl PresetSnapshot {
    pub fn get(&self, key: &str) -> Option<&PresetEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in load order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Keys of one preset kind, in load order.
    pub fn keys_of(&self, kind: PresetKind) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(_, entry)| entry.kind() == kind)
            .map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PresetEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn entries(&self) -> &IndexMap<String, PresetEntry> {
        &self.entries
    }

    /// Files that contributed entries, in processing order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }
}

/// Load and flatten every preset file under `root`.
///
/// Files are processed in lexicographic order of their path relative to
/// `root`; a key defined by several files keeps the value of the last one.
pub fn load(root: &Path, options: &LoadOptions) -> Result<PresetSnapshot, PresetError> {
    let metadata = match fs::metadata(root) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(PresetError::DirectoryNotFound(root.to_path_buf()));
        }
        Err(source) => {
            return Err(PresetError::Io {
                path: root.to_path_buf(),
                source,
            });
        }
    };
    if !metadata.is_dir() {
        return Err(PresetError::NotADirectory(root.to_path_buf()));
    }

    let files = discover_preset_files(root);
    debug!(root = %root.display(), files = files.len(), "discovered preset files");

    let mut snapshot = PresetSnapshot::default();
    for (path, format) in files {
        match load_file(&path, format) {
            Ok(entries) => {
                debug!(path = %path.display(), entries = entries.len(), "loaded preset file");
                for (key, entry) in entries {
                    let kind = entry.kind();
                    if let Some(previous) = snapshot.entries.insert(key.clone(), entry) {
                        debug!(
                            %key,
                            previous_kind = %previous.kind(),
                            %kind,
                            "preset key overwritten"
                        );
                    }
                }
                snapshot.sources.push(path);
            }
            Err(err) if options.on_error == ErrorPolicy::Skip && err.is_file_local() => {
                warn!(path = %path.display(), error = %err, "skipping malformed preset file");
                snapshot.skipped.push(SkippedFile {
                    path,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        root = %root.display(),
        presets = snapshot.len(),
        files = snapshot.sources.len(),
        skipped = snapshot.skipped.len(),
        "preset load complete"
    );
    Ok(snapshot)
}

fn discover_preset_files(root: &Path) -> Vec<(PathBuf, PresetFormat)> {
    let mut files: Vec<(PathBuf, PresetFormat)> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !EXCLUDED_DIRS
                    .iter()
                    .any(|name| entry.file_name() == std::ffi::OsStr::new(name))
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "failed to read preset directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let path = entry.into_path();
            PresetFormat::from_path(&path).map(|format| (path, format))
        })
        .collect();

    files.sort_by(|(a, _), (b, _)| {
        let a = a.strip_prefix(root).unwrap_or(a);
        let b = b.strip_prefix(root).unwrap_or(b);
        a.cmp(b)
    });
    files
}

fn load_file(path: &Path, format: PresetFormat) -> Result<Vec<(String, PresetEntry)>, PresetError> {
    let bytes = fs::read(path).map_err(|source| PresetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8(bytes)
        .map_err(|e| PresetError::parse(path, format!("not valid UTF-8: {}", e.utf8_error())))?;
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    match format {
        PresetFormat::Csv => flatten_csv(&stem, &content, path),
        PresetFormat::Yaml => flatten_yaml(&stem, &content, path),
        PresetFormat::Json => flatten_json(&stem, &content, path),
    }
}

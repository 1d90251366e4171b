//! Directory image listing
//!
//! File-level half of the directory image nodes: which files a batch loads,
//! in which order, under which display names, and where saved images go.
//! Decoding and tensor conversion belong to the host.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions recognized as images, lowercase and without the dot.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

static FIRST_NUMBER: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\d+").ok());

#[derive(Debug, thiserror::Error)]
pub enum ImageDirError {
    #[error("input directory '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("input path '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("no image files found in directory '{}'", .0.display())]
    Empty(PathBuf),

    #[error("failed to read '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown sort method '{0}'")]
    UnknownSort(String),
}

/// Ordering applied to the discovered files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMethod {
    /// Directory traversal order.
    #[default]
    None,
    TextAsc,
    TextDesc,
    /// By the first run of digits in the file stem.
    NumberAsc,
    NumberDesc,
    ModifiedAsc,
    ModifiedDesc,
}

impl SortMethod {
    pub const ALL: [SortMethod; 7] = [
        SortMethod::None,
        SortMethod::TextAsc,
        SortMethod::TextDesc,
        SortMethod::NumberAsc,
        SortMethod::NumberDesc,
        SortMethod::ModifiedAsc,
        SortMethod::ModifiedDesc,
    ];

    /// Label shown by the host node.
    pub fn label(self) -> &'static str {
        match self {
            SortMethod::None => "None",
            SortMethod::TextAsc => "As Text (Asc)",
            SortMethod::TextDesc => "As Text (Desc)",
            SortMethod::NumberAsc => "As Number (Asc)",
            SortMethod::NumberDesc => "As Number (Desc)",
            SortMethod::ModifiedAsc => "Time Modified (ASC)",
            SortMethod::ModifiedDesc => "Time Modified (DESC)",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            SortMethod::None => "none",
            SortMethod::TextAsc => "text-asc",
            SortMethod::TextDesc => "text-desc",
            SortMethod::NumberAsc => "number-asc",
            SortMethod::NumberDesc => "number-desc",
            SortMethod::ModifiedAsc => "modified-asc",
            SortMethod::ModifiedDesc => "modified-desc",
        }
    }
}

impl fmt::Display for SortMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for SortMethod {
    type Err = ImageDirError;

    /// Accepts both host labels and kebab-case names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SortMethod::ALL
            .into_iter()
            .find(|method| {
                method.label().eq_ignore_ascii_case(wanted) || method.slug().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ImageDirError::UnknownSort(s.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Number of files dropped from the front after sorting.
    pub skips: usize,
    pub sort: SortMethod,
    /// Report file stems instead of full file names.
    pub trim_suffix: bool,
    pub extensions: Vec<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            skips: 0,
            sort: SortMethod::None,
            trim_suffix: false,
            extensions: DEFAULT_IMAGE_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}

/// One image file selected for a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageFile {
    pub index: usize,
    pub path: PathBuf,
    pub filename: String,
}

/// List image files under `directory` for a batch or list load.
pub fn list_images(directory: &Path, options: &ListOptions) -> Result<Vec<ImageFile>, ImageDirError> {
    match fs::metadata(directory) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => return Err(ImageDirError::NotADirectory(directory.to_path_buf())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ImageDirError::NotFound(directory.to_path_buf()));
        }
        Err(source) => {
            return Err(ImageDirError::Io {
                path: directory.to_path_buf(),
                source,
            });
        }
    }

    let mut files: Vec<PathBuf> = WalkDir::new(directory)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "failed to read image directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_extension(path, &options.extensions))
        .collect();

    sort_files(&mut files, options.sort)?;
    let files: Vec<PathBuf> = files.into_iter().skip(options.skips).collect();
    if files.is_empty() {
        return Err(ImageDirError::Empty(directory.to_path_buf()));
    }
    debug!(directory = %directory.display(), count = files.len(), sort = %options.sort, "listed images");

    Ok(files
        .into_iter()
        .enumerate()
        .map(|(index, path)| {
            let name = if options.trim_suffix {
                path.file_stem()
            } else {
                path.file_name()
            };
            let filename = name
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            ImageFile {
                index,
                path,
                filename,
            }
        })
        .collect())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}

/// First run of digits in the stem; stems without digits sort last.
fn stem_number(path: &Path) -> u64 {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| FIRST_NUMBER.as_ref()?.find(stem))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(u64::MAX)
}

fn modified(path: &Path) -> Result<SystemTime, ImageDirError> {
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .map_err(|source| ImageDirError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Sort in place. Sorts are stable, so ties keep traversal order.
pub fn sort_files(files: &mut Vec<PathBuf>, method: SortMethod) -> Result<(), ImageDirError> {
    match method {
        SortMethod::None => {}
        SortMethod::TextAsc => files.sort(),
        SortMethod::TextDesc => files.sort_by(|a, b| b.cmp(a)),
        SortMethod::NumberAsc => files.sort_by_key(|path| stem_number(path)),
        SortMethod::NumberDesc => files.sort_by(|a, b| stem_number(b).cmp(&stem_number(a))),
        SortMethod::ModifiedAsc | SortMethod::ModifiedDesc => {
            let mut stamped = files
                .drain(..)
                .map(|path| modified(&path).map(|time| (time, path)))
                .collect::<Result<Vec<_>, _>>()?;
            stamped.sort_by(|(a, _), (b, _)| match method {
                SortMethod::ModifiedDesc => b.cmp(a),
                _ => a.cmp(b),
            });
            files.extend(stamped.into_iter().map(|(_, path)| path));
        }
    }
    Ok(())
}

/// Target path for a saved image: `<directory>/<sub_directory>/<name>.png`.
///
/// An empty (after trimming) `filename` falls back to the image index.
pub fn output_path(directory: &Path, sub_directory: &str, filename: &str, index: usize) -> PathBuf {
    let mut dir = directory.to_path_buf();
    if !sub_directory.is_empty() {
        dir = dir.join(sub_directory);
    }
    let name = match filename.trim() {
        "" => index.to_string(),
        name => name.to_string(),
    };
    dir.join(format!("{name}.png"))
}

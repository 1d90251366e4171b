use super::PresetKind;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("preset directory '{}' does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("preset path '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to parse preset file '{}': {}", .path.display(), .message)]
    Parse { path: PathBuf, message: String },

    #[error("failed to read '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("preset '{0}' not found")]
    MissingKey(String),

    #[error("preset '{key}' is a {actual} preset, expected {expected}")]
    WrongKind {
        key: String,
        expected: PresetKind,
        actual: PresetKind,
    },
}

impl PresetError {
    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the error concerns a single file rather than the whole load.
    pub fn is_file_local(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Io { .. })
    }
}

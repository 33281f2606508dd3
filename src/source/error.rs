use std::fmt;
use std::path::PathBuf;

/// Error that can occur when loading a source unit
#[derive(Debug, Clone)]
pub enum SourceError {
    /// The file could not be opened or read
    Io { path: PathBuf, message: String },
    /// The load was cancelled before the whole file was read
    Cancelled(PathBuf),
    /// The configured language id is not a known variant
    UnknownLanguage(String),
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        SourceError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io { path, message } => {
                write!(f, "IO error reading {}: {}", path.display(), message)
            }
            SourceError::Cancelled(path) => write!(f, "Loading {} was cancelled", path.display()),
            SourceError::UnknownLanguage(id) => write!(f, "Unknown language id: {}", id),
        }
    }
}

impl std::error::Error for SourceError {}

use crate::types::RawPageEntry;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Content root is missing, unreadable, or not a directory.
    #[error("Content root not found or not a readable directory: {}", path.display())]
    NotFound { path: PathBuf },

    /// A directory was reached again through one of its own descendants.
    #[error(
        "Directory cycle detected at {} (loops back to {})",
        path.display(),
        ancestor.display()
    )]
    CycleDetected { path: PathBuf, ancestor: PathBuf },

    /// Any other filesystem failure while walking the content tree.
    #[error("Failed to scan {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scan cancelled")]
    Cancelled,

    /// Two distinct page files resolve to the same public URL path.
    #[error("Pages '{first}' and '{second}' both resolve to URL path '{pathname}'")]
    Collision {
        pathname: String,
        first: RawPageEntry,
        second: RawPageEntry,
    },
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

impl Error {
    /// Wrap an I/O failure with the path it happened on.
    pub fn scan(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Scan {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

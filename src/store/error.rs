use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot read post file {path}: {source}")]
    Unreadable { path: PathBuf, source: io::Error },
    #[error("post file {path} is not a valid post list: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cannot encode posts for {path}: {source}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cannot write post file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("no post id left above the largest id in {path}")]
    IdsExhausted { path: PathBuf },
}

impl StoreError {
    /// True for failures that happen while reading an existing document
    pub const fn is_read_failure(&self) -> bool {
        matches!(self, Self::Unreadable { .. } | Self::Corrupt { .. })
    }
}

//! Error taxonomy shared by the grasp record and the stash.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can arise from grasp record and stash operations.
#[derive(Error, Debug)]
pub enum StashError {
    /// A grasp was offered to the stash without an id.
    #[error("Grasp has no id")]
    InvalidKey,
    #[error("Grasp not found: {0}")]
    NotFound(String),
    #[error("Grasp index {index} out of range for stash of {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// A parsed document node does not have the shape of a grasp record.
    #[error("Grasp schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not well-formed YAML.
    #[error("Failed to parse YAML in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Grasp serialization error: {0}")]
    Serialization(String),
    #[error("Stash configuration error: {0}")]
    Config(String),
}

impl StashError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

//! JSON file storage for the record stores.
//!
//! # Responsibility
//! - Read backing files at startup and write full snapshots on change.
//! - Report I/O and decoding failures with the offending path.
//!
//! # Invariants
//! - Writes never leave a partially written target file: data goes to a
//!   sibling temporary file that is synced and renamed over the target.
//! - A missing backing file reads as an empty snapshot.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod json_file;

pub use json_file::{read_json_or_default, write_json_atomic};

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// File decoded but its contents break a store invariant.
    InvalidData { path: PathBuf, message: String },
}

impl StorageError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } | Self::Json { path, .. } | Self::InvalidData { path, .. } => {
                path
            }
        }
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "invalid json in `{}`: {source}", path.display())
            }
            Self::InvalidData { path, message } => {
                write!(f, "invalid data in `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidData { .. } => None,
        }
    }
}

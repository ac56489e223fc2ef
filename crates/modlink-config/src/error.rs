//! Errors reading/writing the durable configuration store.

use std::path::PathBuf;
use thiserror::Error;

/// Failures reading or writing a configuration store file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Underlying I/O.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file header's magic or type tag didn't match.
    #[error("not a configuration store file: {0}")]
    BadMagic(String),

    /// The on-disk major version is newer than this reader supports.
    #[error("configuration store major version {found} is newer than the supported {supported}")]
    UnsupportedVersion { found: u16, supported: u16 },

    /// The file ended before a length-prefixed field was fully read.
    #[error("truncated configuration store: expected {0} more bytes")]
    Truncated(&'static str),

    /// A string field was not valid UTF-8 (the store uses UTF-8 for all
    /// text fields; MUTF-8 is only required for module-file subsection
    /// paths, per `spec.md` §4.5).
    #[error("invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    /// The written file's content hash did not match on read-back
    /// verification.
    #[error("configuration store integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    /// The writer's exclusive lock on the store could not be acquired.
    #[error("could not lock configuration store at {0}")]
    LockUnavailable(PathBuf),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

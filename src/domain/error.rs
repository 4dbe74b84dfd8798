// ============================================================
// Layer 3 — Typed Errors
// ============================================================
// Every failure the data pipeline can report to its caller.
// The application and CLI layers wrap these in anyhow with
// extra context; tests match on the variants directly.

use std::path::PathBuf;
use thiserror::Error;

pub type DataResult<T> = Result<T, DataError>;

#[derive(Debug, Error)]
pub enum DataError {
    /// The two dataset sides do not contain the same character classes.
    #[error(
        "character sets of '{}' and '{}' differ: {} only in the first, {} only in the second",
        .first.display(), .second.display(), .only_first.len(), .only_second.len()
    )]
    CharacterSetMismatch {
        first:       PathBuf,
        second:      PathBuf,
        only_first:  Vec<String>,
        only_second: Vec<String>,
    },

    /// A file name does not follow the `<prefix><number>_<rest>` pattern.
    #[error("cannot parse a numeric label from file name '{name}'")]
    InvalidFilenameFormat { name: String },

    #[error("cache file '{}' is corrupt ({source}); delete it or rerun with --rebuild", .path.display())]
    CacheCorrupt {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("cannot serialize cache file '{}': {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("cannot derive a '{namespace}' cache key: {source}")]
    CacheKey {
        namespace: String,
        #[source]
        source: serde_json::Error,
    },

    /// A split ratio outside [0, 1].
    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidSplitRatio { name: &'static str, value: f64 },

    #[error("{what} length mismatch: {first} vs {second}")]
    LengthMismatch {
        what:   &'static str,
        first:  usize,
        second: usize,
    },

    #[error("batch size must be greater than zero")]
    InvalidBatchSize,

    #[error("tensor shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found:    Vec<usize>,
    },

    #[error("io error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image decode error at '{}': {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot start image decode workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl DataError {
    /// Shorthand for wrapping an `io::Error` with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io { path: path.into(), source }
    }
}

//! Error types for the core layers.

use std::path::PathBuf;

/// A record source could not answer a lookup.
///
/// The bundled [`QueryIndex`](crate::index::QueryIndex) never produces this;
/// it exists for sources backed by a remote or slow service.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("record source unavailable: {0}")]
    Unavailable(String),
    #[error("lookup for {query:?} failed: {reason}")]
    Failed { query: String, reason: String },
}

/// The dataset file could not be read.
///
/// Malformed content is not an error: it loads as an empty index.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

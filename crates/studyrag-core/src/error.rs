use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("collection '{0}' already exists")]
    DuplicateCollection(String),

    #[error("collection '{0}' not found")]
    CollectionNotFound(String),

    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("cannot normalize a zero vector")]
    ZeroVector,

    #[error("invalid chunk config: overlap {overlap} must be smaller than size {size}")]
    InvalidChunkConfig { size: usize, overlap: usize },

    #[error("invalid collection name '{0}'")]
    InvalidCollectionName(String),

    #[error("corrupt collection blob: {0}")]
    Serialization(String),

    #[error("storage I/O failed at {}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("embedding failed: {0}")]
    Embedding(String),
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The persisted index could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The persisted index exists but is not valid index JSON.
    #[error("Corrupt index: {0}")]
    CorruptIndex(String),

    /// Index dimensionality or a stored vector length disagrees with the embedder.
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// The persisted index was written in a format this build does not read.
    #[error("Unsupported index version: expected {expected}, found {found}")]
    UnsupportedVersion { expected: u32, found: u32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Index lock poisoned")]
    Poisoned,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

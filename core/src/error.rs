use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The document collection does not follow the record/field marker layout.
    #[error("{}:{line}: {reason}", origin.display())]
    SourceFormat { origin: PathBuf, line: usize, reason: String },

    /// A persisted index snapshot exists but does not decode into a valid index.
    #[error("corrupt index snapshot {}: {reason}", path.display())]
    DataCorruption { path: PathBuf, reason: String },

    #[error("i/o error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::DataCorruption { path: path.into(), reason: reason.into() }
    }
}

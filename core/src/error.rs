use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("the thesaurus, the stopword list or both are empty; load them before building an index")]
    ThesauriNotLoaded,
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not extract text from {path}: {reason}")]
    Extraction { path: PathBuf, reason: String },
    #[error("corrupt index file {path}: {reason}")]
    CorruptIndex { path: PathBuf, reason: String },
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::CorruptIndex { path: path.into(), reason: reason.to_string() }
    }
}

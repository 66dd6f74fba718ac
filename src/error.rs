use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading a dataset into memory.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset contains no records")]
    Empty,
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// A mean was requested over a table with zero records.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cannot compute a mean over zero records")]
pub struct EmptyDatasetError;

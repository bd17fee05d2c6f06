use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the library API.
///
/// Filtering never fails: missing or malformed values simply exclude a
/// record. Only loading, fetching and writing can go wrong.
#[derive(Debug, Error)]
pub enum Error {
    /// The dataset could not be opened or parsed. Fatal, raised before any
    /// filtering happens.
    #[error("failed to load dataset {}: {reason}", path.display())]
    DataLoad { path: PathBuf, reason: String },

    /// An option value outside its accepted domain.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// Downloading a fresh catalog from the archive failed.
    #[error("archive query failed: {0}")]
    Fetch(String),

    /// The drawing backend reported an error.
    #[error("render failed: {0}")]
    Render(String),

    #[error("unsupported output format: {0} (expected .svg or .json)")]
    UnsupportedOutput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn data_load(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        Error::DataLoad {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }
}

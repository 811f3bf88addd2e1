use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Knowledge base unavailable ({path}): {reason}")]
    Unavailable { path: PathBuf, reason: String },

    #[error("Segmentation failed: {0}")]
    Segmentation(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}

impl Error {
    pub fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Unavailable { path: path.into(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

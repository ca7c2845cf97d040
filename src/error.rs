//! Resolver error taxonomy
//!
//! Only two things can go wrong while resolving plaques: the identifier is not
//! there, or the backing JSON cannot be used. Callers decide how visible each is.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaqueError {
    #[error("plaque '{0}' not found")]
    NotFound(String),

    #[error("dataset '{}' is unavailable: {detail}", .path.display())]
    DataUnavailable { path: PathBuf, detail: String },
}

impl PlaqueError {
    pub fn unavailable(path: &Path, detail: impl Into<String>) -> Self {
        PlaqueError::DataUnavailable {
            path: path.to_path_buf(),
            detail: detail.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PlaqueError::NotFound(_))
    }
}

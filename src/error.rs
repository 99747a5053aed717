//! Domain error taxonomy.
//!
//! Startup failures ([`SearchError::DataLoad`], [`SearchError::ModelLoad`]) are
//! fatal: the server never binds without verses and a model. Empty queries are
//! not errors and never reach this type.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The verse dataset is missing, malformed, or violates a record invariant.
    #[error("failed to load verses from {path}: {reason}")]
    DataLoad { path: PathBuf, reason: String },

    /// The embedding model or tokenizer could not be loaded.
    #[error("failed to load embedding model: {0}")]
    ModelLoad(String),

    /// Inference failed for a specific input.
    #[error("embedding failed: {0}")]
    Encode(String),

    /// A dataset maintenance download failed; nothing was written.
    #[error("dataset fetch failed: {0}")]
    DatasetFetch(String),
}

impl SearchError {
    pub(crate) fn data_load(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::DataLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

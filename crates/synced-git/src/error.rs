//! Error types for synced-git

use std::path::PathBuf;

/// Result type for synced-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in synced-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Not a git repository: {path}")]
    NotARepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Branch '{name}' not found")]
    BranchNotFound { name: String },
}

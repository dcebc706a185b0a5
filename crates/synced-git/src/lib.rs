//! Git inspection for opencode-synced
//!
//! Read-only views of the sync repository: working-tree diff summaries used
//! to draft commit messages, and ahead/behind counts against the remote used
//! to refuse unsafe syncs.

pub mod diff;
pub mod divergence;
pub mod error;

pub use diff::{diff_summary, name_status, stat_summary};
pub use divergence::{Divergence, divergence};
pub use error::{Error, Result};

use std::path::Path;

use git2::Repository;

/// Open the repository whose working tree is `path`.
pub fn open(path: &Path) -> Result<Repository> {
    Repository::open(path).map_err(|source| Error::NotARepository {
        path: path.to_path_buf(),
        source,
    })
}

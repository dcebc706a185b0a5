//! Guards on the state of the local sync repository

use std::path::Path;

use synced_git::Divergence;
use tracing::debug;

use crate::{Error, Result};

/// Refuse to sync when the checkout and `origin/<branch>` have both moved.
///
/// Being only ahead or only behind is fine; a branch with no upstream yet
/// is treated as in sync.
pub fn ensure_not_diverged(repo_dir: &Path, branch: &str) -> Result<Divergence> {
    let state = synced_git::divergence(repo_dir, branch)?;
    debug!(
        ahead = state.ahead,
        behind = state.behind,
        has_upstream = state.has_upstream,
        "Checked repository divergence"
    );

    if state.is_diverged() {
        return Err(Error::RepoDiverged {
            message: format!(
                "local branch '{branch}' is {} commit(s) ahead and {} behind origin/{branch}; \
                 resolve it in {} before syncing",
                state.ahead,
                state.behind,
                repo_dir.display()
            ),
        });
    }
    Ok(state)
}

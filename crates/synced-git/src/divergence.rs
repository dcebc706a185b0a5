//! Ahead/behind comparison against `origin`

use std::path::Path;

use tracing::debug;

use crate::{Error, Result};

/// How a local branch relates to its `origin` counterpart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Divergence {
    /// Commits on the local branch missing from the remote
    pub ahead: usize,
    /// Commits on the remote branch missing locally
    pub behind: usize,
    /// Whether `refs/remotes/origin/<branch>` exists at all
    pub has_upstream: bool,
}

impl Divergence {
    /// Both sides have commits the other lacks.
    pub fn is_diverged(&self) -> bool {
        self.ahead > 0 && self.behind > 0
    }
}

/// Compare `refs/heads/<branch>` with `refs/remotes/origin/<branch>`.
///
/// A branch without an upstream reports zero counts and `has_upstream: false`.
pub fn divergence(repo_dir: &Path, branch: &str) -> Result<Divergence> {
    let repo = crate::open(repo_dir)?;

    let local = repo
        .find_reference(&format!("refs/heads/{branch}"))
        .map_err(|_| Error::BranchNotFound {
            name: branch.to_string(),
        })?;
    let local_oid = local.peel_to_commit()?.id();

    let remote = match repo.find_reference(&format!("refs/remotes/origin/{branch}")) {
        Ok(reference) => reference,
        Err(_) => {
            debug!(branch, "No upstream reference");
            return Ok(Divergence::default());
        }
    };
    let remote_oid = remote.peel_to_commit()?.id();

    let (ahead, behind) = repo.graph_ahead_behind(local_oid, remote_oid)?;
    Ok(Divergence {
        ahead,
        behind,
        has_upstream: true,
    })
}

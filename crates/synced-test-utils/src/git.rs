//! Git repository fixtures built with `git2`.
//!
//! No `git` binary is required; every fixture uses libgit2 directly.

use std::fs;
use std::path::Path;

use git2::{IndexAddOption, Oid, Repository, Signature};

/// Initialises an empty git repository (no commits).
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> Repository {
    Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Initialises a repository with `README.md` committed on `main`.
///
/// # Panics
/// Panics if any git operation fails.
pub fn repo_with_commit(path: &Path) -> Repository {
    let repo = real_git_repo(path);
    fs::write(path.join("README.md"), "# Sync repo\n")
        .unwrap_or_else(|e| panic!("repo_with_commit: failed to write README.md: {e}"));
    commit_all(&repo, "Initial commit");
    repo
}

/// Stage every file in the working tree and commit it on the current branch.
///
/// The first commit is written to `refs/heads/main` and HEAD is pointed at it.
///
/// # Panics
/// Panics if staging or committing fails.
pub fn commit_all(repo: &Repository, message: &str) -> Oid {
    let mut index = repo.index().expect("commit_all: failed to open index");
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .expect("commit_all: failed to stage files");
    index.write().expect("commit_all: failed to write index");
    let tree_id = index.write_tree().expect("commit_all: failed to write tree");
    let tree = repo.find_tree(tree_id).expect("commit_all: missing tree");
    let signature = Signature::now("Test User", "test@test.com").expect("signature");

    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    let update_ref = if parent.is_some() {
        "HEAD"
    } else {
        "refs/heads/main"
    };

    let oid = repo
        .commit(
            Some(update_ref),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )
        .unwrap_or_else(|e| panic!("commit_all: failed to commit: {e}"));

    if parent.is_none() {
        repo.set_head("refs/heads/main")
            .unwrap_or_else(|e| panic!("commit_all: failed to set HEAD: {e}"));
    }
    oid
}

/// Create a commit on top of `parent` without moving any branch.
///
/// Useful for fabricating a remote-tracking ref that has moved on.
///
/// # Panics
/// Panics if the parent is missing or committing fails.
pub fn detached_commit(repo: &Repository, parent: Oid, message: &str) -> Oid {
    let parent = repo
        .find_commit(parent)
        .unwrap_or_else(|e| panic!("detached_commit: missing parent: {e}"));
    let tree = parent.tree().expect("detached_commit: missing tree");
    let signature = Signature::now("Remote", "remote@test.com").expect("signature");
    repo.commit(None, &signature, &signature, message, &tree, &[&parent])
        .unwrap_or_else(|e| panic!("detached_commit: failed to commit: {e}"))
}

//! [`TestHome`] sandbox for sync scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding a fake home directory (`home/`) and a sync
/// repository (`repo/`).
///
/// Paths are canonicalized so tests compare equal on platforms where the
/// temp directory sits behind a symlink.
///
/// # Example
///
/// ```rust,no_run
/// use synced_test_utils::TestHome;
///
/// let sandbox = TestHome::new();
/// sandbox.write_home(".config/opencode/AGENTS.md", "# Agents");
/// assert!(sandbox.home().join(".config/opencode/AGENTS.md").exists());
/// ```
pub struct TestHome {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl Default for TestHome {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHome {
    /// Create the sandbox with empty `home/` and `repo/` directories.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = dunce::canonicalize(temp_dir.path()).unwrap();
        fs::create_dir_all(root.join("home")).unwrap();
        fs::create_dir_all(root.join("repo")).unwrap();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// The sandbox root containing `home/` and `repo/`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn home(&self) -> PathBuf {
        self.root.join("home")
    }

    pub fn repo(&self) -> PathBuf {
        self.root.join("repo")
    }

    /// Environment pairs for a Linux-style process rooted at this home.
    pub fn env_pairs(&self) -> Vec<(String, String)> {
        vec![("HOME".to_string(), self.home().to_string_lossy().into_owned())]
    }

    /// Write `content` to `rel` under the home directory, creating parents.
    pub fn write_home(&self, rel: &str, content: &str) -> PathBuf {
        write_file(&self.home().join(rel), content)
    }

    /// Write `content` to `rel` under the repository, creating parents.
    pub fn write_repo(&self, rel: &str, content: &str) -> PathBuf {
        write_file(&self.repo().join(rel), content)
    }

    /// Read a file under the home directory.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read_home(&self, rel: &str) -> String {
        let path = self.home().join(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Read a file under the repository.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read_repo(&self, rel: &str) -> String {
        let path = self.repo().join(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Assert that `rel` (relative to the repository) exists.
    pub fn assert_repo_exists(&self, rel: &str) {
        let full_path = self.repo().join(rel);
        assert!(
            full_path.exists(),
            "Expected repo file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `rel` (relative to the home directory) does **not** exist.
    pub fn assert_home_missing(&self, rel: &str) {
        let full_path = self.home().join(rel);
        assert!(
            !full_path.exists(),
            "Expected home file NOT to exist: {}",
            full_path.display()
        );
    }
}

fn write_file(path: &Path, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    path.to_path_buf()
}

//! Invocation context
//!
//! Captures the environment once and resolves everything commands share:
//! locations, the loaded sync config and the repository checkout.

use std::path::{Path, PathBuf};

use synced_core::{
    Env, Platform, SyncConfig, SyncLocations, SyncPlan, build_sync_plan, load_overrides,
    resolve_sync_locations,
};
use tracing::debug;

use crate::error::{CliError, Result};

/// What every command needs to know about this machine.
#[derive(Debug, Clone)]
pub struct SyncContext {
    pub platform: Platform,
    pub locations: SyncLocations,
    repo_override: Option<PathBuf>,
}

impl SyncContext {
    pub fn new(env: &Env, platform: Platform, repo_override: Option<PathBuf>) -> Self {
        let locations = resolve_sync_locations(env, platform);
        debug!(config_root = %locations.config_root.display(), %platform, "Resolved locations");
        Self {
            platform,
            locations,
            repo_override,
        }
    }

    /// Context for the running process.
    pub fn from_process(repo_override: Option<PathBuf>) -> Self {
        Self::new(&Env::from_process(), Platform::current(), repo_override)
    }

    pub fn load_config(&self) -> Result<SyncConfig> {
        Ok(SyncConfig::load(&self.locations.sync_config_path)?)
    }

    /// The checkout to sync with: `--repo`, else the configured location.
    pub fn repo_dir(&self, config: &SyncConfig) -> PathBuf {
        self.repo_override
            .clone()
            .unwrap_or_else(|| config.repo_dir(&self.locations))
    }

    /// Like [`Self::repo_dir`], but the directory must already exist.
    pub fn existing_repo_dir(&self, config: &SyncConfig) -> Result<PathBuf> {
        let repo_dir = self.repo_dir(config);
        if !repo_dir.is_dir() {
            return Err(CliError::user(format!(
                "Sync repository not found at {}. Clone {}/{} there first.",
                repo_dir.display(),
                config.repo.owner,
                config.repo.name
            )));
        }
        Ok(repo_dir)
    }

    pub fn plan(&self, config: &SyncConfig, repo_dir: &Path) -> SyncPlan {
        build_sync_plan(config, &self.locations, repo_dir, self.platform)
    }

    pub fn overrides(&self) -> Result<Option<serde_json::Value>> {
        Ok(load_overrides(&self.locations.overrides_path)?)
    }
}

/// Whether `dir` is a git working tree (rather than a plain directory).
pub fn is_git_checkout(dir: &Path) -> bool {
    dir.join(".git").exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(repo_override: Option<PathBuf>) -> SyncContext {
        let env = Env::from_pairs([("HOME", "/home/test")]);
        SyncContext::new(&env, Platform::Linux, repo_override)
    }

    #[test]
    fn repo_override_wins() {
        let config = SyncConfig::new("acme", "config");
        assert_eq!(
            context(Some(PathBuf::from("/tmp/sync"))).repo_dir(&config),
            PathBuf::from("/tmp/sync")
        );
        assert_eq!(
            context(None).repo_dir(&config),
            PathBuf::from("/home/test/.local/share/opencode/opencode-synced/repo")
        );
    }

    #[test]
    fn missing_repo_is_a_user_error() {
        let config = SyncConfig::new("acme", "config");
        let err = context(Some(PathBuf::from("/definitely/not/here")))
            .existing_repo_dir(&config)
            .unwrap_err();
        assert!(err.to_string().contains("acme/config"));
    }
}

//! Tool-specific locations derived from the platform directories

use std::path::PathBuf;

use crate::env::{Env, Platform};
use crate::platform::{XdgPaths, join_path, resolve_xdg_paths};

/// Directory name OpenCode uses under each base directory.
pub const APP_DIR: &str = "opencode";
/// File name of the user's sync configuration.
pub const SYNC_CONFIG_FILE: &str = "opencode-synced.jsonc";
/// File name of the machine-local overrides.
pub const OVERRIDES_FILE: &str = "opencode-synced.overrides.jsonc";
/// Variable that relocates the OpenCode config root.
pub const CONFIG_DIR_ENV: &str = "opencode_config_dir";

/// Where the sync tool finds its own files on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncLocations {
    pub config_root: PathBuf,
    pub sync_config_path: PathBuf,
    pub overrides_path: PathBuf,
    pub xdg: XdgPaths,
    pub platform: Platform,
}

impl SyncLocations {
    /// Default checkout location when the config does not name one.
    pub fn default_repo_dir(&self) -> PathBuf {
        join_path(
            self.platform,
            &self.xdg.data_dir,
            &[APP_DIR, "opencode-synced", "repo"],
        )
    }
}

/// Resolve the sync locations for `platform`.
pub fn resolve_sync_locations(env: &Env, platform: Platform) -> SyncLocations {
    let xdg = resolve_xdg_paths(env, platform);

    let config_root = match env.get(CONFIG_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => join_path(platform, &xdg.config_dir, &[APP_DIR]),
    };

    SyncLocations {
        sync_config_path: join_path(platform, &config_root, &[SYNC_CONFIG_FILE]),
        overrides_path: join_path(platform, &config_root, &[OVERRIDES_FILE]),
        config_root,
        xdg,
        platform,
    }
}

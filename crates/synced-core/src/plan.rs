//! Declarative sync plan
//!
//! A [`SyncPlan`] is the full set of local path to repository path
//! correspondences for one invocation. It is built from policy (the fixed
//! items) plus the user's extra paths, performs no I/O and is never mutated
//! after building. Manifest entries read from the repository are *not* part
//! of a fresh plan; see [`crate::manifest`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use synced_fs::checksum::short_hex_digest;
use tracing::debug;

use crate::config::SyncConfig;
use crate::env::Platform;
use crate::locations::{APP_DIR, SYNC_CONFIG_FILE, SyncLocations};
use crate::manifest::ManifestEntry;
use crate::platform::join_path;
use crate::portable::{expand_home, normalize_path};

/// Whether a synced path is a single file or a directory tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    File,
    Directory,
}

/// One fixed correspondence between a local path and a repository path.
///
/// Only the plan builder creates these, so `repo_path` is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncItem {
    pub local_path: PathBuf,
    /// Forward-slash path relative to the repository root
    pub repo_path: String,
    pub is_secret: bool,
    /// OpenCode's main config files, which receive machine-local overrides
    pub is_config_file: bool,
    #[serde(rename = "type")]
    pub kind: PathKind,
}

/// The two kinds of user-declared extra paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraCategory {
    Configs,
    Secrets,
}

impl ExtraCategory {
    /// Top-level repository directory for this category.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Configs => "config",
            Self::Secrets => "secrets",
        }
    }

    /// Repository-relative subtree every payload must live in.
    pub fn subtree(&self) -> String {
        format!("{}/extra", self.dir_name())
    }

    /// Repository-relative location of the manifest file.
    pub fn manifest_repo_path(&self) -> String {
        format!("{}/extra-manifest.json", self.dir_name())
    }
}

/// User-declared extra paths for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraManifest {
    pub category: ExtraCategory,
    /// Portable paths the current configuration wants synced
    pub allowlist: Vec<String>,
    pub manifest_path: PathBuf,
    /// Entries already known for this plan; empty when freshly built
    pub entries: Vec<ManifestEntry>,
}

impl ExtraManifest {
    pub fn new(category: ExtraCategory, repo_root: &Path, allowlist: Vec<String>) -> Self {
        let manifest_path = category
            .manifest_repo_path()
            .split('/')
            .fold(repo_root.to_path_buf(), |acc, segment| acc.join(segment));
        Self {
            category,
            allowlist,
            manifest_path,
            entries: Vec::new(),
        }
    }

    /// Allowlist membership, case-insensitive on Windows like the home
    /// prefix comparison in [`normalize_path`].
    pub fn allows(&self, portable: &str, platform: Platform) -> bool {
        self.allowlist
            .iter()
            .any(|allowed| same_portable(allowed, portable, platform))
    }

    /// Repository path for an allowlisted portable path.
    pub fn repo_path_for(&self, portable: &str) -> String {
        extra_repo_path(self.category, portable)
    }

    pub fn subtree(&self) -> String {
        self.category.subtree()
    }
}

/// Everything one sync invocation will transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPlan {
    pub items: Vec<SyncItem>,
    pub extra_configs: ExtraManifest,
    pub extra_secrets: ExtraManifest,
    pub repo_root: PathBuf,
    pub home_dir: PathBuf,
    #[serde(serialize_with = "serialize_platform")]
    pub platform: Platform,
}

fn serialize_platform<S: serde::Serializer>(
    platform: &Platform,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(platform.as_str())
}

impl SyncPlan {
    /// Native path of a forward-slash repository-relative path.
    pub fn repo_file(&self, repo_path: &str) -> PathBuf {
        repo_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.repo_root.clone(), |acc, segment| acc.join(segment))
    }

    /// Extra manifests in apply order.
    pub fn manifests(&self) -> [&ExtraManifest; 2] {
        [&self.extra_configs, &self.extra_secrets]
    }
}

const CONFIG_FILES: [&str; 2] = ["opencode.json", "opencode.jsonc"];
const INSTRUCTION_FILES: [&str; 1] = ["AGENTS.md"];
const CONFIG_DIRS: [&str; 5] = ["agent", "command", "plugin", "skill", "superpowers"];

/// Build the plan for `config`.
///
/// Pure and infallible; malformed config values are rejected upstream by
/// deserialization.
pub fn build_sync_plan(
    config: &SyncConfig,
    locations: &SyncLocations,
    repo_root: &Path,
    platform: Platform,
) -> SyncPlan {
    let home_dir = locations.xdg.home_dir.clone();
    let config_root = &locations.config_root;
    let mut items = Vec::new();

    let config_item = |name: &str, kind: PathKind, is_config_file: bool| SyncItem {
        local_path: join_path(platform, config_root, &[name]),
        repo_path: format!("config/{name}"),
        is_secret: false,
        is_config_file,
        kind,
    };

    for name in CONFIG_FILES {
        items.push(config_item(name, PathKind::File, true));
    }
    for name in INSTRUCTION_FILES {
        items.push(config_item(name, PathKind::File, false));
    }
    for name in CONFIG_DIRS {
        items.push(config_item(name, PathKind::Directory, false));
    }
    items.push(config_item(SYNC_CONFIG_FILE, PathKind::File, false));

    if config.includes_model_favorites() {
        items.push(SyncItem {
            local_path: join_path(platform, &locations.xdg.state_dir, &[APP_DIR, "model.json"]),
            repo_path: "state/model.json".to_string(),
            is_secret: false,
            is_config_file: false,
            kind: PathKind::File,
        });
    }

    if config.includes_secrets() {
        let secret_item = |name: &str| SyncItem {
            local_path: join_path(platform, &locations.xdg.data_dir, &[APP_DIR, name]),
            repo_path: format!("secrets/{name}"),
            is_secret: true,
            is_config_file: false,
            kind: PathKind::File,
        };
        if !config.backend_manages_auth() {
            items.push(secret_item("auth.json"));
        }
        if !config.backend_manages_mcp_auth() {
            items.push(secret_item("mcp-auth.json"));
        }
    }

    let sync_config_portable = normalize_path(&locations.sync_config_path, &home_dir, platform);
    let allowlist = |paths: &[String]| {
        portable_allowlist(paths, &home_dir, platform, &sync_config_portable)
    };

    let config_allowlist = allowlist(&config.extra_config_paths);
    let secret_allowlist = if config.includes_secrets() {
        allowlist(&config.extra_secret_paths)
    } else {
        Vec::new()
    };

    debug!(
        items = items.len(),
        extra_configs = config_allowlist.len(),
        extra_secrets = secret_allowlist.len(),
        "Built sync plan"
    );

    SyncPlan {
        items,
        extra_configs: ExtraManifest::new(ExtraCategory::Configs, repo_root, config_allowlist),
        extra_secrets: ExtraManifest::new(ExtraCategory::Secrets, repo_root, secret_allowlist),
        repo_root: repo_root.to_path_buf(),
        home_dir,
        platform,
    }
}

fn portable_allowlist(
    paths: &[String],
    home_dir: &Path,
    platform: Platform,
    sync_config_portable: &str,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut allowlist = Vec::new();

    for raw in paths {
        let expanded = expand_home(raw, home_dir);
        let portable = normalize_path(&expanded, home_dir, platform);

        if same_portable(&portable, sync_config_portable, platform) {
            debug!(path = %raw, "Dropping sync config from extra paths");
            continue;
        }
        let key = match platform {
            Platform::Windows => portable.to_lowercase(),
            Platform::Linux | Platform::Darwin => portable.clone(),
        };
        if seen.insert(key) {
            allowlist.push(portable);
        }
    }

    allowlist
}

fn same_portable(a: &str, b: &str, platform: Platform) -> bool {
    match platform {
        Platform::Windows => a.eq_ignore_ascii_case(b),
        Platform::Linux | Platform::Darwin => a == b,
    }
}

/// Stable repository path for an extra file.
///
/// `<category>/extra/<16 hex of sha256(portable)>-<sanitized basename>`. The
/// digest keeps distinct sources apart; the basename keeps the tree readable.
pub fn extra_repo_path(category: ExtraCategory, portable: &str) -> String {
    let digest = short_hex_digest(portable, 16);
    let basename = portable
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or_default();
    format!("{}/{}-{}", category.subtree(), digest, sanitize_segment(basename))
}

fn sanitize_segment(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    match sanitized.as_str() {
        "" | "." | ".." => "item".to_string(),
        _ => sanitized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_repo_path_is_filesystem_safe() {
        let path = extra_repo_path(ExtraCategory::Secrets, "~/My Notes/ключ.txt");
        let (prefix, name) = path.rsplit_once('/').unwrap();
        assert_eq!(prefix, "secrets/extra");
        assert_eq!(name.len(), 16 + 1 + "____.txt".len());
        assert!(name.ends_with("-____.txt"));
    }

    #[test]
    fn extra_repo_path_separates_same_basename() {
        let a = extra_repo_path(ExtraCategory::Configs, "~/a/settings.json");
        let b = extra_repo_path(ExtraCategory::Configs, "~/b/settings.json");
        assert_ne!(a, b);
        assert!(a.ends_with("-settings.json"));
    }

    #[test]
    fn allowlist_membership_follows_platform_case_rules() {
        let manifest = ExtraManifest::new(
            ExtraCategory::Configs,
            Path::new("/repo"),
            vec!["~/AppData/Tool/Settings.json".into()],
        );
        assert!(manifest.allows("~/appdata/tool/settings.json", Platform::Windows));
        assert!(!manifest.allows("~/appdata/tool/settings.json", Platform::Linux));
        assert!(manifest.allows("~/AppData/Tool/Settings.json", Platform::Darwin));
    }

    #[test]
    fn dot_names_are_replaced() {
        assert_eq!(sanitize_segment(".."), "item");
        assert_eq!(sanitize_segment(""), "item");
        assert_eq!(sanitize_segment(".bashrc"), ".bashrc");
    }

    #[test]
    fn manifest_paths_follow_category() {
        let manifest = ExtraManifest::new(ExtraCategory::Secrets, Path::new("/repo"), vec![]);
        assert_eq!(
            manifest.manifest_path,
            PathBuf::from("/repo/secrets/extra-manifest.json")
        );
        assert_eq!(manifest.subtree(), "secrets/extra");
    }
}

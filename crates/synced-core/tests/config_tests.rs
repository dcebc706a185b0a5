//! Sync config and overrides loading from disk

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use serde_json::json;
use synced_core::{
    Env, ErrorCode, Platform, SecretsBackend, SyncConfig, load_overrides, resolve_sync_locations,
};
use tempfile::TempDir;

#[test]
fn missing_config_has_stable_code() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("opencode-synced.jsonc");

    let err = SyncConfig::load(&path).unwrap_err();
    assert_eq!(err.code(), ErrorCode::SyncConfigMissing);
    assert_eq!(err.code().as_str(), "sync_config_missing");
}

#[test]
fn loads_jsonc_with_comments_and_trailing_commas() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("opencode-synced.jsonc");
    std::fs::write(
        &path,
        r#"{
  // where the config lives
  "repo": { "owner": "acme", "name": "config", "branch": "trunk", },
  "includeSecrets": true,
  /* keep favorites off on this box */
  "includeModelFavorites": false,
  "extraConfigPaths": ["~/.config/tool/settings.json",],
  "secretsBackend": {
    "type": "1password",
    "vault": "Private",
    "documents": { "mcpAuthJson": "opencode-mcp" },
  },
}"#,
    )
    .unwrap();

    let config = SyncConfig::load(&path).unwrap();

    assert_eq!(config.branch(), "trunk");
    assert!(config.includes_secrets());
    assert!(!config.includes_model_favorites());
    assert_eq!(config.extra_config_paths.len(), 1);
    assert!(matches!(
        config.secrets_backend,
        Some(SecretsBackend::OnePassword(ref backend)) if backend.vault == "Private"
    ));
    assert!(config.backend_manages_mcp_auth());
    assert!(!config.backend_manages_auth());
}

#[test]
fn save_then_load_preserves_config() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("opencode-synced.jsonc");
    let mut config = SyncConfig::new("acme", "config");
    config.extra_secret_paths = vec!["~/.ssh/config".into()];

    config.save(&path).unwrap();
    assert_eq!(SyncConfig::load(&path).unwrap(), config);
}

#[test]
fn repo_dir_defaults_under_data_dir_and_expands_tilde() {
    let env = Env::from_pairs([("HOME", "/home/test")]);
    let locations = resolve_sync_locations(&env, Platform::Linux);
    let mut config = SyncConfig::new("acme", "config");

    assert_eq!(
        config.repo_dir(&locations),
        PathBuf::from("/home/test/.local/share/opencode/opencode-synced/repo")
    );

    config.local_repo_path = Some("~/src/opencode-config".into());
    assert_eq!(
        config.repo_dir(&locations),
        PathBuf::from("/home/test/src/opencode-config")
    );
}

#[test]
fn overrides_are_optional() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("opencode-synced.overrides.jsonc");
    assert_eq!(load_overrides(&path).unwrap(), None);

    std::fs::write(&path, "{ // local only\n \"model\": \"ollama/llama3\" }").unwrap();
    assert_eq!(
        load_overrides(&path).unwrap(),
        Some(json!({"model": "ollama/llama3"}))
    );
}

#[test]
fn malformed_config_is_an_io_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("opencode-synced.jsonc");
    std::fs::write(&path, "{\"repo\": 42}").unwrap();

    let err = SyncConfig::load(&path).unwrap_err();
    assert_eq!(err.code(), ErrorCode::IoError);
}

//! The sync configuration document

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use synced_fs::{ConfigStore, NormalizedPath};

use crate::locations::SyncLocations;
use crate::portable::expand_home;
use crate::{Error, Result};

/// The GitHub repository holding the synced configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// Documents held by a 1Password vault instead of local files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnePasswordDocuments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_json: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_auth_json: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnePasswordBackend {
    pub vault: String,
    #[serde(default)]
    pub documents: OnePasswordDocuments,
}

/// External system of record for credentials.
///
/// Unknown `type` values fail deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SecretsBackend {
    #[serde(rename = "1password")]
    OnePassword(OnePasswordBackend),
}

/// Contents of `opencode-synced.jsonc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    pub repo: RepoRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_secrets: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_model_favorites: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_config_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_secret_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets_backend: Option<SecretsBackend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_repo_path: Option<String>,
}

impl SyncConfig {
    /// A config with only the repository set and every toggle at its default.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            repo: RepoRef {
                owner: owner.into(),
                name: name.into(),
                branch: None,
            },
            include_secrets: None,
            include_model_favorites: None,
            extra_config_paths: Vec::new(),
            extra_secret_paths: Vec::new(),
            secrets_backend: None,
            local_repo_path: None,
        }
    }

    /// Load from disk. A missing file is [`Error::ConfigMissing`].
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigMissing {
                path: path.to_path_buf(),
            });
        }
        let config = ConfigStore::new().load(&NormalizedPath::new(path))?;
        Ok(config)
    }

    /// Write to disk as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        ConfigStore::new().save(&NormalizedPath::new(path), self)?;
        Ok(())
    }

    /// Secrets are opt-in.
    pub fn includes_secrets(&self) -> bool {
        self.include_secrets == Some(true)
    }

    /// Model favorites are opt-out.
    pub fn includes_model_favorites(&self) -> bool {
        self.include_model_favorites != Some(false)
    }

    pub fn branch(&self) -> &str {
        self.repo.branch.as_deref().unwrap_or("main")
    }

    /// Whether a secrets backend owns `auth.json`.
    pub fn backend_manages_auth(&self) -> bool {
        match &self.secrets_backend {
            Some(SecretsBackend::OnePassword(backend)) => backend.documents.auth_json.is_some(),
            None => false,
        }
    }

    /// Whether a secrets backend owns `mcp-auth.json`.
    pub fn backend_manages_mcp_auth(&self) -> bool {
        match &self.secrets_backend {
            Some(SecretsBackend::OnePassword(backend)) => {
                backend.documents.mcp_auth_json.is_some()
            }
            None => false,
        }
    }

    /// Local checkout of the sync repository.
    pub fn repo_dir(&self, locations: &SyncLocations) -> PathBuf {
        match &self.local_repo_path {
            Some(path) => expand_home(path, &locations.xdg.home_dir),
            None => locations.default_repo_dir(),
        }
    }
}

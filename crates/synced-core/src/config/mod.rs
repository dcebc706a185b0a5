//! User configuration for the sync tool
//!
//! Two files live in the OpenCode config root:
//!
//! 1. **Sync config** - `opencode-synced.jsonc`, deserialized into [`SyncConfig`]
//! 2. **Overrides** - `opencode-synced.overrides.jsonc`, an arbitrary JSON object
//!    deep-merged into the OpenCode config files on this machine only
//!
//! Both are JSONC: comments and trailing commas are accepted on read.
//!
//! # Example
//!
//! ```ignore
//! use synced_core::{Env, Platform, SyncConfig, resolve_sync_locations};
//!
//! let locations = resolve_sync_locations(&Env::from_process(), Platform::current());
//! let config = SyncConfig::load(&locations.sync_config_path)?;
//! let repo_dir = config.repo_dir(&locations);
//! ```

mod overrides;
mod sync_config;

pub use overrides::{deep_merge, load_overrides, strip_overrides};
pub use sync_config::{
    OnePasswordBackend, OnePasswordDocuments, RepoRef, SecretsBackend, SyncConfig,
};

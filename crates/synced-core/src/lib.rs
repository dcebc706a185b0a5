//! Sync planning and secure apply engine for opencode-synced
//!
//! This crate turns a user's sync configuration into a declarative
//! [`SyncPlan`] and applies it in either direction between the local
//! OpenCode configuration and a version-controlled repository:
//!
//! - **Platform and location resolution**: XDG-style directories computed from
//!   an explicit [`Env`] snapshot, never from ambient process state
//! - **Portable paths**: home-relative `~/...` identifiers that are identical
//!   on every machine and OS
//! - **Plan building**: fixed sync items plus user-declared extra files,
//!   filtered by secret and backend policy
//! - **Secure apply**: manifest entries read back from the repository are
//!   re-validated before anything touches the filesystem
//! - **Commit messages**: an LLM-drafted one-liner with a dated fallback
//!
//! # Architecture
//!
//! ```text
//!                  synced-cli
//!                      |
//!                 synced-core
//!                      |
//!            +---------+---------+
//!            |                   |
//!       synced-fs            synced-git
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use synced_core::{Env, Platform, SyncConfig, build_sync_plan, resolve_sync_locations};
//!
//! let env = Env::from_pairs([("HOME", "/home/me")]);
//! let locations = resolve_sync_locations(&env, Platform::Linux);
//! let config = SyncConfig::new("me", "opencode-config");
//! let plan = build_sync_plan(&config, &locations, Path::new("/home/me/sync-repo"), Platform::Linux);
//! assert!(!plan.items.is_empty());
//! ```

pub mod apply;
pub mod commit;
pub mod config;
pub mod env;
pub mod error;
pub mod locations;
pub mod manifest;
pub mod plan;
pub mod platform;
pub mod portable;
pub mod repo_state;

pub use apply::{ApplyReport, sync_local_to_repo, sync_repo_to_local};
pub use commit::{
    ClientError, DiffSource, GitDiff, ModelRef, ModelSettings, SessionClient, fallback_message,
    generate_commit_message,
};
pub use config::{
    OnePasswordBackend, OnePasswordDocuments, RepoRef, SecretsBackend, SyncConfig,
    load_overrides,
};
pub use env::{Env, Platform};
pub use error::{Error, ErrorCode, PathSafetyError, PathSafetyKind, Result};
pub use locations::{SyncLocations, resolve_sync_locations};
pub use manifest::{ManifestEntry, ManifestFile, ValidatedEntry, validate_repo_path};
pub use plan::{ExtraCategory, ExtraManifest, PathKind, SyncItem, SyncPlan, build_sync_plan};
pub use platform::{XdgPaths, resolve_xdg_paths};
pub use portable::{denormalize_path, expand_home, normalize_path};
pub use repo_state::ensure_not_diverged;
